use crate::allocation::days_between;
use crate::config::{AllocatorSettings, DEFAULT_WEIGHT_TOLERANCE_PERCENT};
use crate::frequency;
use crate::models::{AllocationRequest, PortfolioEntry};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

const CASH_SYMBOL: &str = "CASH";

/// Advisory finding about a portfolio. None of these block allocation.
///
/// Entry indexes are zero-based; messages number entries from one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    EmptyPortfolio,
    MissingSymbol {
        index: usize,
    },
    DuplicateSymbol {
        symbol: String,
    },
    AmountBelowMinimum {
        index: usize,
        amount: f64,
        minimum: f64,
    },
    InvalidDcaPeriods {
        index: usize,
        periods: i64,
    },
    UnknownFrequency {
        index: usize,
        identifier: String,
    },
    FrequencyLongerThanRange {
        index: usize,
        interval_days: i64,
        range_days: i64,
    },
    DegenerateDateRange {
        days: i64,
    },
    WeightSumMismatch {
        total: f64,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPortfolio => write!(f, "Portfolio must contain at least one entry"),
            Self::MissingSymbol { index } => write!(f, "Entry {} has no symbol", index + 1),
            Self::DuplicateSymbol { symbol } => {
                write!(f, "Symbol {} appears more than once", symbol)
            }
            Self::AmountBelowMinimum {
                index,
                amount,
                minimum,
            } => write!(
                f,
                "Entry {} amount {:.2} is below the minimum of {:.2}",
                index + 1,
                amount,
                minimum
            ),
            Self::InvalidDcaPeriods { index, periods } => write!(
                f,
                "Entry {} DCA period count must be at least 1 (got {})",
                index + 1,
                periods
            ),
            Self::UnknownFrequency { index, identifier } => write!(
                f,
                "Entry {} uses unknown DCA frequency '{}'",
                index + 1,
                identifier
            ),
            Self::FrequencyLongerThanRange {
                index,
                interval_days,
                range_days,
            } => write!(
                f,
                "Entry {} DCA interval of {} days exceeds the {}-day backtest range",
                index + 1,
                interval_days,
                range_days
            ),
            Self::DegenerateDateRange { days } => write!(
                f,
                "Backtest end date must be after the start date (range spans {} days)",
                days
            ),
            Self::WeightSumMismatch { total } => {
                write!(f, "Portfolio weights sum to {:.1}%, not 100%", total)
            }
        }
    }
}

pub fn validate_weights(entries: &[PortfolioEntry]) -> Vec<ValidationIssue> {
    validate_weights_with_tolerance(entries, DEFAULT_WEIGHT_TOLERANCE_PERCENT)
}

/// Warn when weight-driven entries do not sum to 100% within `tolerance`
/// percentage points. Portfolios without weights produce nothing.
pub fn validate_weights_with_tolerance(
    entries: &[PortfolioEntry],
    tolerance: f64,
) -> Vec<ValidationIssue> {
    let weights: Vec<f64> = entries.iter().filter_map(|entry| entry.weight).collect();
    if weights.is_empty() {
        return Vec::new();
    }

    let total: f64 = weights.iter().sum();
    if (total - 100.0).abs() > tolerance {
        debug!("Weight sum {} outside tolerance {}", total, tolerance);
        return vec![ValidationIssue::WeightSumMismatch { total }];
    }
    Vec::new()
}

/// Full advisory lint of a request, in entry order, weight check last.
pub fn validate_portfolio(
    request: &AllocationRequest,
    settings: &AllocatorSettings,
) -> Vec<ValidationIssue> {
    let entries = &request.entries;
    if entries.is_empty() {
        return vec![ValidationIssue::EmptyPortfolio];
    }

    let mut issues = Vec::new();
    let range_days = request.date_range.as_ref().map(days_between);
    if let Some(days) = range_days.filter(|&days| days <= 0) {
        issues.push(ValidationIssue::DegenerateDateRange { days });
    }

    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let symbol = entry.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            issues.push(ValidationIssue::MissingSymbol { index });
        } else if symbol != CASH_SYMBOL && !seen.insert(symbol.clone()) {
            duplicates.insert(symbol);
        }

        if !entry.is_weight_driven() && entry.amount < settings.minimum_entry_amount {
            issues.push(ValidationIssue::AmountBelowMinimum {
                index,
                amount: entry.amount,
                minimum: settings.minimum_entry_amount,
            });
        }

        if !entry.is_dca() {
            continue;
        }
        if let Some(periods) = entry.dca_periods.filter(|&periods| periods < 1) {
            issues.push(ValidationIssue::InvalidDcaPeriods { index, periods });
        }

        let interval_days = match entry.dca_frequency.as_deref() {
            Some(identifier) => match frequency::describe(identifier) {
                Ok(parsed) => frequency::interval_days(parsed),
                Err(_) => {
                    issues.push(ValidationIssue::UnknownFrequency {
                        index,
                        identifier: identifier.to_string(),
                    });
                    continue;
                }
            },
            None => frequency::interval_days(settings.default_dca_frequency),
        };
        if let Some(range_days) = range_days.filter(|&days| days > 0) {
            if interval_days > range_days {
                issues.push(ValidationIssue::FrequencyLongerThanRange {
                    index,
                    interval_days,
                    range_days,
                });
            }
        }
    }

    issues.extend(
        duplicates
            .into_iter()
            .map(|symbol| ValidationIssue::DuplicateSymbol { symbol }),
    );
    issues.extend(validate_weights_with_tolerance(
        entries,
        settings.weight_tolerance_percent,
    ));
    issues
}

use crate::config::AllocatorSettings;
use crate::frequency;
use crate::models::{
    AllocationRequest, AllocationResult, DateRange, DcaSchedule, InvestmentType, PortfolioEntry,
};
use log::{debug, warn};

/// Round to whole currency units, half away from zero.
pub fn round_money(value: f64) -> f64 {
    value.round()
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole days from `start` to `end`; negative when the range is inverted.
pub fn days_between(range: &DateRange) -> i64 {
    (range.end - range.start).num_days()
}

/// Number of contributions over `days`, counting the first one. Never below 1.
pub fn dca_period_count(days: i64, interval_days: i64) -> u32 {
    let interval_days = interval_days.max(1);
    let periods = (days.div_euclid(interval_days) + 1).max(1);
    u32::try_from(periods).unwrap_or(u32::MAX)
}

fn entry_interval_days(entry: &PortfolioEntry, settings: &AllocatorSettings) -> i64 {
    match entry.dca_frequency.as_deref() {
        Some(identifier) => frequency::interval_days_or(identifier, settings.fallback_interval_days),
        None => frequency::interval_days(settings.default_dca_frequency),
    }
}

pub fn allocate(request: &AllocationRequest) -> Vec<AllocationResult> {
    allocate_with(request, &AllocatorSettings::default())
}

/// Resolve dollar amounts for weight-driven entries and DCA schedules when a
/// date range is known. Fixed entries pass through unchanged. With a date range
/// the last weight-driven entry absorbs every rounding residual, so the
/// weight-driven amounts sum to `total_investment` exactly.
pub fn allocate_with(
    request: &AllocationRequest,
    settings: &AllocatorSettings,
) -> Vec<AllocationResult> {
    let mut results: Vec<AllocationResult> = request
        .entries
        .iter()
        .map(AllocationResult::pass_through)
        .collect();

    let weighted: Vec<(usize, f64)> = request
        .entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.weight.map(|weight| (index, weight)))
        .collect();
    if weighted.is_empty() {
        return results;
    }

    let total = request.total_investment;
    let days = match request.date_range {
        Some(range) if total != 0.0 => days_between(&range),
        _ => {
            for &(index, weight) in &weighted {
                results[index].resolved_amount = round_money(weight / 100.0 * total);
            }
            return results;
        }
    };
    if days <= 0 {
        warn!(
            "Date range spans {} day(s); DCA entries fall back to a single period",
            days
        );
    }

    let last_position = weighted.len() - 1;
    let mut allocated_so_far = 0.0;
    for (position, &(index, weight)) in weighted.iter().enumerate() {
        let entry = &request.entries[index];
        let share = if position == last_position {
            total - allocated_so_far
        } else {
            weight / 100.0 * total
        };
        let resolved_amount = round_money(share);

        let dca_schedule = match entry.investment_type {
            InvestmentType::Dca => {
                let period_count = dca_period_count(days, entry_interval_days(entry, settings));
                Some(DcaSchedule {
                    period_count,
                    per_period_amount: round_money(share / f64::from(period_count)),
                })
            }
            InvestmentType::LumpSum => None,
        };

        debug!(
            "Allocated {} to {} ({}%, {:?})",
            resolved_amount, entry.symbol, weight, dca_schedule
        );
        allocated_so_far += resolved_amount;
        results[index] = AllocationResult {
            symbol: entry.symbol.clone(),
            resolved_amount,
            dca_schedule,
        };
    }

    results
}

pub fn total_amount(entries: &[PortfolioEntry]) -> f64 {
    entries.iter().map(|entry| entry.amount).sum()
}

pub fn total_weight(entries: &[PortfolioEntry]) -> f64 {
    entries.iter().filter_map(|entry| entry.weight).sum()
}

pub fn amount_to_weight(amount: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    amount / total * 100.0
}

/// Total money committed when each DCA entry's `amount` is a per-period
/// contribution. Without a date range only an explicit `dca_periods` override
/// multiplies the amount.
pub fn dca_adjusted_total(
    entries: &[PortfolioEntry],
    date_range: Option<&DateRange>,
    settings: &AllocatorSettings,
) -> f64 {
    entries
        .iter()
        .map(|entry| {
            if !entry.is_dca() {
                return entry.amount;
            }
            let periods = match date_range {
                Some(range) => {
                    dca_period_count(days_between(range), entry_interval_days(entry, settings))
                }
                None => entry
                    .dca_periods
                    .filter(|&periods| periods >= 1)
                    .map_or(1, |periods| u32::try_from(periods).unwrap_or(u32::MAX)),
            };
            entry.amount * f64::from(periods)
        })
        .sum()
}

/// Switch to weight mode: weights follow the current amount split, to two
/// decimals.
pub fn weights_from_amounts(entries: &[PortfolioEntry]) -> Vec<PortfolioEntry> {
    let total = total_amount(entries);
    entries
        .iter()
        .map(|entry| {
            let weight = if total > 0.0 {
                round_percent(amount_to_weight(entry.amount, total))
            } else {
                0.0
            };
            PortfolioEntry {
                weight: Some(weight),
                ..entry.clone()
            }
        })
        .collect()
}

/// Switch to amount mode: every amount becomes authoritative.
pub fn clear_weights(entries: &[PortfolioEntry]) -> Vec<PortfolioEntry> {
    entries
        .iter()
        .map(|entry| PortfolioEntry {
            weight: None,
            ..entry.clone()
        })
        .collect()
}

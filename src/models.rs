use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    #[default]
    LumpSum,
    Dca,
}

impl InvestmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentType::LumpSum => "lump_sum",
            InvestmentType::Dca => "dca",
        }
    }
}

/// One portfolio line as edited in the backtest form.
///
/// When `weight` is set the line is weight-driven and `amount` is derived from
/// the budget; otherwise `amount` is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub symbol: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub investment_type: InvestmentType,
    #[serde(default)]
    pub dca_frequency: Option<String>,
    #[serde(default)]
    pub dca_periods: Option<i64>,
}

impl PortfolioEntry {
    pub fn fixed(symbol: &str, amount: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            amount,
            weight: None,
            investment_type: InvestmentType::LumpSum,
            dca_frequency: None,
            dca_periods: None,
        }
    }

    pub fn weighted(symbol: &str, weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::fixed(symbol, 0.0)
        }
    }

    pub fn with_dca(mut self, frequency: &str) -> Self {
        self.investment_type = InvestmentType::Dca;
        self.dca_frequency = Some(frequency.to_string());
        self
    }

    pub fn is_weight_driven(&self) -> bool {
        self.weight.is_some()
    }

    pub fn is_dca(&self) -> bool {
        self.investment_type == InvestmentType::Dca
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub entries: Vec<PortfolioEntry>,
    pub total_investment: f64,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DcaSchedule {
    pub period_count: u32,
    pub per_period_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub symbol: String,
    pub resolved_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dca_schedule: Option<DcaSchedule>,
}

impl AllocationResult {
    /// Result for an entry the engine leaves untouched.
    pub fn pass_through(entry: &PortfolioEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            resolved_amount: entry.amount,
            dca_schedule: None,
        }
    }
}

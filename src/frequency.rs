use log::warn;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DCA_FREQUENCY: Frequency = Frequency::Monthly(1);
pub const FALLBACK_INTERVAL_DAYS: i64 = 30;

const DAYS_PER_WEEK: i64 = 7;
// Calendar months are approximated, not computed.
const DAYS_PER_MONTH: i64 = 30;

/// Identifiers offered by the portfolio form's frequency picker.
pub const PRESETS: [&str; 12] = [
    "weekly_1",
    "weekly_2",
    "weekly_4",
    "weekly_8",
    "weekly_12",
    "weekly_24",
    "weekly_48",
    "monthly_1",
    "monthly_2",
    "monthly_3",
    "monthly_6",
    "monthly_12",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrequencyError {
    #[error("unknown DCA frequency '{identifier}' (expected weekly_<N> or monthly_<N>)")]
    UnknownFrequency { identifier: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Weekly,
    Monthly,
}

impl FrequencyUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Contribution cadence: every `n` weeks or every `n` months, `n >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Weekly(u32),
    Monthly(u32),
}

impl Frequency {
    pub fn unit(self) -> FrequencyUnit {
        match self {
            Self::Weekly(_) => FrequencyUnit::Weekly,
            Self::Monthly(_) => FrequencyUnit::Monthly,
        }
    }

    pub fn interval_count(self) -> u32 {
        match self {
            Self::Weekly(n) | Self::Monthly(n) => n,
        }
    }

    pub fn identifier(self) -> String {
        format!("{}_{}", self.unit().as_str(), self.interval_count())
    }

    pub fn label(self) -> String {
        match self {
            Self::Weekly(1) => "every week".to_string(),
            Self::Weekly(n) => format!("every {} weeks", n),
            Self::Monthly(1) => "every month".to_string(),
            Self::Monthly(n) => format!("every {} months", n),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for Frequency {
    type Err = FrequencyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        describe(raw)
    }
}

/// Parse an identifier of the form `<unit>_<N>`.
pub fn describe(identifier: &str) -> Result<Frequency, FrequencyError> {
    let unknown = || FrequencyError::UnknownFrequency {
        identifier: identifier.to_string(),
    };

    let (unit, count) = identifier.trim().split_once('_').ok_or_else(unknown)?;
    if count.is_empty() || !count.chars().all(|c| c.is_ascii_digit()) {
        return Err(unknown());
    }
    let count = count.parse::<u32>().map_err(|_| unknown())?;
    if count == 0 {
        return Err(unknown());
    }

    match unit.to_ascii_lowercase().as_str() {
        "weekly" => Ok(Frequency::Weekly(count)),
        "monthly" => Ok(Frequency::Monthly(count)),
        _ => Err(unknown()),
    }
}

pub fn interval_days(frequency: Frequency) -> i64 {
    match frequency {
        Frequency::Weekly(n) => i64::from(n) * DAYS_PER_WEEK,
        Frequency::Monthly(n) => i64::from(n) * DAYS_PER_MONTH,
    }
}

/// Interval for `identifier`, or `fallback_days` when it does not parse.
pub fn interval_days_or(identifier: &str, fallback_days: i64) -> i64 {
    match describe(identifier) {
        Ok(frequency) => interval_days(frequency),
        Err(err) => {
            warn!("{}; using a {}-day interval", err, fallback_days);
            fallback_days
        }
    }
}

pub fn interval_days_or_default(identifier: Option<&str>) -> i64 {
    match identifier {
        Some(identifier) => interval_days_or(identifier, FALLBACK_INTERVAL_DAYS),
        None => interval_days(DEFAULT_DCA_FREQUENCY),
    }
}

use crate::frequency::{self, Frequency, DEFAULT_DCA_FREQUENCY, FALLBACK_INTERVAL_DAYS};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fmt::Display;
use std::str::FromStr;

const ENV_PREFIX: &str = "ALLOCATOR_";

pub const DEFAULT_WEIGHT_TOLERANCE_PERCENT: f64 = 0.5;
pub const DEFAULT_MINIMUM_ENTRY_AMOUNT: f64 = 100.0;

/// Tunables for allocation and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatorSettings {
    pub weight_tolerance_percent: f64,
    pub fallback_interval_days: i64,
    pub default_dca_frequency: Frequency,
    pub minimum_entry_amount: f64,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            weight_tolerance_percent: DEFAULT_WEIGHT_TOLERANCE_PERCENT,
            fallback_interval_days: FALLBACK_INTERVAL_DAYS,
            default_dca_frequency: DEFAULT_DCA_FREQUENCY,
            minimum_entry_amount: DEFAULT_MINIMUM_ENTRY_AMOUNT,
        }
    }
}

impl AllocatorSettings {
    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let weight_tolerance_percent = optional_setting_bounded(
            settings,
            "WEIGHT_TOLERANCE_PERCENT",
            defaults.weight_tolerance_percent,
            Some(0.0),
            Some(100.0),
        )?;
        let fallback_interval_days = optional_setting_bounded(
            settings,
            "FALLBACK_INTERVAL_DAYS",
            defaults.fallback_interval_days,
            Some(1),
            None,
        )?;
        let default_dca_frequency = match optional_setting(settings, "DEFAULT_DCA_FREQUENCY") {
            Some(raw) => frequency::describe(raw)
                .map_err(|err| anyhow!("Setting DEFAULT_DCA_FREQUENCY is invalid: {}", err))?,
            None => defaults.default_dca_frequency,
        };
        let minimum_entry_amount = optional_setting_bounded(
            settings,
            "MINIMUM_ENTRY_AMOUNT",
            defaults.minimum_entry_amount,
            Some(0.0),
            None,
        )?;

        Ok(Self {
            weight_tolerance_percent,
            fallback_interval_days,
            default_dca_frequency,
            minimum_entry_amount,
        })
    }

    /// Read `ALLOCATOR_*` environment variables, prefix stripped.
    pub fn from_env() -> Result<Self> {
        let settings = settings_from_env_vars(env::vars_os())?;
        Self::from_settings_map(&settings)
    }
}

/// Collect prefixed variables. Variables outside the prefix are never decoded.
fn settings_from_env_vars<I>(vars: I) -> Result<HashMap<String, String>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut settings = HashMap::new();
    for (key, value) in vars {
        let Some(stripped) = key.to_str().and_then(|key| key.strip_prefix(ENV_PREFIX)) else {
            continue;
        };
        let value = value.into_string().map_err(|raw| {
            anyhow!(
                "Environment variable {}{} is not valid UTF-8 (value: {})",
                ENV_PREFIX,
                stripped,
                raw.to_string_lossy()
            )
        })?;
        settings.insert(stripped.to_string(), value);
    }
    Ok(settings)
}

fn optional_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

trait SettingValue: FromStr + PartialOrd + Display + Copy {
    const KIND: &'static str;

    fn is_usable(&self) -> bool {
        true
    }
}

impl SettingValue for f64 {
    const KIND: &'static str = "a number";

    fn is_usable(&self) -> bool {
        self.is_finite()
    }
}

impl SettingValue for i64 {
    const KIND: &'static str = "an integer";
}

fn optional_setting_bounded<T: SettingValue>(
    settings: &HashMap<String, String>,
    key: &str,
    default: T,
    min: Option<T>,
    max: Option<T>,
) -> Result<T> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(default);
    };
    let value = raw
        .parse::<T>()
        .map_err(|_| anyhow!("Setting {} must be {} (value: {})", key, T::KIND, raw))?;
    if !value.is_usable() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if let Some(min_value) = min.filter(|min_value| value < *min_value) {
        return Err(anyhow!(
            "Setting {} must be >= {} (value: {})",
            key,
            min_value,
            raw
        ));
    }
    if let Some(max_value) = max.filter(|max_value| value > *max_value) {
        return Err(anyhow!(
            "Setting {} must be <= {} (value: {})",
            key,
            max_value,
            raw
        ));
    }
    Ok(value)
}

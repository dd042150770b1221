use crate::frequency::{describe, interval_days, PRESETS};
use anyhow::Result;

pub fn run() -> Result<()> {
    for identifier in PRESETS {
        let frequency = describe(identifier)?;
        println!(
            "{:<12} {:>4} days  {}",
            identifier,
            interval_days(frequency),
            frequency.label()
        );
    }
    Ok(())
}

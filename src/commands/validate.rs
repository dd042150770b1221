use crate::commands::read_request;
use crate::config::AllocatorSettings;
use crate::validation::validate_portfolio;
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

pub fn run(settings: &AllocatorSettings, input: Option<&Path>) -> Result<()> {
    let request = read_request(input)?;
    let issues = validate_portfolio(&request, settings);
    if issues.is_empty() {
        info!("Portfolio with {} entr(ies) passed validation", request.entries.len());
        return Ok(());
    }

    warn!("Validation produced {} issue(s)", issues.len());
    for issue in &issues {
        println!("{}", issue);
    }
    Ok(())
}

use crate::allocation::allocate_with;
use crate::commands::read_request;
use crate::config::AllocatorSettings;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

pub fn run(settings: &AllocatorSettings, input: Option<&Path>) -> Result<()> {
    let request = read_request(input)?;
    info!(
        "Allocating {} across {} entr(ies)",
        request.total_investment,
        request.entries.len()
    );

    let results = allocate_with(&request, settings);
    let output =
        serde_json::to_string_pretty(&results).context("failed to serialize allocation results")?;
    println!("{}", output);
    Ok(())
}

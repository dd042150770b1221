pub mod allocate;
pub mod frequencies;
pub mod validate;

use crate::models::AllocationRequest;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Read a JSON allocation request from `input`, or stdin when absent.
pub fn read_request(input: Option<&Path>) -> Result<AllocationRequest> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read request from {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read request from stdin")?,
    };
    serde_json::from_str(&raw).context("failed to parse allocation request JSON")
}

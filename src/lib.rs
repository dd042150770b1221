pub mod allocation;
pub mod commands;
pub mod config;
pub mod frequency;
pub mod models;
pub mod validation;

pub use allocation::{allocate, allocate_with};
pub use frequency::{describe, interval_days, Frequency, FrequencyError};
pub use models::{AllocationRequest, AllocationResult, DateRange, DcaSchedule, PortfolioEntry};
pub use validation::{validate_portfolio, validate_weights, ValidationIssue};

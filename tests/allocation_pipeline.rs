use chrono::NaiveDate;
use portfolio_allocator::allocation::{allocate, allocate_with, days_between};
use portfolio_allocator::config::AllocatorSettings;
use portfolio_allocator::models::{
    AllocationRequest, AllocationResult, DateRange, InvestmentType, PortfolioEntry,
};
use portfolio_allocator::validation::{validate_portfolio, validate_weights, ValidationIssue};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Once;

fn ensure_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn parse_request(value: Value) -> AllocationRequest {
    serde_json::from_value(value).expect("request JSON should deserialize")
}

fn weighted_total(request: &AllocationRequest, results: &[AllocationResult]) -> f64 {
    request
        .entries
        .iter()
        .zip(results)
        .filter(|(entry, _)| entry.weight.is_some())
        .map(|(_, result)| result.resolved_amount)
        .sum()
}

#[test]
fn lump_sum_split_without_dates() {
    ensure_test_env();
    let request = parse_request(json!({
        "entries": [
            {"symbol": "AAPL", "weight": 50, "investmentType": "lump_sum"},
            {"symbol": "GOOGL", "weight": 50, "investmentType": "lump_sum"}
        ],
        "totalInvestment": 10000
    }));

    let results = allocate(&request);
    let amounts: Vec<f64> = results.iter().map(|r| r.resolved_amount).collect();
    assert_eq!(amounts, vec![5000.0, 5000.0]);
    assert!(results.iter().all(|r| r.dca_schedule.is_none()));
}

#[test]
fn monthly_dca_over_ten_months() {
    ensure_test_env();
    let request = parse_request(json!({
        "entries": [
            {"symbol": "AAPL", "weight": 50, "investmentType": "dca", "dcaFrequency": "monthly_1"},
            {"symbol": "GOOGL", "weight": 50, "investmentType": "dca", "dcaFrequency": "monthly_1"}
        ],
        "totalInvestment": 10000,
        "dateRange": {"start": "2025-01-01", "end": "2025-10-31"}
    }));
    assert_eq!(days_between(&request.date_range.unwrap()), 303);

    let results = allocate(&request);
    for result in &results {
        let schedule = result.dca_schedule.expect("DCA entries get a schedule");
        assert_eq!(schedule.period_count, 11);
        assert_eq!(schedule.per_period_amount, 455.0);
    }
    assert_eq!(weighted_total(&request, &results), 10_000.0);

    // The schedule total drifts from the allocation by the per-period rounding.
    let schedule_total: f64 = results
        .iter()
        .filter_map(|r| r.dca_schedule)
        .map(|s| s.per_period_amount * f64::from(s.period_count))
        .sum();
    assert_eq!(schedule_total, 10_010.0);

    let output = serde_json::to_value(&results).unwrap();
    assert_eq!(output[0]["dcaSchedule"]["periodCount"], 11);
    assert_eq!(output[1]["resolvedAmount"], 5000.0);
}

#[test]
fn fixed_entries_are_not_renormalized() {
    ensure_test_env();
    let request = AllocationRequest {
        entries: vec![
            PortfolioEntry::weighted("VTI", 100.0),
            PortfolioEntry::fixed("CASH", 2_000.0),
        ],
        total_investment: 10_000.0,
        date_range: None,
    };

    let results = allocate(&request);
    assert_eq!(results[0].resolved_amount, 10_000.0);
    assert_eq!(results[1].resolved_amount, 2_000.0);
}

#[test]
fn four_week_cadence_over_exactly_four_weeks() {
    ensure_test_env();
    let request = AllocationRequest {
        entries: vec![PortfolioEntry::weighted("QQQ", 100.0).with_dca("weekly_4")],
        total_investment: 1_000.0,
        date_range: Some(DateRange::new(date(2025, 2, 1), date(2025, 3, 1))),
    };
    let results = allocate(&request);
    let schedule = results[0].dca_schedule.unwrap();
    assert_eq!(schedule.period_count, 2);
    assert_eq!(schedule.per_period_amount, 500.0);
}

#[test]
fn weight_mismatch_warns_but_allocation_still_balances() {
    ensure_test_env();
    let request = AllocationRequest {
        entries: vec![
            PortfolioEntry::weighted("AAPL", 60.0),
            PortfolioEntry::weighted("MSFT", 37.0),
        ],
        total_investment: 10_000.0,
        date_range: Some(DateRange::new(date(2024, 1, 1), date(2024, 12, 31))),
    };

    let before = request.clone();
    let issues = validate_weights(&request.entries);
    assert_eq!(issues, vec![ValidationIssue::WeightSumMismatch { total: 97.0 }]);
    assert_eq!(request, before);

    let results = allocate(&request);
    assert_eq!(results[0].resolved_amount, 6_000.0);
    assert_eq!(results[1].resolved_amount, 4_000.0);
    assert_eq!(validate_weights(&request.entries), issues);
}

#[test]
fn results_are_reproducible_and_keep_input_order() {
    ensure_test_env();
    let mut dca = PortfolioEntry::weighted("BND", 27.5).with_dca("weekly_2");
    dca.dca_periods = Some(3);
    let request = AllocationRequest {
        entries: vec![
            PortfolioEntry::fixed("GLD", 750.0),
            PortfolioEntry::weighted("VTI", 45.25),
            dca,
            PortfolioEntry::weighted("VXUS", 27.25).with_dca("monthly_2"),
        ],
        total_investment: 12_345.0,
        date_range: Some(DateRange::new(date(2022, 7, 4), date(2024, 2, 29))),
    };

    let first = allocate(&request);
    let second = allocate(&request);
    assert_eq!(first, second);
    let symbols: Vec<&str> = first.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["GLD", "VTI", "BND", "VXUS"]);
    assert_eq!(first[0].resolved_amount, 750.0);
    assert_eq!(weighted_total(&request, &first), 12_345.0);
    assert!(first[1].dca_schedule.is_none());
    assert!(first[2].dca_schedule.is_some());
    assert_eq!(request.entries[3].investment_type, InvestmentType::Dca);
}

#[test]
fn settings_map_changes_fallback_and_validation() {
    ensure_test_env();
    let settings = AllocatorSettings::from_settings_map(&HashMap::from([
        ("FALLBACK_INTERVAL_DAYS".to_string(), "10".to_string()),
        ("MINIMUM_ENTRY_AMOUNT".to_string(), "0".to_string()),
    ]))
    .unwrap();

    let request = AllocationRequest {
        entries: vec![
            PortfolioEntry::fixed("SPY", 50.0),
            PortfolioEntry::weighted("IWM", 100.0).with_dca("every_other_week"),
        ],
        total_investment: 500.0,
        date_range: Some(DateRange::new(date(2025, 1, 1), date(2025, 1, 31))),
    };

    let results = allocate_with(&request, &settings);
    let schedule = results[1].dca_schedule.unwrap();
    assert_eq!(schedule.period_count, 4);
    assert_eq!(schedule.per_period_amount, 125.0);

    let issues = validate_portfolio(&request, &settings);
    assert_eq!(
        issues,
        vec![ValidationIssue::UnknownFrequency {
            index: 1,
            identifier: "every_other_week".to_string()
        }]
    );
}

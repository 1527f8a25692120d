//! Display formatting for analytics rows
//!
//! Everything here is lossy and meant for the console only.

use crate::models::{BuyerRecord, HolderRecord, MarketCapRecord, TrendingRecord};

pub const UNKNOWN_TOKEN: &str = "Unknown Token";
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Abbreviate a USD amount: `1_500_000 -> "2M"`, `4_300 -> "4K"`, `999 -> "999"`
pub fn format_usd(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", round_display(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{}K", round_display(value / 1_000.0))
    } else {
        round_display(value)
    }
}

/// Fixed six-decimal holding, `"0.000000"` when absent
pub fn format_holding(holding: Option<f64>) -> String {
    format!("{:.6}", holding.unwrap_or(0.0))
}

// Half away from zero; `{:.0}` alone would round ties to even.
fn round_display(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{:.0}", rounded)
}

fn text_or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

pub fn marketcap_line(record: &MarketCapRecord) -> String {
    format!(
        "{} | {} | Cap: {}",
        text_or(&record.symbol, UNKNOWN_TOKEN),
        text_or(&record.mint_address, UNKNOWN_ADDRESS),
        format_usd(record.marketcap.unwrap_or(0.0)),
    )
}

pub fn holder_line(record: &HolderRecord) -> String {
    format!(
        "{} # Holdings: {}",
        text_or(&record.address, UNKNOWN_ADDRESS),
        format_holding(record.holding),
    )
}

pub fn buyer_line(record: &BuyerRecord) -> String {
    format!(
        "Amount: {} | Owner: {}",
        text_or(&record.amount, "0"),
        text_or(&record.owner, UNKNOWN_ADDRESS),
    )
}

pub fn trending_line(record: &TrendingRecord) -> String {
    format!(
        "{} -> {}",
        text_or(&record.mint_address, UNKNOWN_ADDRESS),
        text_or(&record.name, UNKNOWN_TOKEN),
    )
}

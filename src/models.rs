//! Core data models for the agent

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PERSONALITY: &str = "neutral";

//
// ================= Intent =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MarketCapLookup,
    TopHolders,
    TopBuyers,
    Trending,
    Unsupported,
}

/// Parameters extracted from a question, one variant per supported intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentParameters {
    MarketCapLookup {
        search_term: String,
        result_count: u32,
    },
    TopHolders {
        mint_address: String,
    },
    TopBuyers {
        mint_address: String,
        result_count: u32,
    },
    Trending,
}

impl IntentParameters {
    pub fn intent(&self) -> Intent {
        match self {
            IntentParameters::MarketCapLookup { .. } => Intent::MarketCapLookup,
            IntentParameters::TopHolders { .. } => Intent::TopHolders,
            IntentParameters::TopBuyers { .. } => Intent::TopBuyers,
            IntentParameters::Trending => Intent::Trending,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::MarketCapLookup => "market-cap-lookup",
            Intent::TopHolders => "top-holders",
            Intent::TopBuyers => "top-buyers",
            Intent::Trending => "trending",
            Intent::Unsupported => "unsupported",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Registry =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub personality: Option<String>,
}

impl Agent {
    /// Personality with blank or absent values collapsed to `"neutral"`
    pub fn personality_or_default(&self) -> &str {
        personality_or_default(self.personality.as_deref())
    }
}

/// Metadata returned by the single-agent lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AgentProfile {
    #[serde(default)]
    pub personality: Option<String>,
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentDetails {
    pub personality: String,
}

pub fn personality_or_default(personality: Option<&str>) -> &str {
    match personality {
        Some(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_PERSONALITY,
    }
}

//
// ================= Analytics records =================
//

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketCapRecord {
    pub symbol: Option<String>,
    pub mint_address: Option<String>,
    pub marketcap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HolderRecord {
    pub address: Option<String>,
    pub holding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuyerRecord {
    /// Kept as the service's text so amounts are shown without float rounding
    pub amount: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendingRecord {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint_address: Option<String>,
}

/// Decoded rows for one analytics response
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsRecords {
    MarketCap(Vec<MarketCapRecord>),
    Holders(Vec<HolderRecord>),
    Buyers(Vec<BuyerRecord>),
    Trending(Vec<TrendingRecord>),
}

/// Outcome of one analytics fetch.
///
/// `Empty` is the "no data found" result and is not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Rows(AnalyticsRecords),
    Empty,
    Failed(String),
}

//! Question dispatcher
//!
//! QUESTION → CLASSIFY → BUILD → FETCH → DECODE → FORMAT
//!
//! Produces an [`Answer`] instead of printing so the caller owns presentation.

use crate::analytics::{self, AnalyticsSource};
use crate::classifier::{Classification, IntentClassifier};
use crate::error::AgentError;
use crate::format;
use crate::models::{AnalyticsRecords, FetchOutcome, IntentParameters};
use crate::query::{QueryBuilder, TOP_HOLDERS_LIMIT};
use std::sync::Arc;
use tracing::{debug, info};

/// What a question resolved to, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Header plus one formatted line per row
    Rows { header: String, lines: Vec<String> },
    /// The service answered but had nothing for this request
    NoData(String),
    /// Transport, service or decode failure, already logged
    Failed(String),
    /// The question is missing a field its intent needs; no request was made
    InvalidParameters(String),
    /// No rule matched; no request was made
    Unsupported(String),
}

pub struct Dispatcher {
    source: Arc<dyn AnalyticsSource>,
}

impl Dispatcher {
    pub fn new(source: Arc<dyn AnalyticsSource>) -> Self {
        Self { source }
    }

    /// Classify a question, run the matching analytics query and format the rows
    pub async fn classify_and_dispatch(&self, question: &str) -> Answer {
        self.dispatch_with(question, QueryBuilder::now()).await
    }

    pub async fn dispatch_with(&self, question: &str, builder: QueryBuilder) -> Answer {
        let params = match IntentClassifier::resolve(question) {
            Ok(Classification::Supported(params)) => params,
            Ok(Classification::Unsupported) => {
                info!("Question matched no supported intent");
                return Answer::Unsupported(format!("Unsupported question: \"{}\"", question));
            }
            Err(AgentError::InvalidParameters(message)) => {
                info!(%message, "Question is missing required parameters");
                return Answer::InvalidParameters(message);
            }
            Err(other) => return Answer::Failed(other.to_string()),
        };

        info!(intent = %params.intent(), "Dispatching question");

        let doc = builder.build(&params);
        debug!(query = %doc.text, "Built analytics query");

        match analytics::fetch(self.source.as_ref(), &doc).await {
            FetchOutcome::Rows(records) => render(&params, &records),
            FetchOutcome::Empty => Answer::NoData(no_data_message(&params)),
            FetchOutcome::Failed(reason) => {
                Answer::Failed(format!("Analytics request failed: {}", reason))
            }
        }
    }
}

fn no_data_message(params: &IntentParameters) -> String {
    match params {
        IntentParameters::MarketCapLookup { search_term, .. } => {
            format!("No data found for search term: \"{}\"", search_term)
        }
        IntentParameters::TopHolders { mint_address } => {
            format!("No data found for top holders of: {}", mint_address)
        }
        IntentParameters::TopBuyers { mint_address, .. } => {
            format!("No data found for top buyers of: {}", mint_address)
        }
        IntentParameters::Trending => "No trending tokens found.".to_string(),
    }
}

fn header(params: &IntentParameters) -> String {
    match params {
        IntentParameters::MarketCapLookup { search_term, .. } => {
            format!("Market Data for: \"{}\"", search_term)
        }
        IntentParameters::TopHolders { mint_address } => {
            format!("Top {} holders for: {}", TOP_HOLDERS_LIMIT, mint_address)
        }
        IntentParameters::TopBuyers {
            mint_address,
            result_count,
        } => format!("Top {} buyers for: {}", result_count, mint_address),
        IntentParameters::Trending => "Top 5 Trending Tokens 24h:".to_string(),
    }
}

fn render(params: &IntentParameters, records: &AnalyticsRecords) -> Answer {
    let lines: Vec<String> = match records {
        AnalyticsRecords::MarketCap(rows) => rows.iter().map(format::marketcap_line).collect(),
        AnalyticsRecords::Holders(rows) => rows.iter().map(format::holder_line).collect(),
        AnalyticsRecords::Buyers(rows) => rows.iter().map(format::buyer_line).collect(),
        AnalyticsRecords::Trending(rows) => rows.iter().map(format::trending_line).collect(),
    };

    if lines.is_empty() {
        return Answer::NoData(no_data_message(params));
    }

    Answer::Rows {
        header: header(params),
        lines,
    }
}

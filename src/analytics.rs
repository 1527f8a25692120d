//! Bitquery analytics client
//!
//! Sends one GraphQL document per call and hands back the raw JSON tree.
//! [`decode`] turns that tree into typed rows for the intent that asked.

use crate::config::Config;
use crate::error::AgentError;
use crate::models::{
    AnalyticsRecords, BuyerRecord, FetchOutcome, HolderRecord, MarketCapRecord, TrendingRecord,
};
use crate::query::{QueryDocument, ResultField};
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Anything that can answer a query document with a JSON tree
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn execute(&self, doc: &QueryDocument) -> Result<Value>;
}

/// Reusable Bitquery client (connection-pooled)
pub struct BitqueryClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl BitqueryClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.analytics_api_key.clone(),
            endpoint: config.analytics_endpoint.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[async_trait]
impl AnalyticsSource for BitqueryClient {
    async fn execute(&self, doc: &QueryDocument) -> Result<Value> {
        info!(field = doc.field.as_str(), "Calling Bitquery API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("X-API-KEY", &self.api_key)
            .json(&QueryRequest { query: &doc.text })
            .send()
            .await
            .map_err(|e| {
                error!("Bitquery request failed: {}", e);
                AgentError::NetworkFailure(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Bitquery returned a non-success status");
            return Err(AgentError::ServiceError(format!(
                "API request failed: {}",
                status
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse Bitquery response: {}", e);
            AgentError::DecodeError(format!("Bitquery response is not JSON: {}", e))
        })
    }
}

/// Execute a document and decode it, folding every fault into `FetchOutcome::Failed`
pub async fn fetch(source: &dyn AnalyticsSource, doc: &QueryDocument) -> FetchOutcome {
    let outcome = source
        .execute(doc)
        .await
        .and_then(|body| decode(doc.field, &body));

    match outcome {
        Ok(Some(records)) => FetchOutcome::Rows(records),
        Ok(None) => FetchOutcome::Empty,
        Err(e) => {
            warn!(field = doc.field.as_str(), error = %e, "Analytics fetch degraded to failure");
            FetchOutcome::Failed(e.to_string())
        }
    }
}

//
// ================= Response decoding =================
//

/// Navigate `data.Solana.<field>` and decode its rows.
///
/// Any break in that path, or an empty array, is `Ok(None)`: no data, not an
/// error. Only the rows themselves go through a strict decode.
pub fn decode(field: ResultField, body: &Value) -> Result<Option<AnalyticsRecords>> {
    log_query_errors(field, body);

    let rows = match body.pointer(&format!("/data/Solana/{}", field.as_str())) {
        Some(Value::Array(rows)) if !rows.is_empty() => Value::Array(rows.clone()),
        Some(Value::Array(_)) | Some(Value::Null) | None => {
            debug!(field = field.as_str(), "No rows in Bitquery response");
            return Ok(None);
        }
        Some(other) => {
            return Err(AgentError::DecodeError(format!(
                "{} is not a list: {}",
                field.as_str(),
                other
            )))
        }
    };

    let records = match field {
        ResultField::TokenSupplyUpdates => AnalyticsRecords::MarketCap(
            decode_rows::<SupplyRow>(field, rows)?
                .into_iter()
                .map(SupplyRow::into_record)
                .collect(),
        ),
        ResultField::BalanceUpdates => AnalyticsRecords::Holders(
            decode_rows::<BalanceRow>(field, rows)?
                .into_iter()
                .map(BalanceRow::into_record)
                .collect(),
        ),
        ResultField::DexTrades => AnalyticsRecords::Buyers(
            decode_rows::<TradeRow>(field, rows)?
                .into_iter()
                .map(TradeRow::into_record)
                .collect(),
        ),
        ResultField::DexTradeByTokens => AnalyticsRecords::Trending(
            decode_rows::<TokenTradeRow>(field, rows)?
                .into_iter()
                .map(TokenTradeRow::into_record)
                .collect(),
        ),
    };

    Ok(Some(records))
}

/// GraphQL `errors` ride along with a 200; they are logged, never raised
fn log_query_errors(field: ResultField, body: &Value) {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return;
    };
    if errors.is_empty() {
        return;
    }
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();
    warn!(field = field.as_str(), errors = ?messages, "Bitquery reported query errors");
}

fn decode_rows<T: DeserializeOwned>(field: ResultField, rows: Value) -> Result<Vec<T>> {
    serde_json::from_value(rows)
        .map_err(|e| AgentError::DecodeError(format!("bad {} row: {}", field.as_str(), e)))
}

/// Bitquery sends most numerics as strings
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Currency {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    mint_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SupplyRow {
    #[serde(default)]
    token_supply_update: Option<SupplyUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SupplyUpdate {
    #[serde(default, deserialize_with = "lenient_f64")]
    marketcap: Option<f64>,
    #[serde(default)]
    currency: Option<Currency>,
}

impl SupplyRow {
    fn into_record(self) -> MarketCapRecord {
        let Some(update) = self.token_supply_update else {
            return MarketCapRecord::default();
        };
        let currency = update.currency.unwrap_or_default();
        MarketCapRecord {
            symbol: currency.symbol,
            mint_address: currency.mint_address,
            marketcap: update.marketcap,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BalanceRow {
    #[serde(default)]
    balance_update: Option<BalanceUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BalanceUpdate {
    #[serde(default)]
    account: Option<Account>,
    #[serde(default, deserialize_with = "lenient_f64")]
    holding: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Account {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    token: Option<TokenAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenAccount {
    #[serde(default)]
    owner: Option<String>,
}

impl BalanceRow {
    fn into_record(self) -> HolderRecord {
        let Some(update) = self.balance_update else {
            return HolderRecord::default();
        };
        HolderRecord {
            address: update.account.and_then(|a| a.address),
            holding: update.holding,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TradeRow {
    #[serde(default)]
    trade: Option<BuyTrade>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BuyTrade {
    #[serde(default)]
    buy: Option<BuySide>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BuySide {
    #[serde(default, deserialize_with = "lenient_text")]
    amount: Option<String>,
    #[serde(default)]
    account: Option<Account>,
}

impl TradeRow {
    fn into_record(self) -> BuyerRecord {
        let Some(buy) = self.trade.and_then(|t| t.buy) else {
            return BuyerRecord::default();
        };
        BuyerRecord {
            amount: buy.amount,
            owner: buy.account.and_then(|a| a.token).and_then(|t| t.owner),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenTradeRow {
    #[serde(default)]
    trade: Option<TokenTrade>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TokenTrade {
    #[serde(default)]
    currency: Option<Currency>,
}

impl TokenTradeRow {
    fn into_record(self) -> TrendingRecord {
        let currency = self
            .trade
            .and_then(|t| t.currency)
            .unwrap_or_default();
        TrendingRecord {
            name: currency.name,
            symbol: currency.symbol,
            mint_address: currency.mint_address,
        }
    }
}

//! Bitquery query builder
//!
//! One fixed GraphQL template per intent. Parameters are interpolated as-is:
//! callers pass values that already passed the classifier's shape checks.

use crate::classifier::MAX_MARKETCAP_RESULTS;
use crate::models::IntentParameters;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Rows returned by the top holders query
pub const TOP_HOLDERS_LIMIT: u32 = 10;
/// Rows returned by the trending query
pub const TRENDING_LIMIT: u32 = 5;
/// Quote currency for the trending query (wrapped SOL)
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Field under `data.Solana` that carries the rows of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultField {
    TokenSupplyUpdates,
    BalanceUpdates,
    DexTrades,
    DexTradeByTokens,
}

impl ResultField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultField::TokenSupplyUpdates => "TokenSupplyUpdates",
            ResultField::BalanceUpdates => "BalanceUpdates",
            ResultField::DexTrades => "DEXTrades",
            ResultField::DexTradeByTokens => "DEXTradeByTokens",
        }
    }
}

/// A ready-to-send query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    pub field: ResultField,
    pub text: String,
}

/// Builds query documents relative to a fixed reference time.
///
/// Only the trending template depends on the clock; everything else is a
/// pure function of the parameters.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    reference_time: DateTime<Utc>,
}

impl QueryBuilder {
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        Self { reference_time }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn build(&self, params: &IntentParameters) -> QueryDocument {
        match params {
            IntentParameters::MarketCapLookup {
                search_term,
                result_count,
            } => marketcap_query(search_term, *result_count),
            IntentParameters::TopHolders { mint_address } => top_holders_query(mint_address),
            IntentParameters::TopBuyers {
                mint_address,
                result_count,
            } => first_top_buyers_query(mint_address, *result_count),
            IntentParameters::Trending => self.trending_query(),
        }
    }

    fn trending_query(&self) -> QueryDocument {
        let since = timestamp(self.reference_time - Duration::hours(24));
        let recent = timestamp(self.reference_time - Duration::minutes(5));

        let text = format!(
            r#"
query MyQuery {{
  Solana {{
    DEXTradeByTokens(
      where: {{Transaction: {{Result: {{Success: true}}}}, Trade: {{Side: {{Currency: {{MintAddress: {{is: "{quote}"}}}}}}}}, Block: {{Time: {{since: "{since}"}}}}}}
      orderBy: {{}}
      limit: {{count: {limit}}}
    ) {{
      Trade {{
        Currency {{
          Name
          MintAddress
          Symbol
        }}
        start: PriceInUSD
        min5: PriceInUSD(
          minimum: Block_Time
          if: {{Block: {{Time: {{after: "{recent}"}}}}}}
        )
        end: PriceInUSD(maximum: Block_Time)
        Side {{
          Currency {{
            Symbol
            Name
            MintAddress
          }}
        }}
      }}
    }}
  }}
}}"#,
            quote = WRAPPED_SOL_MINT,
            since = since,
            recent = recent,
            limit = TRENDING_LIMIT,
        );

        QueryDocument {
            field: ResultField::DexTradeByTokens,
            text,
        }
    }
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn marketcap_query(search_term: &str, result_count: u32) -> QueryDocument {
    let count = result_count.min(MAX_MARKETCAP_RESULTS);

    let text = format!(
        r#"
  query MyQuery {{
    Solana {{
      TokenSupplyUpdates(
        where: {{TokenSupplyUpdate: {{Currency: {{MintAddress: {{includes: "{term}"}}}}}}}}
        orderBy: {{descending: Block_Time, descendingByField: "TokenSupplyUpdate_Marketcap"}}
        limitBy: {{by: TokenSupplyUpdate_Currency_MintAddress, count: 1}}
        limit: {{count: {count}}}
      ) {{
        TokenSupplyUpdate {{
          Marketcap: PostBalanceInUSD
          Currency {{
            Symbol
            MintAddress
          }}
        }}
      }}
    }}
  }}"#,
        term = search_term,
        count = count,
    );

    QueryDocument {
        field: ResultField::TokenSupplyUpdates,
        text,
    }
}

fn top_holders_query(mint_address: &str) -> QueryDocument {
    let text = format!(
        r#"
  query MyQuery {{
    Solana(dataset: realtime) {{
      BalanceUpdates(
        limit: {{ count: {limit} }}
        orderBy: {{ descendingByField: "BalanceUpdate_Holding_maximum" }}
        where: {{
          BalanceUpdate: {{
            Currency: {{
              MintAddress: {{ is: "{mint}" }}
            }}
          }}
          Transaction: {{ Result: {{ Success: true }} }}
        }}
      ) {{
        BalanceUpdate {{
          Account {{
            Address
          }}
          Holding: PostBalance(maximum: Block_Slot)
        }}
      }}
    }}
  }}"#,
        limit = TOP_HOLDERS_LIMIT,
        mint = mint_address,
    );

    QueryDocument {
        field: ResultField::BalanceUpdates,
        text,
    }
}

fn first_top_buyers_query(mint_address: &str, result_count: u32) -> QueryDocument {
    let text = format!(
        r#"
  query MyQuery {{
    Solana {{
      DEXTrades(
        where: {{
          Trade: {{
            Buy: {{
              Currency: {{
                MintAddress: {{ is: "{mint}" }}
              }}
            }}
          }}
        }}
        limit: {{ count: {count} }}
        orderBy: {{ ascending: Block_Time }}
      ) {{
        Trade {{
          Buy {{
            Amount
            Account {{
              Token {{
                Owner
              }}
            }}
          }}
        }}
      }}
    }}
  }}"#,
        mint = mint_address,
        count = result_count,
    );

    QueryDocument {
        field: ResultField::DexTrades,
        text,
    }
}

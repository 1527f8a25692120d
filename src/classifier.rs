//! Intent Classifier
//!
//! Maps a free-text question onto one of the supported intents using an
//! ordered rule table. Rules are evaluated top to bottom and the first match
//! wins, so a question mentioning both "Marketcap" and "Trending" is a
//! market-cap lookup.

use crate::error::AgentError;
use crate::models::{Intent, IntentParameters};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_RESULT_COUNT: u32 = 10;
pub const MAX_MARKETCAP_RESULTS: u32 = 30;

pub const MISSING_TERM_MESSAGE: &str = "Please provide a valid search term.";
pub const MISSING_MINT_MESSAGE: &str = "Please provide a valid MintAddress in the question.";

lazy_static! {
    static ref MARKETCAP: Regex = Regex::new(r"(?i)marketcap").expect("valid regex");
    static ref TOP_HOLDERS: Regex = Regex::new(r"(?i)top.*holders").expect("valid regex");
    static ref FIRST_TOP_BUYERS: Regex =
        Regex::new(r"(?i)first.*top.*buyers").expect("valid regex");
    static ref TRENDING: Regex = Regex::new(r"(?i)trending").expect("valid regex");

    static ref COUNT_FIELD: Regex = Regex::new(r"(?i)count:\s*(\d+)").expect("valid regex");
    static ref TERM_FIELD: Regex = Regex::new(r#"(?i)term:\s*"([^"]+)""#).expect("valid regex");
    static ref FIRST_TOP_COUNT: Regex =
        Regex::new(r"(?i)first.*top\s*(\d+)").expect("valid regex");
    static ref MINT_ADDRESS: Regex = Regex::new(r"[A-Za-z0-9]{32,44}").expect("valid regex");
}

/// Result of classifying a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Supported(IntentParameters),
    Unsupported,
}

/// One entry of the priority table
struct Rule {
    intent: Intent,
    matches: fn(&str) -> bool,
    extract: fn(&str) -> Result<IntentParameters>,
}

/// Priority order. Earlier rules shadow later ones.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::MarketCapLookup,
        matches: mentions_marketcap,
        extract: extract_marketcap,
    },
    Rule {
        intent: Intent::TopHolders,
        matches: mentions_top_holders,
        extract: extract_top_holders,
    },
    Rule {
        intent: Intent::TopBuyers,
        matches: mentions_first_top_buyers,
        extract: extract_top_buyers,
    },
    Rule {
        intent: Intent::Trending,
        matches: mentions_trending,
        extract: extract_trending,
    },
];

pub struct IntentClassifier;

impl IntentClassifier {
    /// Which intent a question maps to, without extracting parameters
    pub fn classify(question: &str) -> Intent {
        RULES
            .iter()
            .find(|rule| (rule.matches)(question))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unsupported)
    }

    /// Classify and extract parameters.
    ///
    /// Returns `InvalidParameters` when the matched intent needs a field the
    /// question does not carry.
    pub fn resolve(question: &str) -> Result<Classification> {
        match RULES.iter().find(|rule| (rule.matches)(question)) {
            Some(rule) => (rule.extract)(question).map(Classification::Supported),
            None => Ok(Classification::Unsupported),
        }
    }
}

fn mentions_marketcap(text: &str) -> bool {
    MARKETCAP.is_match(text)
}

fn mentions_top_holders(text: &str) -> bool {
    TOP_HOLDERS.is_match(text)
}

fn mentions_first_top_buyers(text: &str) -> bool {
    FIRST_TOP_BUYERS.is_match(text)
}

fn mentions_trending(text: &str) -> bool {
    TRENDING.is_match(text)
}

fn extract_marketcap(text: &str) -> Result<IntentParameters> {
    let search_term = extract_term(text)
        .ok_or_else(|| AgentError::InvalidParameters(MISSING_TERM_MESSAGE.to_string()))?;

    let result_count = extract_count(text)
        .unwrap_or(DEFAULT_RESULT_COUNT)
        .clamp(1, MAX_MARKETCAP_RESULTS);

    Ok(IntentParameters::MarketCapLookup {
        search_term,
        result_count,
    })
}

fn extract_top_holders(text: &str) -> Result<IntentParameters> {
    let mint_address = require_mint_address(text)?;
    Ok(IntentParameters::TopHolders { mint_address })
}

fn extract_top_buyers(text: &str) -> Result<IntentParameters> {
    let mint_address = require_mint_address(text)?;

    let result_count = capture_count(&FIRST_TOP_COUNT, text)
        .or_else(|| extract_count(text))
        .unwrap_or(DEFAULT_RESULT_COUNT);

    Ok(IntentParameters::TopBuyers {
        mint_address,
        result_count,
    })
}

fn extract_trending(_text: &str) -> Result<IntentParameters> {
    Ok(IntentParameters::Trending)
}

/// `count: <n>` anywhere in the text
pub fn extract_count(text: &str) -> Option<u32> {
    capture_count(&COUNT_FIELD, text)
}

/// `term: "<text>"` anywhere in the text
pub fn extract_term(text: &str) -> Option<String> {
    TERM_FIELD
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First token-address-shaped run of 32 to 44 alphanumerics
pub fn extract_mint_address(text: &str) -> Option<String> {
    MINT_ADDRESS.find(text).map(|m| m.as_str().to_string())
}

fn require_mint_address(text: &str) -> Result<String> {
    extract_mint_address(text)
        .ok_or_else(|| AgentError::InvalidParameters(MISSING_MINT_MESSAGE.to_string()))
}

fn capture_count(pattern: &Regex, text: &str) -> Option<u32> {
    let digits = pattern.captures(text)?.get(1)?.as_str();
    // Digits only, so the sole parse failure is overflow
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";

    #[test]
    fn test_classification_order() {
        let cases = vec![
            ("Marketcap count: 3 term: \"pump\"", Intent::MarketCapLookup),
            ("what is trending and its marketcap", Intent::MarketCapLookup),
            ("Show the top 10 holders of X", Intent::TopHolders),
            ("First top 5 buyers of X", Intent::TopBuyers),
            ("Trending tokens today", Intent::Trending),
            ("hello there", Intent::Unsupported),
        ];

        for (question, expected) in cases {
            assert_eq!(IntentClassifier::classify(question), expected, "{}", question);
        }
    }

    #[test]
    fn test_marketcap_priority_over_other_keywords() {
        let question = format!(
            "Trending Top holders First top buyers MARKETCAP term: \"abc\" {}",
            MINT
        );
        let resolved = IntentClassifier::resolve(&question).unwrap();
        assert_eq!(
            resolved,
            Classification::Supported(IntentParameters::MarketCapLookup {
                search_term: "abc".to_string(),
                result_count: DEFAULT_RESULT_COUNT,
            })
        );
    }

    #[test]
    fn test_holders_shadow_buyers() {
        // "top ... holders" is tested before "first ... top ... buyers"
        let question = format!("First top holders and buyers for {}", MINT);
        assert_eq!(IntentClassifier::classify(&question), Intent::TopHolders);
    }

    #[test]
    fn test_marketcap_count_clamped() {
        let resolved = IntentClassifier::resolve("Marketcap count: 1000 term: \"sol\"").unwrap();
        assert_eq!(
            resolved,
            Classification::Supported(IntentParameters::MarketCapLookup {
                search_term: "sol".to_string(),
                result_count: MAX_MARKETCAP_RESULTS,
            })
        );

        let zero = IntentClassifier::resolve("marketcap count:0 term:\"sol\"").unwrap();
        assert!(matches!(
            zero,
            Classification::Supported(IntentParameters::MarketCapLookup { result_count: 1, .. })
        ));

        let overflow =
            IntentClassifier::resolve("marketcap count: 99999999999999 term: \"sol\"").unwrap();
        assert!(matches!(
            overflow,
            Classification::Supported(IntentParameters::MarketCapLookup { result_count: 30, .. })
        ));
    }

    #[test]
    fn test_marketcap_requires_term() {
        let err = IntentClassifier::resolve("Marketcap count: 5").unwrap_err();
        match err {
            AgentError::InvalidParameters(msg) => assert_eq!(msg, MISSING_TERM_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }

        // Empty quotes do not count as a term
        assert!(IntentClassifier::resolve("Marketcap term: \"\"").is_err());
    }

    #[test]
    fn test_mint_required_for_holders_and_buyers() {
        for question in ["Top holders of shortaddr", "First top 3 buyers of abc"] {
            match IntentClassifier::resolve(question) {
                Err(AgentError::InvalidParameters(msg)) => assert_eq!(msg, MISSING_MINT_MESSAGE),
                other => panic!("unexpected result for {question}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_top_holders_extracts_mint() {
        let resolved =
            IntentClassifier::resolve(&format!("Top holders of {}?", MINT)).unwrap();
        assert_eq!(
            resolved,
            Classification::Supported(IntentParameters::TopHolders {
                mint_address: MINT.to_string(),
            })
        );
    }

    #[test]
    fn test_top_buyers_count_sources() {
        let anchored = IntentClassifier::resolve(&format!("First top 7 buyers of {}", MINT));
        assert!(matches!(
            anchored,
            Ok(Classification::Supported(IntentParameters::TopBuyers { result_count: 7, .. }))
        ));

        let labeled =
            IntentClassifier::resolve(&format!("First top buyers of {} count: 4", MINT));
        assert!(matches!(
            labeled,
            Ok(Classification::Supported(IntentParameters::TopBuyers { result_count: 4, .. }))
        ));

        let both =
            IntentClassifier::resolve(&format!("First top 12 buyers {} count: 4", MINT));
        assert!(matches!(
            both,
            Ok(Classification::Supported(IntentParameters::TopBuyers { result_count: 12, .. }))
        ));

        let default = IntentClassifier::resolve(&format!("first TOP buyers {}", MINT));
        assert!(matches!(
            default,
            Ok(Classification::Supported(IntentParameters::TopBuyers { result_count: 10, .. }))
        ));
    }

    #[test]
    fn test_mint_address_shape() {
        assert_eq!(extract_mint_address("nothing here"), None);
        assert_eq!(extract_mint_address(&"a".repeat(31)), None);
        assert_eq!(extract_mint_address(&"b".repeat(32)), Some("b".repeat(32)));
        // Longer runs are cut at 44 characters
        assert_eq!(extract_mint_address(&"c".repeat(50)), Some("c".repeat(44)));
    }

    #[test]
    fn test_field_extractors() {
        assert_eq!(extract_count("COUNT:  25 more"), Some(25));
        assert_eq!(extract_count("count: many"), None);
        assert_eq!(extract_term(r#"Term: "dog wif hat""#), Some("dog wif hat".to_string()));
        assert_eq!(extract_term("term: unquoted"), None);
    }

    #[test]
    fn test_unsupported_and_trending() {
        assert_eq!(
            IntentClassifier::resolve("What is the price of SOL?").unwrap(),
            Classification::Unsupported
        );
        assert_eq!(
            IntentClassifier::resolve("show TRENDING").unwrap(),
            Classification::Supported(IntentParameters::Trending)
        );
    }
}

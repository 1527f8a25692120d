//! Command-line argument parsing.
//!
//! Two shapes are accepted besides `register`: `list`, and
//! `<agent_name> ask <question...>`. The second is captured as an external
//! subcommand because the agent name sits where a subcommand would.

use crate::agent::CLI_NAME;
use crate::error::AgentError;
use crate::Result;
use clap::{Parser, Subcommand};

pub const USAGE: &str = "Usage:\n\
List agents:     onchainbrain list\n\
Ask question:    onchainbrain {agent_name} ask \"Your question\"\n\
Register agent:  onchainbrain register {agent_name} [--personality <p>]";

/// OnChainBrain: ask registered agents about Solana tokens.
#[derive(Parser, Debug)]
#[command(name = CLI_NAME)]
#[command(version, about, long_about = None)]
#[command(after_help = r#"Examples:
  onchainbrain list
  onchainbrain alpha ask "Marketcap count: 5 term: \"pump\""
  onchainbrain alpha ask "Top holders of 6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN"
  onchainbrain alpha ask "First top 20 buyers of 6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN"
  onchainbrain alpha ask "Trending tokens"
"#)]
pub struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every registered agent.
    List,

    /// Register an agent in the OnChainBrain registry.
    Register {
        /// Agent name.
        name: String,

        /// Agent personality (defaults to "neutral").
        #[arg(short, long)]
        personality: Option<String>,
    },

    /// `<agent_name> ask <question...>`
    #[command(external_subcommand)]
    Agent(Vec<String>),
}

/// A validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    List,
    Register {
        name: String,
        personality: Option<String>,
    },
    Ask {
        agent_name: String,
        question: String,
    },
}

impl Cli {
    pub fn invocation(self) -> Result<Invocation> {
        match self.command {
            Commands::List => Ok(Invocation::List),
            Commands::Register { name, personality } => {
                Ok(Invocation::Register { name, personality })
            }
            Commands::Agent(args) => parse_ask(&args),
        }
    }
}

fn parse_ask(args: &[String]) -> Result<Invocation> {
    match args {
        [agent_name, verb, words @ ..] if verb == "ask" && !words.is_empty() => {
            let question = words.join(" ");
            if question.trim().is_empty() {
                return Err(AgentError::Usage("The question must not be empty.".to_string()));
            }
            Ok(Invocation::Ask {
                agent_name: agent_name.clone(),
                question,
            })
        }
        _ => Err(AgentError::Usage(format!(
            "Unrecognized command: {}",
            args.join(" ")
        ))),
    }
}

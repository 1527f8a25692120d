//! Entry orchestrator
//!
//! CHECK AGENT → LOAD PROFILE → DISPATCH → REPORT
//!
//! Registry faults never stop the process: a failed existence check reads as
//! "not found", a failed profile fetch reads as the neutral personality and a
//! failed listing reads as an empty one.

use crate::dispatch::{Answer, Dispatcher};
use crate::models::{personality_or_default, AgentDetails, DEFAULT_PERSONALITY};
use crate::registry::AgentRegistry;
use tracing::{info, info_span, warn, Instrument};

pub const CLI_NAME: &str = "onchainbrain";

/// Which console stream a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Ordered console output of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<(Stream, String)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn out(&mut self, line: impl Into<String>) {
        self.lines.push((Stream::Stdout, line.into()));
    }

    fn err(&mut self, line: impl Into<String>) {
        self.lines.push((Stream::Stderr, line.into()));
    }

    pub fn stdout(&self) -> Vec<&str> {
        self.on(Stream::Stdout)
    }

    pub fn stderr(&self) -> Vec<&str> {
        self.on(Stream::Stderr)
    }

    fn on(&self, stream: Stream) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    /// Write every line to its stream, in order
    pub fn print(&self) {
        for (stream, line) in &self.lines {
            match stream {
                Stream::Stdout => println!("{}", line),
                Stream::Stderr => eprintln!("{}", line),
            }
        }
    }
}

pub struct Orchestrator {
    registry: Box<dyn AgentRegistry>,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(registry: Box<dyn AgentRegistry>, dispatcher: Dispatcher) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// Answer a question on behalf of a registered agent
    pub async fn ask(&self, agent_name: &str, question: &str) -> Transcript {
        let mut transcript = Transcript::new();

        if !self.agent_exists(agent_name).await {
            transcript.err(format!(
                "Agent \"{}\" is not found in the database. Please verify the name and try again, \
                 or register such agent on the OnChainBrain Framework",
                agent_name
            ));
            return transcript;
        }

        // Personality only tags the span below.
        let personality = self.personality(agent_name).await;

        let span = info_span!("ask", agent = %agent_name, personality = %personality);
        let answer = self
            .dispatcher
            .classify_and_dispatch(question)
            .instrument(span)
            .await;

        present(&mut transcript, answer);
        transcript
    }

    /// Enumerate registered agents
    pub async fn list_agents(&self) -> Transcript {
        let mut transcript = Transcript::new();

        let agents = match self.registry.list().await {
            Ok(agents) => agents,
            Err(e) => {
                warn!(error = %e, "Failed to fetch agents; treating listing as empty");
                Vec::new()
            }
        };

        if agents.is_empty() {
            transcript.out("No agents found in the OnChainBrain Framework.");
            return transcript;
        }

        transcript.out("");
        transcript.out("Registered OnChainBrain Agents:");
        transcript.out("==============================");
        for (index, agent) in agents.iter().enumerate() {
            transcript.out(format!(
                "{}. {} | Personality: {}",
                index + 1,
                agent.name,
                agent.personality_or_default()
            ));
        }
        transcript.out("");
        transcript.out("To interact with an agent, use:");
        transcript.out(format!("{} {{agent_name}} ask \"Your question\"", CLI_NAME));

        transcript
    }

    /// Register (or overwrite) an agent in the registry
    pub async fn register(&self, agent_name: &str, personality: Option<&str>) -> Transcript {
        let mut transcript = Transcript::new();
        let details = AgentDetails {
            personality: personality_or_default(personality).to_string(),
        };

        match self.registry.store(agent_name, &details).await {
            Ok(()) => {
                info!(agent = %agent_name, "Agent stored");
                transcript.out(format!("Agent \"{}\" successfully stored.", agent_name));
            }
            Err(e) => {
                warn!(agent = %agent_name, error = %e, "Failed to store agent");
                transcript.err(format!("Error storing agent details: {}", e));
            }
        }

        transcript
    }

    async fn agent_exists(&self, agent_name: &str) -> bool {
        match self.registry.exists(agent_name).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(agent = %agent_name, error = %e, "Existence check failed; assuming absent");
                false
            }
        }
    }

    async fn personality(&self, agent_name: &str) -> String {
        match self.registry.agent(agent_name).await {
            Ok(profile) => personality_or_default(profile.personality.as_deref()).to_string(),
            Err(e) => {
                warn!(agent = %agent_name, error = %e, "Agent profile unavailable; using default personality");
                DEFAULT_PERSONALITY.to_string()
            }
        }
    }
}

fn present(transcript: &mut Transcript, answer: Answer) {
    match answer {
        Answer::Rows { header, lines } => {
            transcript.out(header);
            for line in lines {
                transcript.out(line);
            }
        }
        Answer::NoData(message) | Answer::InvalidParameters(message) | Answer::Unsupported(message) => {
            transcript.out(message)
        }
        Answer::Failed(message) => transcript.err(message),
    }
}

//! Build report
//!
//! Append-only record of what happened to every project in a session, in
//! the order the scheduler decided it.

use std::fmt;

use serde::Serialize;

/// Why a project was failed without being compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    /// A direct dependency failed
    DependencyFailed { dependency: String },
    /// Waiting only on projects that can never be built (cycle or cascade)
    Unsatisfiable { waiting_on: Vec<String> },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DependencyFailed { dependency } => {
                write!(f, "dependency '{dependency}' failed")
            }
            Self::Unsatisfiable { waiting_on } => {
                write!(f, "waiting on unbuildable {}", waiting_on.join(", "))
            }
        }
    }
}

/// Final state of one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Compiled with zero errors
    Built,
    /// Compiler reported errors
    CompileFailed { error_count: u32 },
    /// Compiler output had no recognizable error count
    Unclassified,
    /// Compiler exceeded the configured wait
    TimedOut { seconds: u64 },
    /// Compiler could not be run for this project
    InvocationFailed { message: String },
    /// Never attempted
    Blocked { reason: BlockReason },
}

impl Outcome {
    /// Whether the project ended up built
    pub fn is_built(&self) -> bool {
        matches!(self, Self::Built)
    }

    /// Whether the compiler was run for this project
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::Blocked { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built => write!(f, "built"),
            Self::CompileFailed { error_count } => write!(f, "{error_count} build error(s)"),
            Self::Unclassified => write!(f, "couldn't determine build success"),
            Self::TimedOut { seconds } => write!(f, "timed out after {seconds}s"),
            Self::InvocationFailed { message } => write!(f, "compiler failed to run: {message}"),
            Self::Blocked { reason } => write!(f, "not built, {reason}"),
        }
    }
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEvent {
    /// Project identity
    pub identity: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Ordered outcome list for a whole session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    events: Vec<BuildEvent>,
}

impl BuildReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub(crate) fn record(&mut self, identity: &str, outcome: Outcome) {
        self.events.push(BuildEvent {
            identity: identity.to_string(),
            outcome,
        });
    }

    /// All events in decision order
    pub fn events(&self) -> &[BuildEvent] {
        &self.events
    }

    /// Identities that were built, in build order
    pub fn built(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.outcome.is_built())
            .map(|e| e.identity.as_str())
            .collect()
    }

    /// Identities that failed, in decision order
    pub fn failed(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| !e.outcome.is_built())
            .map(|e| e.identity.as_str())
            .collect()
    }

    /// Outcome recorded for a project
    pub fn outcome(&self, identity: &str) -> Option<&Outcome> {
        self.events
            .iter()
            .find(|e| e.identity == identity)
            .map(|e| &e.outcome)
    }

    /// Whether every project was built
    pub fn is_success(&self) -> bool {
        self.events.iter().all(|e| e.outcome.is_built())
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }
}

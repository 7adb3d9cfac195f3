//! Build scheduling
//!
//! Drives one build session: repeatedly picks the first ready project in
//! input order, compiles it, classifies the result and records it. When no
//! pending project is ready the remainder is failed in bulk, so a session
//! always ends with exactly one report event per project.
//!
//! Projects are compiled one at a time. The scheduler owns all state for the
//! session and is consumed by [`BuildScheduler::run`].

use std::collections::{HashMap, HashSet};
use std::future::Future;

use crate::core::classifier::{classify, Verdict};
use crate::core::graph::DependencyGraph;
use crate::core::project::{ensure_unique_identities, ProjectMetadata};
use crate::core::report::{BlockReason, BuildReport, Outcome};
use crate::error::{InvokeError, LoaderError};

/// Captured result of one compiler run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    /// Captured standard output, the only text that is classified
    pub text: String,
    /// Captured standard error, logged with failures
    pub stderr: String,
    /// Process exit code, if the process exited normally
    pub exit_code: Option<i32>,
}

impl CompileOutput {
    /// Standard output only, with no exit code
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Everything worth writing to the failure log
    pub fn diagnostic(&self) -> String {
        let mut parts: Vec<String> = [&self.text, &self.stderr]
            .into_iter()
            .map(|part| part.trim_end())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(code) = self.exit_code {
            parts.push(format!("Exit code: {code}"));
        }
        parts.join("\n")
    }
}

/// Runs the external compiler for one project
///
/// Returning [`InvokeError::ToolNotFound`] aborts the session. Any other
/// error only fails the project at hand.
pub trait CompilerInvoker {
    /// Compile a project and return its captured output
    fn compile(
        &mut self,
        project: &ProjectMetadata,
    ) -> impl Future<Output = Result<CompileOutput, InvokeError>>;
}

/// Observer for session progress
pub trait BuildListener {
    /// A compile is about to start (`index` counts from 1)
    fn started(&mut self, _identity: &str, _index: usize, _total: usize) {}

    /// A project reached its final state
    ///
    /// `diagnostic` carries the text worth logging for failed or
    /// indeterminate compiles.
    fn finished(&mut self, _identity: &str, _outcome: &Outcome, _diagnostic: Option<&str>) {}
}

/// Listener that ignores everything
#[derive(Debug, Default)]
pub struct NoopListener;

impl BuildListener for NoopListener {}

/// Per-project state, owned by the running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Pending,
    Built,
    Failed,
}

/// Working set for one session
struct BuildSession {
    states: HashMap<String, BuildState>,
    pending: HashSet<String>,
    built: HashSet<String>,
    report: BuildReport,
}

impl BuildSession {
    fn new(graph: &DependencyGraph) -> Self {
        Self {
            states: graph
                .identities()
                .iter()
                .map(|id| (id.clone(), BuildState::Pending))
                .collect(),
            pending: graph.identities().iter().cloned().collect(),
            built: HashSet::new(),
            report: BuildReport::new(),
        }
    }

    fn settle(&mut self, identity: &str, outcome: Outcome) {
        debug_assert_eq!(self.states.get(identity), Some(&BuildState::Pending));

        let state = if outcome.is_built() {
            self.built.insert(identity.to_string());
            BuildState::Built
        } else {
            BuildState::Failed
        };
        self.states.insert(identity.to_string(), state);
        self.pending.remove(identity);
        self.report.record(identity, outcome);
    }

    fn is_failed(&self, identity: &str) -> bool {
        self.states.get(identity) == Some(&BuildState::Failed)
    }
}

/// Dependency-ordered build scheduler
#[derive(Debug)]
pub struct BuildScheduler {
    projects: HashMap<String, ProjectMetadata>,
    graph: DependencyGraph,
}

impl BuildScheduler {
    /// Create a scheduler over loader output
    ///
    /// Input order is the tie-break order when several projects are ready.
    pub fn new(projects: Vec<ProjectMetadata>) -> Result<Self, LoaderError> {
        ensure_unique_identities(&projects)?;
        let graph = DependencyGraph::from_projects(&projects);
        let projects = projects
            .into_iter()
            .map(|p| (p.identity.clone(), p))
            .collect();
        Ok(Self { projects, graph })
    }

    /// The session's dependency graph
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Run the session to completion
    ///
    /// Only [`InvokeError::ToolNotFound`] is returned as an error; every
    /// other failure is recorded in the report.
    pub async fn run<C, L>(self, compiler: &mut C, listener: &mut L) -> Result<BuildReport, InvokeError>
    where
        C: CompilerInvoker,
        L: BuildListener,
    {
        let total = self.graph.len();
        let mut session = BuildSession::new(&self.graph);
        let mut attempted = 0;

        while !session.pending.is_empty() {
            let ready = self.graph.ready(&session.pending, &session.built);
            let Some(&next) = ready.first() else {
                self.fail_remaining(&mut session, listener);
                break;
            };
            tracing::debug!("Ready: {}", ready.join(", "));

            let project = &self.projects[next];
            attempted += 1;
            listener.started(next, attempted, total);
            tracing::info!("Building project {next}");

            let (outcome, diagnostic) = match compiler.compile(project).await {
                Ok(output) => judge(&output),
                Err(e @ InvokeError::ToolNotFound { .. }) => return Err(e),
                Err(InvokeError::TimedOut { program, seconds }) => (
                    Outcome::TimedOut { seconds },
                    Some(format!("{program} timed out after {seconds}s building {next}")),
                ),
                Err(InvokeError::Spawn { program, error }) => {
                    let message = format!("{program}: {error}");
                    (
                        Outcome::InvocationFailed {
                            message: message.clone(),
                        },
                        Some(message),
                    )
                }
            };

            if outcome.is_built() {
                tracing::info!("Built {next}");
            } else {
                tracing::warn!("Build failed for {next}: {outcome}");
            }
            listener.finished(next, &outcome, diagnostic.as_deref());
            session.settle(next, outcome);
        }

        debug_assert_eq!(session.report.len(), total);
        Ok(session.report)
    }

    /// Fail every pending project without compiling it
    fn fail_remaining<L: BuildListener>(&self, session: &mut BuildSession, listener: &mut L) {
        // Grow the doomed set from compile failures until nothing changes
        let mut doomed: HashSet<&str> = self
            .graph
            .identities()
            .iter()
            .filter(|id| session.is_failed(id))
            .map(String::as_str)
            .collect();
        loop {
            let before = doomed.len();
            for id in self.graph.identities() {
                if session.pending.contains(id)
                    && self
                        .graph
                        .dependencies(id)
                        .iter()
                        .any(|d| doomed.contains(d.as_str()))
                {
                    doomed.insert(id.as_str());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let remaining: Vec<&String> = self
            .graph
            .identities()
            .iter()
            .filter(|id| session.pending.contains(*id))
            .collect();
        tracing::warn!(
            "No buildable projects left, failing {} remaining",
            remaining.len()
        );

        for id in remaining {
            let deps = self.graph.dependencies(id);
            let reason = match deps.iter().find(|d| doomed.contains(d.as_str())) {
                Some(dependency) => BlockReason::DependencyFailed {
                    dependency: dependency.clone(),
                },
                None => BlockReason::Unsatisfiable {
                    waiting_on: deps
                        .iter()
                        .filter(|d| !session.built.contains(*d))
                        .cloned()
                        .collect(),
                },
            };
            let outcome = Outcome::Blocked { reason };
            tracing::warn!("{id}: {outcome}");
            listener.finished(id, &outcome, None);
            session.settle(id, outcome);
        }
    }
}

/// Turn captured output into an outcome plus the text worth logging
fn judge(output: &CompileOutput) -> (Outcome, Option<String>) {
    match classify(&output.text) {
        Verdict::Success => (Outcome::Built, None),
        Verdict::Failure {
            error_count: Some(error_count),
        } => (
            Outcome::CompileFailed { error_count },
            Some(output.diagnostic()),
        ),
        Verdict::Failure { error_count: None } => (
            Outcome::Unclassified,
            Some(format!(
                "Couldn't determine build success: {}",
                output.diagnostic()
            )),
        ),
    }
}

use crate::config::LayoutConfig;
use crate::layout::{DagreSolver, Layout, RankSolver, compute_layout_with};
use crate::parser::parse_bpmn;

/// Editor-side state: the last diagram that laid out successfully and at
/// most one pending error.
///
/// Every update re-runs the whole pipeline on the full text. A failed run
/// leaves the previous layout in place.
pub struct Session<S: RankSolver = DagreSolver> {
    config: LayoutConfig,
    solver: S,
    layout: Option<Layout>,
    error: Option<String>,
    revision: u64,
}

impl Session<DagreSolver> {
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_solver(config, DagreSolver)
    }
}

impl Default for Session<DagreSolver> {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl<S: RankSolver> Session<S> {
    pub fn with_solver(config: LayoutConfig, solver: S) -> Self {
        Self {
            config,
            solver,
            layout: None,
            error: None,
            revision: 0,
        }
    }

    /// Runs parse + layout on `text`. Returns `true` when the displayed
    /// layout was replaced.
    pub fn update(&mut self, text: &str) -> bool {
        let doc = parse_bpmn(text);
        match compute_layout_with(&doc, &self.config, &self.solver) {
            Ok(layout) => {
                self.layout = Some(layout);
                self.error = None;
                self.revision += 1;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "layout failed; keeping previous diagram");
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Number of successful replacements so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutError, RankGraph, RankedNode, RankedPositions};
    use std::cell::Cell;

    /// Fails whenever the graph has more than `limit` nodes.
    struct Limited {
        limit: usize,
        calls: Cell<usize>,
    }

    impl RankSolver for Limited {
        fn solve(&self, graph: &RankGraph) -> Result<RankedPositions, LayoutError> {
            self.calls.set(self.calls.get() + 1);
            if graph.nodes.len() > self.limit {
                return Err(LayoutError::SolverPanicked(format!(
                    "too many nodes: {}",
                    graph.nodes.len()
                )));
            }
            Ok(graph
                .nodes
                .iter()
                .map(|n| {
                    (
                        n.id.clone(),
                        RankedNode {
                            x: 0.0,
                            y: 0.0,
                            width: n.width,
                            height: n.height,
                        },
                    )
                })
                .collect())
        }
    }

    fn session(limit: usize) -> Session<Limited> {
        Session::with_solver(
            LayoutConfig::default(),
            Limited {
                limit,
                calls: Cell::new(0),
            },
        )
    }

    #[test]
    fn failure_keeps_previous_layout() {
        let mut session = session(1);
        assert!(session.update("pool: P\ntask: a [P] A"));
        let before = session.layout().cloned();
        assert_eq!(session.revision(), 1);

        assert!(!session.update("pool: P\ntask: a [P] A\ntask: b [P] B"));
        assert_eq!(session.layout().cloned(), before);
        assert_eq!(session.error(), Some("rank solver panicked: too many nodes: 2"));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn newer_error_replaces_older() {
        let mut session = session(0);
        session.update("task: a [P] A");
        session.update("task: a [P] A\ntask: b [P] B");
        assert_eq!(session.error(), Some("rank solver panicked: too many nodes: 2"));
    }

    #[test]
    fn dismissing_does_not_block_next_success() {
        let mut session = session(1);
        session.update("task: a [P] A\ntask: b [P] B");
        assert!(session.layout().is_none());
        session.dismiss_error();
        assert!(session.error().is_none());

        assert!(session.update("pool: P\ntask: a [P] A"));
        assert!(session.error().is_none());
        assert!(session.layout().is_some_and(|l| l.node("a").is_some()));
    }

    #[test]
    fn success_clears_error_and_replaces_layout() {
        let mut session = session(1);
        session.update("task: a [P] A\ntask: b [P] B");
        assert!(session.error().is_some());
        assert!(session.update("pool: Q"));
        assert!(session.error().is_none());
        assert_eq!(session.layout().map(|l| l.nodes.len()), Some(1));
        assert_eq!(session.solver.calls.get(), 1);
    }
}

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use crate::config::LayoutConfig;
use crate::ir::Document;

use super::error::{LayoutError, panic_message};
use super::shapes::shape_info;

#[derive(Debug, Clone, PartialEq)]
pub struct RankNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// Minimal directed graph handed to a [`RankSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankGraph {
    pub nodes: Vec<RankNode>,
    pub edges: Vec<(String, String)>,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin: f32,
}

/// Solver output for one node. `x`/`y` are centers in the solver's own
/// coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RankedNode {
    pub fn right_edge(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

pub type RankedPositions = HashMap<String, RankedNode>;

/// Assigns left-to-right ranks and provisional coordinates.
pub trait RankSolver {
    fn solve(&self, graph: &RankGraph) -> Result<RankedPositions, LayoutError>;
}

/// Default solver backed by dagre with `rankdir = lr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreSolver;

impl RankSolver for DagreSolver {
    fn solve(&self, graph: &RankGraph) -> Result<RankedPositions, LayoutError> {
        if graph.nodes.is_empty() {
            return Ok(RankedPositions::new());
        }
        catch_unwind(AssertUnwindSafe(|| run_dagre(graph)))
            .map_err(|payload| LayoutError::SolverPanicked(panic_message(payload.as_ref())))
    }
}

fn run_dagre(graph: &RankGraph) -> RankedPositions {
    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some("lr".to_string());
    graph_config.nodesep = Some(graph.node_spacing);
    graph_config.ranksep = Some(graph.rank_spacing);
    graph_config.marginx = Some(graph.margin);
    graph_config.marginy = Some(graph.margin);
    dagre_graph.set_graph(graph_config);

    for rank_node in &graph.nodes {
        let mut node = DagreNode::default();
        node.width = rank_node.width;
        node.height = rank_node.height;
        dagre_graph.set_node(rank_node.id.clone(), Some(node));
    }
    for (from, to) in &graph.edges {
        let _ = dagre_graph.set_edge(from, to, Some(DagreEdge::default()), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut positions = RankedPositions::with_capacity(graph.nodes.len());
    for rank_node in &graph.nodes {
        let Some(dagre_node) = dagre_graph.node(&rank_node.id) else {
            continue;
        };
        positions.insert(
            rank_node.id.clone(),
            RankedNode {
                x: dagre_node.x,
                y: dagre_node.y,
                width: rank_node.width,
                height: rank_node.height,
            },
        );
    }
    positions
}

/// Builds the solver graph from the elements at `members` (indices into
/// `doc.elements`). Flows are kept only when both ends are members.
pub(crate) fn build_rank_graph(
    doc: &Document,
    members: &[usize],
    config: &LayoutConfig,
) -> RankGraph {
    let nodes: Vec<RankNode> = members
        .iter()
        .filter_map(|&idx| doc.elements.get(idx))
        .map(|element| {
            let spec = shape_info(&element.kind, &config.shapes).spec;
            RankNode {
                id: element.id.clone(),
                width: spec.width,
                height: spec.height,
            }
        })
        .collect();

    let known: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();
    for flow in &doc.flows {
        let (from, to) = (flow.from.as_str(), flow.to.as_str());
        if from == to || !known.contains(from) || !known.contains(to) {
            continue;
        }
        if seen.insert((from, to)) {
            edges.push((from.to_string(), to.to_string()));
        }
    }

    RankGraph {
        nodes,
        edges,
        node_spacing: config.node_spacing,
        rank_spacing: config.rank_spacing,
        margin: config.solver_margin,
    }
}

/// Validates sizing, runs the solver, and checks that every node came back
/// with a usable coordinate.
pub(crate) fn rank(graph: &RankGraph, solver: &dyn RankSolver) -> Result<RankedPositions, LayoutError> {
    for node in &graph.nodes {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(node.width) || !valid(node.height) {
            return Err(LayoutError::InvalidSizing {
                id: node.id.clone(),
                width: node.width,
                height: node.height,
            });
        }
    }
    if graph.nodes.is_empty() {
        return Ok(RankedPositions::new());
    }

    let positions = solver.solve(graph)?;
    for node in &graph.nodes {
        let usable = positions
            .get(&node.id)
            .is_some_and(|pos| pos.x.is_finite() && pos.y.is_finite() && pos.width.is_finite());
        if !usable {
            return Err(LayoutError::MissingPosition {
                id: node.id.clone(),
            });
        }
    }
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "rank solver finished"
    );
    Ok(positions)
}

mod containment;
mod edges;
mod error;
mod grid;
mod ranking;
mod shapes;
pub(crate) mod types;

pub use containment::{Bucket, resolve_containment};
pub use error::LayoutError;
pub use ranking::{DagreSolver, RankGraph, RankNode, RankSolver, RankedNode, RankedPositions};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::Document;
use std::collections::HashSet;

/// Lays out `doc` with the dagre-backed rank solver.
pub fn compute_layout(doc: &Document, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    compute_layout_with(doc, config, &DagreSolver)
}

/// Lays out `doc`, delegating flow ranking to `solver`.
///
/// A pure function of its inputs: the same document, config and solver
/// output always produce the same layout.
pub fn compute_layout_with(
    doc: &Document,
    config: &LayoutConfig,
    solver: &dyn RankSolver,
) -> Result<Layout, LayoutError> {
    let members = layout_members(doc);
    let graph = ranking::build_rank_graph(doc, &members, config);
    let positions = ranking::rank(&graph, solver)?;

    let buckets = resolve_containment(doc);
    let plans = grid::plan_pools(doc, &buckets, &members);
    let grid_width = grid::grid_width(&positions, config);
    let ctx = grid::GridContext {
        doc,
        positions: &positions,
        config,
        grid_width,
    };
    let (nodes, height) = grid::compose(&ctx, &plans);
    let edges = edges::build_edges(doc);

    tracing::debug!(
        pools = plans.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        grid_width,
        "computed layout"
    );
    Ok(Layout {
        nodes,
        edges,
        grid_width,
        width: grid_width + config.pool_header_width,
        height,
    })
}

/// Element indices that take part in layout: the first definition of each
/// id, in document order.
fn layout_members(doc: &Document) -> Vec<usize> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(doc.elements.len());
    doc.elements
        .iter()
        .enumerate()
        .filter_map(|(idx, element)| {
            if seen.insert(element.id.as_str()) {
                Some(idx)
            } else {
                tracing::warn!(id = %element.id, "skipping duplicate element id");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bpmn;

    /// Places nodes on a diagonal in declaration order.
    struct Diagonal;

    impl RankSolver for Diagonal {
        fn solve(&self, graph: &RankGraph) -> Result<RankedPositions, LayoutError> {
            Ok(graph
                .nodes
                .iter()
                .enumerate()
                .map(|(i, node)| {
                    let step = i as f32 * 100.0;
                    (
                        node.id.clone(),
                        RankedNode {
                            x: step + node.width / 2.0,
                            y: step,
                            width: node.width,
                            height: node.height,
                        },
                    )
                })
                .collect())
        }
    }

    #[test]
    fn duplicate_ids_keep_first_definition() {
        let doc = parse_bpmn("pool: P\ntask: a [P] First\ntask: a [P] Second");
        let layout = compute_layout_with(&doc, &LayoutConfig::default(), &Diagonal).unwrap();
        let tasks: Vec<_> = layout.nodes.iter().filter(|n| n.id == "a").collect();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].label, "First");
    }

    #[test]
    fn canvas_width_includes_header() {
        let doc = parse_bpmn("pool: P\nlane: P > L\ntask: a [L] A");
        let layout = compute_layout_with(&doc, &LayoutConfig::default(), &Diagonal).unwrap();
        assert_eq!(layout.grid_width, 800.0);
        assert_eq!(layout.width, 840.0);
        assert_eq!(layout.height, 150.0);
        assert_eq!(layout.absolute_origin("a"), Some((40.0 + 70.0, 75.0 - 30.0)));
    }

    #[test]
    fn empty_document_lays_out_to_nothing() {
        let layout = compute_layout(&Document::new(), &LayoutConfig::default()).unwrap();
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.height, 0.0);
    }

    #[test]
    fn layout_is_repeatable() {
        let doc = parse_bpmn(
            "pool: A\npool: B\nlane: B > L1\nlane: B > L2\n\
             task: a [A] A\ntask: b [L1] B\ntask: c [L2] C\nflow: a -> b\nflow: b -> c",
        );
        let config = LayoutConfig::default();
        assert_eq!(
            compute_layout_with(&doc, &config, &Diagonal).unwrap(),
            compute_layout_with(&doc, &config, &Diagonal).unwrap()
        );
    }
}

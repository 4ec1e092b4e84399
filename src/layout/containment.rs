use serde::Serialize;

use crate::ir::Document;

/// Where a content element is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Index into `Document::lanes`.
    Lane(usize),
    /// Directly inside a pool without lanes; index into `Document::pools`.
    PoolRoot(usize),
    Unassigned,
}

/// Resolves every element's container hint, index-aligned with
/// `doc.elements`.
///
/// First match wins: lane name, then pool name (its first lane, or the pool
/// root when it has none), then the unassigned bucket. Unassigned elements
/// are moved to the first lane of the document when one exists.
pub fn resolve_containment(doc: &Document) -> Vec<Bucket> {
    doc.elements
        .iter()
        .map(|element| resolve_hint(doc, &element.container))
        .collect()
}

fn resolve_hint(doc: &Document, hint: &str) -> Bucket {
    let bucket = if let Some(lane_idx) = doc.lanes.iter().position(|lane| lane.name == hint) {
        Bucket::Lane(lane_idx)
    } else if let Some(pool_idx) = doc.pool_index(hint) {
        match doc.lanes_of(hint).next() {
            Some((lane_idx, _)) => Bucket::Lane(lane_idx),
            None => Bucket::PoolRoot(pool_idx),
        }
    } else {
        Bucket::Unassigned
    };

    if bucket == Bucket::Unassigned && !doc.lanes.is_empty() {
        return Bucket::Lane(0);
    }
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bpmn;

    #[test]
    fn lane_name_beats_pool_name() {
        let doc = parse_bpmn(
            "pool: Sales\npool: Review\nlane: Sales > Review\n\
             task: a [Review] Check\ntask: b [Sales] Sell",
        );
        assert_eq!(resolve_containment(&doc), vec![Bucket::Lane(0), Bucket::Lane(0)]);
    }

    #[test]
    fn pool_binds_to_first_lane_or_root() {
        let doc = parse_bpmn(
            "pool: Customer\npool: Sales\n\
             lane: Sales > Inbound\nlane: Sales > Outbound\n\
             task: a [Sales] Sell\ntask: b [Customer] Buy\ntask: c [Outbound] Ship",
        );
        assert_eq!(
            resolve_containment(&doc),
            vec![Bucket::Lane(0), Bucket::PoolRoot(0), Bucket::Lane(1)]
        );
    }

    #[test]
    fn unknown_hint_falls_back_to_first_lane() {
        let doc = parse_bpmn(
            "pool: A\npool: B\nlane: B > Second\nlane: A > First\ntask: x [Nowhere] Lost",
        );
        assert_eq!(resolve_containment(&doc), vec![Bucket::Lane(0)]);
    }

    #[test]
    fn unknown_hint_without_lanes_is_unassigned() {
        let doc = parse_bpmn("pool: A\ntask: x [Nowhere] Lost\ntask: y [A] Found");
        assert_eq!(
            resolve_containment(&doc),
            vec![Bucket::Unassigned, Bucket::PoolRoot(0)]
        );
    }

    #[test]
    fn duplicate_pools_bind_to_first() {
        let doc = parse_bpmn("pool: A\npool: A\ntask: x [A] One");
        assert_eq!(resolve_containment(&doc), vec![Bucket::PoolRoot(0)]);
    }

    #[test]
    fn resolution_is_stable() {
        let doc = parse_bpmn("pool: A\nlane: A > L\ntask: x [A] One\ntask: y [Q] Two");
        assert_eq!(resolve_containment(&doc), resolve_containment(&doc));
    }
}

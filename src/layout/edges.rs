use std::collections::HashMap;

use crate::ir::{Document, Element, Flow, FlowKind};

use super::types::{Arrowhead, DrawableEdge, ExitSide, LineStyle};

/// Turns flows into drawable edges. Flows with an endpoint that names no
/// element are dropped.
pub(crate) fn build_edges(doc: &Document) -> Vec<DrawableEdge> {
    let mut by_id: HashMap<&str, &Element> = HashMap::with_capacity(doc.elements.len());
    for element in &doc.elements {
        by_id.entry(element.id.as_str()).or_insert(element);
    }

    doc.flows
        .iter()
        .enumerate()
        .filter_map(|(idx, flow)| {
            let source = by_id.get(flow.from.as_str());
            if source.is_none() || !by_id.contains_key(flow.to.as_str()) {
                tracing::warn!(from = %flow.from, to = %flow.to, "dropping flow with unknown endpoint");
                return None;
            }
            let preferred_exit_side = source
                .filter(|element| element.kind.is_gateway())
                .map(|_| branch_exit_side(flow.label.as_deref()));
            Some(drawable_edge(idx, flow, preferred_exit_side))
        })
        .collect()
}

fn drawable_edge(idx: usize, flow: &Flow, preferred_exit_side: Option<ExitSide>) -> DrawableEdge {
    let (line_style, arrow) = match flow.kind {
        FlowKind::Sequence => (LineStyle::Solid, Arrowhead::Closed),
        FlowKind::Message => (LineStyle::DashedFine, Arrowhead::Open),
        FlowKind::Association => (LineStyle::DashedSparse, Arrowhead::None),
    };
    DrawableEdge {
        id: format!("e{idx}"),
        source_id: flow.from.clone(),
        target_id: flow.to.clone(),
        label: flow.label.clone(),
        preferred_exit_side,
        kind: flow.kind,
        line_style,
        arrow,
    }
}

/// Sends "yes"/"true" branches up and "no"/"false" branches down.
pub(crate) fn branch_exit_side(label: Option<&str>) -> ExitSide {
    match label.map(str::to_ascii_lowercase).as_deref() {
        Some("false" | "no") => ExitSide::Secondary,
        _ => ExitSide::Primary,
    }
}

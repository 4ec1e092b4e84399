use serde::Serialize;

use crate::ir::{EventPosition, FlowKind, TaskMarker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Pool,
    Lane,
    Task,
    StartEvent,
    IntermediateEvent,
    EndEvent,
    Gateway,
    Data,
    Annotation,
}

impl NodeKind {
    pub fn event(position: EventPosition) -> Self {
        match position {
            EventPosition::Start => Self::StartEvent,
            EventPosition::Intermediate => Self::IntermediateEvent,
            EventPosition::End => Self::EndEvent,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Self::Pool | Self::Lane)
    }
}

/// One render-ready node. `x`/`y` are relative to `parent_id`, or to the
/// canvas when there is no parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub kind: NodeKind,
    pub variant: Option<String>,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub parent_id: Option<String>,
    pub width: f32,
    pub height: f32,
    pub markers: Vec<TaskMarker>,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitSide {
    /// Affirmative branch, leaves through the top handle.
    Primary,
    /// Negative branch, leaves through the bottom handle.
    Secondary,
}

impl ExitSide {
    pub fn handle(self) -> &'static str {
        match self {
            Self::Primary => "top",
            Self::Secondary => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    DashedFine,
    DashedSparse,
}

impl LineStyle {
    pub fn dasharray(self) -> &'static str {
        match self {
            Self::Solid => "",
            Self::DashedFine => "4 2",
            Self::DashedSparse => "2 6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrowhead {
    Closed,
    Open,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawableEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
    pub preferred_exit_side: Option<ExitSide>,
    pub kind: FlowKind,
    pub line_style: LineStyle,
    pub arrow: Arrowhead,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<DrawableEdge>,
    /// Shared width of every lane and root band.
    pub grid_width: f32,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a PositionedNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id.as_deref() == Some(parent))
    }

    /// Canvas position of a node's origin, following the parent chain.
    pub fn absolute_origin(&self, id: &str) -> Option<(f32, f32)> {
        let mut node = self.node(id)?;
        let (mut x, mut y) = (node.x, node.y);
        // Parents precede children, so the chain is bounded by the node count.
        for _ in 0..self.nodes.len() {
            let Some(parent_id) = node.parent_id.as_deref() else {
                return Some((x, y));
            };
            node = self.node(parent_id)?;
            x += node.x;
            y += node.y;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind, parent: Option<&str>, x: f32, y: f32) -> PositionedNode {
        PositionedNode {
            id: id.to_string(),
            kind,
            variant: None,
            label: id.to_string(),
            x,
            y,
            parent_id: parent.map(str::to_string),
            width: 10.0,
            height: 10.0,
            markers: Vec::new(),
            icon: None,
        }
    }

    #[test]
    fn absolute_origin_sums_parent_chain() {
        let layout = Layout {
            nodes: vec![
                node("pool-0", NodeKind::Pool, None, 0.0, 250.0),
                node("lane-0", NodeKind::Lane, Some("pool-0"), 40.0, 150.0),
                node("t1", NodeKind::Task, Some("lane-0"), 100.0, 45.0),
            ],
            ..Layout::default()
        };
        assert_eq!(layout.absolute_origin("t1"), Some((140.0, 445.0)));
        assert_eq!(layout.absolute_origin("pool-0"), Some((0.0, 250.0)));
        assert_eq!(layout.absolute_origin("missing"), None);
        assert_eq!(layout.children("pool-0").count(), 1);
    }

    #[test]
    fn line_styles_have_distinct_dash_patterns() {
        assert_eq!(LineStyle::Solid.dasharray(), "");
        assert_ne!(LineStyle::DashedFine.dasharray(), LineStyle::DashedSparse.dasharray());
        assert_eq!(ExitSide::Primary.handle(), "top");
        assert_eq!(ExitSide::Secondary.handle(), "bottom");
    }
}

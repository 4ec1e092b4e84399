use crate::config::{ShapeSpec, ShapeTable};
use crate::ir::{ElementKind, TaskMarker};

use super::types::NodeKind;

/// Everything the layout needs to know about an element's shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShapeInfo {
    pub kind: NodeKind,
    pub spec: ShapeSpec,
    pub variant: Option<String>,
    pub markers: Vec<TaskMarker>,
    pub icon: Option<&'static str>,
}

const EVENT_ICONS: [&str; 4] = ["timer", "message", "error", "terminate"];

pub(crate) fn shape_info(kind: &ElementKind, table: &ShapeTable) -> ShapeInfo {
    let variant = kind.variant().map(str::to_string);
    match kind {
        ElementKind::Task { markers, .. } => ShapeInfo {
            kind: NodeKind::Task,
            spec: table.task,
            variant,
            markers: markers.clone(),
            icon: None,
        },
        ElementKind::Event { position, trigger } => ShapeInfo {
            kind: NodeKind::event(*position),
            spec: table.event,
            icon: trigger.as_deref().and_then(event_icon),
            variant,
            markers: Vec::new(),
        },
        ElementKind::Gateway { variant: gateway } => ShapeInfo {
            kind: NodeKind::Gateway,
            spec: table.gateway,
            icon: gateway_icon(gateway),
            variant,
            markers: Vec::new(),
        },
        ElementKind::Data => ShapeInfo {
            kind: NodeKind::Data,
            spec: table.data,
            variant,
            markers: Vec::new(),
            icon: None,
        },
        ElementKind::Annotation => ShapeInfo {
            kind: NodeKind::Annotation,
            spec: table.annotation,
            variant,
            markers: Vec::new(),
            icon: None,
        },
    }
}

fn event_icon(trigger: &str) -> Option<&'static str> {
    EVENT_ICONS.into_iter().find(|icon| trigger.contains(*icon))
}

fn gateway_icon(variant: &str) -> Option<&'static str> {
    match variant {
        "xor" => Some("X"),
        "and" => Some("+"),
        "or" => Some("O"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EventPosition;

    #[test]
    fn shape_table_lookup() {
        let table = ShapeTable::default();
        let gateway = shape_info(
            &ElementKind::Gateway {
                variant: "and".to_string(),
            },
            &table,
        );
        assert_eq!(gateway.kind, NodeKind::Gateway);
        assert_eq!(gateway.icon, Some("+"));
        assert_eq!(gateway.spec, table.gateway);

        let event = shape_info(
            &ElementKind::Event {
                position: EventPosition::End,
                trigger: Some("error end".to_string()),
            },
            &table,
        );
        assert_eq!(event.kind, NodeKind::EndEvent);
        assert_eq!(event.icon, Some("error"));
        assert_eq!(event.variant.as_deref(), Some("error end"));

        let task = shape_info(
            &ElementKind::Task {
                variant: "service".to_string(),
                markers: vec![TaskMarker::Loop],
            },
            &table,
        );
        assert_eq!(task.spec.anchor_offset, 30.0);
        assert_eq!(task.markers, vec![TaskMarker::Loop]);
        assert_eq!(task.icon, None);
    }

    #[test]
    fn unknown_gateway_variant_has_no_icon() {
        let info = shape_info(
            &ElementKind::Gateway {
                variant: "complex".to_string(),
            },
            &ShapeTable::default(),
        );
        assert_eq!(info.icon, None);
        assert_eq!(info.variant.as_deref(), Some("complex"));
    }
}

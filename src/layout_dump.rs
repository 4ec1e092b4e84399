use crate::ir::{Document, FlowKind, TaskMarker};
use crate::layout::{Arrowhead, Layout, LineStyle, NodeKind};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Wire format consumed by the rendering front-end. Every update ships a
/// full replacement of both lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub title: Option<String>,
    pub grid_width: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node: Option<String>,
    pub width: f32,
    pub height: f32,
    pub z_index: u8,
}

#[derive(Debug, Serialize)]
pub struct NodeData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<TaskMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<&'static str>,
    pub kind: FlowKind,
    pub line_style: LineStyle,
    pub dasharray: &'static str,
    pub arrow: Arrowhead,
}

const CONTAINER_Z: u8 = 0;
const ELEMENT_Z: u8 = 10;

impl LayoutDump {
    pub fn from_layout(layout: &Layout, doc: &Document) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                kind: node.kind,
                data: NodeData {
                    label: node.label.clone(),
                    variant: node.variant.clone(),
                    markers: node.markers.clone(),
                    icon: node.icon,
                },
                position: Position {
                    x: node.x,
                    y: node.y,
                },
                parent_node: node.parent_id.clone(),
                width: node.width,
                height: node.height,
                z_index: if node.kind.is_container() {
                    CONTAINER_Z
                } else {
                    ELEMENT_Z
                },
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source_id.clone(),
                target: edge.target_id.clone(),
                label: edge.label.clone(),
                source_handle: edge.preferred_exit_side.map(|side| side.handle()),
                kind: edge.kind,
                line_style: edge.line_style,
                dasharray: edge.line_style.dasharray(),
                arrow: edge.arrow,
            })
            .collect();

        LayoutDump {
            title: doc.title.clone(),
            grid_width: layout.grid_width,
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }

    pub fn write_to<W: Write>(&self, writer: W, pretty: bool) -> anyhow::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &Layout,
    doc: &Document,
    pretty: bool,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    LayoutDump::from_layout(layout, doc).write_to(&mut writer, pretty)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing hint handed to the rank solver plus the vertical anchor
/// correction applied when the shape is placed in its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub width: f32,
    pub height: f32,
    /// Distance from the node's top edge to its connection midline.
    pub anchor_offset: f32,
}

impl ShapeSpec {
    pub const fn new(width: f32, height: f32, anchor_offset: f32) -> Self {
        Self {
            width,
            height,
            anchor_offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeTable {
    pub task: ShapeSpec,
    pub event: ShapeSpec,
    pub gateway: ShapeSpec,
    pub data: ShapeSpec,
    pub annotation: ShapeSpec,
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self {
            task: ShapeSpec::new(140.0, 60.0, 30.0),
            // 40px circle; the label hangs below the anchor.
            event: ShapeSpec::new(50.0, 50.0, 20.0),
            // 56px rotated square.
            gateway: ShapeSpec::new(60.0, 60.0, 28.0),
            data: ShapeSpec::new(50.0, 60.0, 30.0),
            annotation: ShapeSpec::new(120.0, 50.0, 25.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub solver_margin: f32,
    pub grid_padding: f32,
    pub min_grid_width: f32,
    pub lane_min_height: f32,
    pub lane_padding_y: f32,
    pub pool_header_width: f32,
    pub pool_gap: f32,
    pub root_band_height: f32,
    pub shapes: ShapeTable,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 50.0,
            rank_spacing: 60.0,
            solver_margin: 0.0,
            grid_padding: 200.0,
            min_grid_width: 800.0,
            lane_min_height: 150.0,
            lane_padding_y: 100.0,
            pool_header_width: 40.0,
            pool_gap: 50.0,
            root_band_height: 200.0,
            shapes: ShapeTable::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ShapeSpecFile {
    width: Option<f32>,
    height: Option<f32>,
    anchor_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ShapesFile {
    task: Option<ShapeSpecFile>,
    event: Option<ShapeSpecFile>,
    gateway: Option<ShapeSpecFile>,
    data: Option<ShapeSpecFile>,
    annotation: Option<ShapeSpecFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    solver_margin: Option<f32>,
    grid_padding: Option<f32>,
    min_grid_width: Option<f32>,
    lane_min_height: Option<f32>,
    lane_padding_y: Option<f32>,
    pool_header_width: Option<f32>,
    pool_gap: Option<f32>,
    root_band_height: Option<f32>,
    shapes: Option<ShapesFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a (partial) camelCase config document. Strict JSON is tried
/// first, then JSON5 for hand-written files with comments.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}"))?,
    };
    let mut config = LayoutConfig::default();
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut LayoutConfig, file: ConfigFile) {
    if let Some(v) = file.node_spacing {
        config.node_spacing = v;
    }
    if let Some(v) = file.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = file.solver_margin {
        config.solver_margin = v;
    }
    if let Some(v) = file.grid_padding {
        config.grid_padding = v;
    }
    if let Some(v) = file.min_grid_width {
        config.min_grid_width = v;
    }
    if let Some(v) = file.lane_min_height {
        config.lane_min_height = v;
    }
    if let Some(v) = file.lane_padding_y {
        config.lane_padding_y = v;
    }
    if let Some(v) = file.pool_header_width {
        config.pool_header_width = v;
    }
    if let Some(v) = file.pool_gap {
        config.pool_gap = v;
    }
    if let Some(v) = file.root_band_height {
        config.root_band_height = v;
    }
    if let Some(shapes) = file.shapes {
        let table = &mut config.shapes;
        for (target, patch) in [
            (&mut table.task, shapes.task),
            (&mut table.event, shapes.event),
            (&mut table.gateway, shapes.gateway),
            (&mut table.data, shapes.data),
            (&mut table.annotation, shapes.annotation),
        ] {
            if let Some(patch) = patch {
                apply_shape(target, patch);
            }
        }
    }
}

fn apply_shape(spec: &mut ShapeSpec, patch: ShapeSpecFile) {
    if let Some(v) = patch.width {
        spec.width = v;
    }
    if let Some(v) = patch.height {
        spec.height = v;
    }
    if let Some(v) = patch.anchor_offset {
        spec.anchor_offset = v;
    }
}

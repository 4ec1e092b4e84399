use bpmn_rs_layout::{LayoutConfig, generate_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BpmnLayoutOptions {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    min_grid_width: Option<f32>,
    pool_gap: Option<f32>,
}

fn build_layout_config(options: BpmnLayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(spacing) = options.node_spacing {
        config.node_spacing = spacing;
    }
    if let Some(spacing) = options.rank_spacing {
        config.rank_spacing = spacing;
    }
    if let Some(width) = options.min_grid_width {
        config.min_grid_width = width;
    }
    if let Some(gap) = options.pool_gap {
        config.pool_gap = gap;
    }
    config
}

#[wasm_bindgen]
pub fn layout_bpmn(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<BpmnLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        BpmnLayoutOptions::default()
    };

    generate_json(code, &build_layout_config(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use bpmn_rs_layout::generate_json;

    use crate::{BpmnLayoutOptions, build_layout_config};

    #[test]
    fn lays_out_pools_lanes_and_branches() {
        let code = "# Order\npool: Customer\npool: Sales\nlane: Sales > Review\n\
                    task: start [Customer] Begin\ntask: t1 [Sales] Review (user)\n\
                    gateway: g1 [Sales] Check? (xor)\ntask: end [Customer] Done\n\
                    flow: start -> t1\nflow: t1 -> g1\nflow: g1 -> end [no]";

        let json = generate_json(code, &build_layout_config(BpmnLayoutOptions::default()))
            .expect("swimlane diagram should lay out");

        assert!(json.contains(r#""title":"Order""#));
        assert!(json.contains(r#""parentNode":"lane-0""#));
        assert!(json.contains(r#""sourceHandle":"bottom""#));
    }

    #[test]
    fn options_override_defaults() {
        let options: BpmnLayoutOptions =
            serde_json::from_str(r#"{"minGridWidth": 1200, "nodeSpacing": 10}"#).unwrap();
        let config = build_layout_config(options);
        assert_eq!(config.min_grid_width, 1200.0);
        assert_eq!(config.node_spacing, 10.0);
        assert_eq!(config.rank_spacing, 60.0);
    }
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, ShapeSpec, ShapeTable, load_config};
pub use ir::Document;
pub use layout::{Layout, LayoutError, compute_layout, compute_layout_with};
pub use layout_dump::LayoutDump;
pub use parser::parse_bpmn;
pub use session::Session;

/// Parses and lays out `input`, returning the renderer wire format as JSON.
pub fn generate_json(input: &str, config: &LayoutConfig) -> anyhow::Result<String> {
    let doc = parse_bpmn(input);
    let layout = compute_layout(&doc, config)?;
    Ok(serde_json::to_string(&LayoutDump::from_layout(&layout, &doc))?)
}

use crate::config::load_config;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_bpmn;
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bpmnl", version, about = "Lay out BPMN line notation as a swimlane grid")]
pub struct Args {
    /// Input file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output JSON file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// What to emit
    #[arg(short = 'e', long = "emit", value_enum, default_value = "layout")]
    pub emit: Emit,

    /// Single-line JSON instead of pretty-printed
    #[arg(long = "compact")]
    pub compact: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Positioned nodes and edges for a renderer
    Layout,
    /// The parsed document, before layout
    Document,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let doc = parse_bpmn(&input);
    if doc.is_empty() {
        tracing::warn!("input has no recognised lines");
    }

    let pretty = !args.compact;
    match (args.emit, args.output.as_deref()) {
        (Emit::Layout, Some(path)) => {
            let layout = compute_layout(&doc, &config)?;
            write_layout_dump(path, &layout, &doc, pretty)?;
        }
        (Emit::Layout, None) => {
            let layout = compute_layout(&doc, &config)?;
            let mut out = io::stdout().lock();
            LayoutDump::from_layout(&layout, &doc).write_to(&mut out, pretty)?;
            finish(&mut out)?;
        }
        (Emit::Document, output) => {
            let mut out = open_output(output)?;
            write_json(&mut out, &doc, pretty)?;
            finish(&mut out)?;
        }
    }
    Ok(())
}

fn finish(out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(io::BufWriter::new(std::fs::File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn write_json<T: serde::Serialize>(out: &mut dyn Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(out, value)?;
    } else {
        serde_json::to_writer(out, value)?;
    }
    Ok(())
}

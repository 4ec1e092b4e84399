use crate::ir::{Document, Element, ElementKind, EventPosition, Flow, FlowKind, Lane, Pool, TaskMarker};
use once_cell::sync::Lazy;
use regex::Regex;

/// `id [Container] Label (opts)` with the option group optional.
static QUALIFIED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>\w+)\s+\[(?P<container>[^\]]+?)\]\s+(?P<label>[^(]+?)\s*(?:\((?P<opts>[^)]*?)\))?$")
        .unwrap()
});
/// `id [Container] Label` where the label is taken verbatim.
static PLAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>\w+)\s+\[(?P<container>[^\]]+?)\]\s+(?P<label>.+)$").unwrap()
});
static FLOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<from>\w+)\s*(?P<arrow>-{1,2}>|\.\.>)\s*(?P<to>\w+)(?:\s*\[(?P<label>[^\]]*?)\])?$")
        .unwrap()
});

const DEFAULT_TASK_VARIANT: &str = "user";
const LEGACY_TASK_VARIANT: &str = "generic";
const DEFAULT_GATEWAY_VARIANT: &str = "xor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Pool,
    Lane,
    Task,
    Event,
    Gateway,
    Data,
    Note,
    Flow,
}

impl Keyword {
    const ALL: [(&'static str, Keyword); 8] = [
        ("pool:", Keyword::Pool),
        ("lane:", Keyword::Lane),
        ("task:", Keyword::Task),
        ("event:", Keyword::Event),
        ("gateway:", Keyword::Gateway),
        ("data:", Keyword::Data),
        ("note:", Keyword::Note),
        ("flow:", Keyword::Flow),
    ];

    /// Splits a line into its keyword and the trimmed remainder.
    fn classify(line: &str) -> Option<(Self, &str)> {
        Self::ALL.iter().find_map(|(prefix, keyword)| {
            line.strip_prefix(*prefix)
                .map(|rest| (*keyword, rest.trim()))
        })
    }
}

#[derive(Debug)]
enum Record {
    Pool(Pool),
    Lane(Lane),
    Element(Element),
    Flow(Flow),
}

/// Parses the line notation into a best-effort document.
///
/// Never fails: lines that match no keyword, or match one but not its
/// pattern, are dropped.
pub fn parse_bpmn(input: &str) -> Document {
    let mut doc = Document::new();
    let mut dropped = 0usize;

    for raw_line in input.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if doc.title.is_none() {
                let title = comment.trim_start_matches('#').trim();
                if !title.is_empty() {
                    doc.title = Some(title.to_string());
                }
            }
            continue;
        }
        match parse_line(line) {
            Some(Record::Pool(pool)) => doc.pools.push(pool),
            Some(Record::Lane(lane)) => doc.lanes.push(lane),
            Some(Record::Element(element)) => doc.elements.push(element),
            Some(Record::Flow(flow)) => doc.flows.push(flow),
            None => {
                tracing::trace!(line, "dropped line");
                dropped += 1;
            }
        }
    }

    tracing::debug!(
        pools = doc.pools.len(),
        lanes = doc.lanes.len(),
        elements = doc.elements.len(),
        flows = doc.flows.len(),
        dropped,
        "parsed document"
    );
    doc
}

fn parse_line(line: &str) -> Option<Record> {
    let (keyword, rest) = Keyword::classify(line)?;
    match keyword {
        Keyword::Pool => parse_pool(rest).map(Record::Pool),
        Keyword::Lane => parse_lane(rest).map(Record::Lane),
        Keyword::Task => parse_task(rest).map(Record::Element),
        Keyword::Event => parse_event(rest).map(Record::Element),
        Keyword::Gateway => parse_gateway(rest).map(Record::Element),
        Keyword::Data => parse_plain(rest, ElementKind::Data).map(Record::Element),
        Keyword::Note => parse_plain(rest, ElementKind::Annotation).map(Record::Element),
        Keyword::Flow => parse_flow(rest).map(Record::Flow),
    }
}

fn parse_pool(rest: &str) -> Option<Pool> {
    if rest.is_empty() {
        return None;
    }
    Some(Pool {
        name: rest.to_string(),
    })
}

fn parse_lane(rest: &str) -> Option<Lane> {
    let (pool, name) = rest.split_once('>')?;
    if name.contains('>') {
        return None;
    }
    let (pool, name) = (pool.trim(), name.trim());
    if pool.is_empty() || name.is_empty() {
        return None;
    }
    Some(Lane {
        pool: pool.to_string(),
        name: name.to_string(),
    })
}

struct Qualified<'a> {
    id: &'a str,
    container: &'a str,
    label: &'a str,
    opts: Option<&'a str>,
}

fn match_qualified(rest: &str) -> Option<Qualified<'_>> {
    let caps = QUALIFIED_RE.captures(rest)?;
    let container = caps.name("container")?.as_str().trim();
    let label = caps.name("label")?.as_str().trim();
    if container.is_empty() || label.is_empty() {
        return None;
    }
    Some(Qualified {
        id: caps.name("id")?.as_str(),
        container,
        label,
        opts: caps.name("opts").map(|m| m.as_str()),
    })
}

fn match_plain(rest: &str) -> Option<(&str, &str, &str)> {
    let caps = PLAIN_RE.captures(rest)?;
    let container = caps.name("container")?.as_str().trim();
    let label = caps.name("label")?.as_str().trim();
    if container.is_empty() || label.is_empty() {
        return None;
    }
    Some((caps.name("id")?.as_str(), container, label))
}

fn element(id: &str, container: &str, label: &str, kind: ElementKind) -> Element {
    Element {
        id: id.to_string(),
        container: container.to_string(),
        label: label.to_string(),
        kind,
    }
}

fn parse_task(rest: &str) -> Option<Element> {
    if let Some(q) = match_qualified(rest) {
        let kind = legacy_event(q.id).unwrap_or_else(|| match q.opts {
            Some(opts) => task_kind_from_opts(opts),
            None => ElementKind::Task {
                variant: DEFAULT_TASK_VARIANT.to_string(),
                markers: Vec::new(),
            },
        });
        return Some(element(q.id, q.container, q.label, kind));
    }
    // Labels with inner parentheses fall back to the bracket-only form.
    let (id, container, label) = match_plain(rest)?;
    if label.starts_with('(') {
        return None;
    }
    let kind = legacy_event(id).unwrap_or_else(|| ElementKind::Task {
        variant: LEGACY_TASK_VARIANT.to_string(),
        markers: Vec::new(),
    });
    Some(element(id, container, label, kind))
}

/// `task: start` and `task: end` stand for start and end events.
fn legacy_event(id: &str) -> Option<ElementKind> {
    let position = match id {
        "start" => EventPosition::Start,
        "end" => EventPosition::End,
        _ => return None,
    };
    Some(ElementKind::Event {
        position,
        trigger: None,
    })
}

fn task_kind_from_opts(opts: &str) -> ElementKind {
    let mut variant: Option<String> = None;
    let mut markers: Vec<TaskMarker> = Vec::new();
    for token in opts.split(',') {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }
        match TaskMarker::from_token(&token) {
            Some(marker) => {
                if !markers.contains(&marker) {
                    markers.push(marker);
                }
            }
            None => variant = Some(token),
        }
    }
    markers.sort();
    ElementKind::Task {
        variant: variant.unwrap_or_else(|| DEFAULT_TASK_VARIANT.to_string()),
        markers,
    }
}

fn normalized_subtype(opts: Option<&str>) -> Option<String> {
    opts.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn parse_event(rest: &str) -> Option<Element> {
    let q = match_qualified(rest)?;
    let trigger = normalized_subtype(q.opts);
    let kind = ElementKind::Event {
        position: EventPosition::classify(trigger.as_deref()),
        trigger,
    };
    Some(element(q.id, q.container, q.label, kind))
}

fn parse_gateway(rest: &str) -> Option<Element> {
    let q = match_qualified(rest)?;
    let variant =
        normalized_subtype(q.opts).unwrap_or_else(|| DEFAULT_GATEWAY_VARIANT.to_string());
    Some(element(q.id, q.container, q.label, ElementKind::Gateway { variant }))
}

fn parse_plain(rest: &str, kind: ElementKind) -> Option<Element> {
    let (id, container, label) = match_plain(rest)?;
    Some(element(id, container, label, kind))
}

fn parse_flow(rest: &str) -> Option<Flow> {
    let caps = FLOW_RE.captures(rest)?;
    let kind = FlowKind::from_arrow(caps.name("arrow")?.as_str())?;
    let label = caps
        .name("label")
        .map(|m| m.as_str().trim())
        .filter(|label| !label.is_empty())
        .map(str::to_string);
    Some(Flow {
        from: caps.name("from")?.as_str().to_string(),
        to: caps.name("to")?.as_str().to_string(),
        label,
        kind,
    })
}

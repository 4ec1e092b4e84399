use serde::{Deserialize, Serialize};

/// Organizational participant, drawn as a top-level swimlane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
}

/// Named sub-band of a pool. `pool` is matched by name at layout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub pool: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMarker {
    Loop,
    Parallel,
    Sequential,
    Compensation,
}

impl TaskMarker {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "loop" => Some(Self::Loop),
            "parallel" => Some(Self::Parallel),
            "sequential" => Some(Self::Sequential),
            "compensation" => Some(Self::Compensation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPosition {
    Start,
    Intermediate,
    End,
}

impl EventPosition {
    /// Classifies an event subtype by substring: "start" wins over "end".
    pub fn classify(subtype: Option<&str>) -> Self {
        match subtype {
            Some(s) if s.contains("start") => Self::Start,
            Some(s) if s.contains("end") => Self::End,
            _ => Self::Intermediate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Task {
        variant: String,
        markers: Vec<TaskMarker>,
    },
    Event {
        position: EventPosition,
        /// Lower-cased subtype as written, e.g. "timer start".
        trigger: Option<String>,
    },
    Gateway {
        variant: String,
    },
    Data,
    Annotation,
}

impl ElementKind {
    pub fn variant(&self) -> Option<&str> {
        match self {
            Self::Task { variant, .. } | Self::Gateway { variant } => Some(variant),
            Self::Event { trigger, .. } => trigger.as_deref(),
            Self::Data | Self::Annotation => None,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

/// Any placeable diagram element.
///
/// `container` is a free-text hint: it is matched against lane names first
/// and pool names second, never treated as a structural reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub container: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Sequence,
    Message,
    Association,
}

impl FlowKind {
    pub fn from_arrow(arrow: &str) -> Option<Self> {
        match arrow {
            "-->" => Some(Self::Message),
            "..>" => Some(Self::Association),
            "->" => Some(Self::Sequence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub kind: FlowKind,
}

/// Parsed diagram. Every list keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    pub pools: Vec<Pool>,
    pub lanes: Vec<Lane>,
    pub elements: Vec<Element>,
    pub flows: Vec<Flow>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// First element declared with `id`.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn pool_index(&self, name: &str) -> Option<usize> {
        self.pools.iter().position(|pool| pool.name == name)
    }

    pub fn lanes_of<'a>(&'a self, pool: &'a str) -> impl Iterator<Item = (usize, &'a Lane)> + 'a {
        self.lanes
            .iter()
            .enumerate()
            .filter(move |(_, lane)| lane.pool == pool)
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
            && self.lanes.is_empty()
            && self.elements.is_empty()
            && self.flows.is_empty()
    }
}

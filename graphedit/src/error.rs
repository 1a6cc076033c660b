use crate::model::{EdgeKey, NodeId};
use std::fmt;
use thiserror::Error;

/// Element an operation referred to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    Edge(EdgeKey),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(id) => write!(f, "node {}", id),
            Target::Edge(key) => write!(f, "edge {}", key),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{0} not found")]
    NotFound(Target),
    /// A history entry tried to re-create an element that is present.
    #[error("{0} already exists")]
    AlreadyExists(Target),
    #[error("{}", empty_history_message(.0))]
    EmptyHistory(Direction),
    /// A node position left the coordinate range the interchange format
    /// accepts.
    #[error("position ({x}, {y}) is outside the editable area")]
    OutOfBounds { x: f64, y: f64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Rejections raised while ingesting an interchange document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),
    #[error("caps exceeded: {0}")]
    CapsExceeded(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
}

/// Rejections raised while reading an `EditorConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter '{param}' must be finite and > 0")]
    NotPositive { param: &'static str },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Json(_) => "malformed_json",
            ConfigError::NotPositive { .. } => "invalid_config",
        }
    }
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Json(_) => "malformed_json",
            ParseError::UnsupportedVersion(_) => "unsupported_version",
            ParseError::CapsExceeded(_) => "caps_exceeded",
            ParseError::OutOfBounds(_) => "out_of_bounds",
            ParseError::InvalidStructure(_) => "invalid_structure",
        }
    }
}

impl GraphError {
    /// Stable machine-readable code, used by host bindings.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::NotFound(_) => "not_found",
            GraphError::AlreadyExists(_) => "already_exists",
            GraphError::EmptyHistory(_) => "empty_history",
            GraphError::OutOfBounds { .. } => "out_of_bounds",
            GraphError::Io(_) => "io",
            GraphError::Parse(p) => p.code(),
        }
    }

    pub fn node_not_found(id: NodeId) -> Self {
        GraphError::NotFound(Target::Node(id))
    }

    pub fn edge_not_found(key: EdgeKey) -> Self {
        GraphError::NotFound(Target::Edge(key))
    }
}

fn empty_history_message(direction: &Direction) -> &'static str {
    match direction {
        Direction::Undo => "There is no previous history",
        Direction::Redo => "Already at newest change",
    }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

pub mod model;
pub mod error;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
}
pub mod config;
pub mod history;
pub mod input;
pub mod json;
pub mod session;
pub mod store;
pub mod view;

pub use algorithms::picking::SpatialQuery;
pub use config::EditorConfig;
pub use error::{ConfigError, Direction, GraphError, ParseError, Result, Target};
pub use history::{CommandEntry, CommandLog};
pub use input::{Action, Button, Buttons, InputEvent, Key, Overlay};
pub use model::{Attributes, Edge, EdgeKey, EdgeWeight, Mode, Node, NodeId, NodeState, Pick, Vec2};
pub use session::{EditSession, Response};
pub use store::GraphStore;
pub use view::ViewTransform;

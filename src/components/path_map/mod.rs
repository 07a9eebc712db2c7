mod bounds;
mod component;
mod projection;
mod render;
mod state;
mod types;

pub use component::PathMapCanvas;
pub use types::{Fix, MapData, NodeKey};

//! Flow diagram: nodes and edges drawn as SVG, with optional dragging.

mod component;
pub mod path;
mod render;
pub mod schema;
mod state;
mod types;

pub use component::FlowDiagram;
pub use render::{
	ERROR_TEXT, EdgeLabel, EdgeShape, Fallback, LOADING_TEXT, Marker, NodeShape, Panel,
	RenderError, Scene, build_scene, render_pass,
};
pub use state::{DragSession, FlowState, PositionStore, Viewport};
pub use types::{
	EdgeKind, EdgeStyle, FlowDiagramData, FlowEdge, FlowNode, Frame, NodeKind, NodeStyle,
	PayloadError, Position, Size, Variant, container_class,
};

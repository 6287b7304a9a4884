use std::collections::HashSet;

use log::{debug, error};

use super::path::{ARROW_INSET, ARROW_SIZE, NODE_HEIGHT, NODE_WIDTH, edge_path};
use super::state::{FlowState, Viewport};
use super::types::{FlowEdge, FlowNode};

const DEFAULT_BORDER_WIDTH: f64 = 1.0;
const DEFAULT_BORDER_RADIUS: f64 = 6.0;
const DEFAULT_PADDING: f64 = 10.0;
const DEFAULT_STROKE: &str = "#64748b";
const DEFAULT_STROKE_WIDTH: f64 = 1.5;
/// Rough advance of one label character at the node font size.
const LABEL_CHAR_WIDTH: f64 = 7.0;

/// Text of the placeholder shown before any node arrives.
pub const LOADING_TEXT: &str = "Building diagram...";
/// Heading of the error panel.
pub const ERROR_TEXT: &str = "Error loading flow diagram";

/// A value in the diagram input that cannot be drawn.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
	/// NaN or infinite coordinate.
	#[error("node `{node}` has a non-finite position")]
	NonFinitePosition {
		/// Offending node.
		node: String,
	},
	/// Empty color, or one that would break out of the attribute.
	#[error("`{owner}` has an invalid {field} color: {value:?}")]
	InvalidColor {
		/// Node or edge id.
		owner: String,
		/// Style field name.
		field: &'static str,
		/// Value as supplied.
		value: String,
	},
	/// Negative or non-finite size.
	#[error("`{owner}` has an invalid {field}: {value}")]
	InvalidDimension {
		/// Node or edge id.
		owner: String,
		/// Style field name.
		field: &'static str,
		/// Value as supplied.
		value: f64,
	},
}

/// What the component shows when a render pass fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
	/// Panel heading.
	pub message: &'static str,
	/// Error description, also logged.
	pub detail: String,
}

impl From<RenderError> for Fallback {
	fn from(err: RenderError) -> Self {
		Self {
			message: ERROR_TEXT,
			detail: err.to_string(),
		}
	}
}

/// What the diagram container holds for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
	/// No nodes yet; pulsing dots.
	Loading,
	/// The SVG canvas.
	Diagram,
	/// The error panel, in place of the whole container.
	Failed(Fallback),
}

impl Panel {
	/// A failure wins over everything; an empty node list shows the placeholder.
	pub fn select(nodes: &[FlowNode], outcome: &Result<Scene, Fallback>) -> Self {
		match outcome {
			Err(fallback) => Panel::Failed(fallback.clone()),
			Ok(_) if nodes.is_empty() => Panel::Loading,
			Ok(_) => Panel::Diagram,
		}
	}
}

/// A node box ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
	/// Node id, written to `data-node-id` for hit testing.
	pub id: String,
	/// Display text.
	pub label: String,
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
	/// Box fill.
	pub fill: String,
	/// Box outline.
	pub stroke: String,
	/// Outline width.
	pub stroke_width: f64,
	/// Corner radius.
	pub radius: f64,
	/// Label color.
	pub text_color: String,
	/// Horizontal space kept around the label.
	pub padding: f64,
}

/// Edge label placement.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
	/// Label text.
	pub text: String,
	/// Center.
	pub x: f64,
	/// Baseline.
	pub y: f64,
}

/// An edge ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeShape {
	/// Edge id.
	pub id: String,
	/// SVG path data.
	pub d: String,
	/// Line color.
	pub stroke: String,
	/// Line width.
	pub stroke_width: f64,
	/// Id of the arrow marker to attach at the end.
	pub marker_id: String,
	/// Marching-dash animation.
	pub animated: bool,
	/// Optional label.
	pub label: Option<EdgeLabel>,
}

/// Arrow head definition, one per stroke color.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
	/// Element id, unique per diagram instance.
	pub id: String,
	/// Fill, same as the stroke it ends.
	pub color: String,
	/// Head length in diagram units.
	pub size: f64,
	/// Marker reference point; past the tip so the tip clears the target box.
	pub ref_x: f64,
}

/// Everything needed to draw one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
	/// Viewport at the time of the pass.
	pub viewport: Viewport,
	/// Node boxes in input order.
	pub nodes: Vec<NodeShape>,
	/// Drawable edges in input order.
	pub edges: Vec<EdgeShape>,
	/// Distinct arrow heads.
	pub markers: Vec<Marker>,
}

/// One render pass: the scene, or the fallback panel when building it fails.
pub fn render_pass(
	state: &FlowState,
	nodes: &[FlowNode],
	edges: &[FlowEdge],
	marker_prefix: &str,
) -> Result<Scene, Fallback> {
	build_scene(state, nodes, edges, marker_prefix).map_err(|err| {
		error!("flow diagram render failed: {err}");
		Fallback::from(err)
	})
}

/// Lay out every node and every edge whose endpoints exist.
pub fn build_scene(
	state: &FlowState,
	nodes: &[FlowNode],
	edges: &[FlowEdge],
	marker_prefix: &str,
) -> Result<Scene, RenderError> {
	let node_shapes = nodes
		.iter()
		.map(|node| node_shape(state, node))
		.collect::<Result<Vec<_>, _>>()?;

	let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let mut edge_shapes = Vec::with_capacity(edges.len());
	let mut markers: Vec<Marker> = Vec::new();

	for edge in edges {
		if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
			debug!(
				"skipping edge `{}`: {} -> {} references a missing node",
				edge.id, edge.source, edge.target
			);
			continue;
		}

		let style = edge.style.clone().unwrap_or_default();
		let stroke = match style.stroke {
			Some(color) => checked_color(&edge.id, "stroke", color)?,
			None => DEFAULT_STROKE.to_string(),
		};
		let stroke_width = checked_dimension(
			&edge.id,
			"stroke width",
			style.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
		)?;

		let marker_id = match markers.iter().find(|m| m.color == stroke) {
			Some(marker) => marker.id.clone(),
			None => {
				let marker = Marker {
					id: format!("{marker_prefix}-arrow-{}", markers.len()),
					color: stroke.clone(),
					size: ARROW_SIZE,
					ref_x: ARROW_SIZE + ARROW_INSET,
				};
				let id = marker.id.clone();
				markers.push(marker);
				id
			}
		};

		let path = edge_path(
			edge.kind,
			state.position(&edge.source),
			state.position(&edge.target),
		);
		edge_shapes.push(EdgeShape {
			id: edge.id.clone(),
			d: path.d,
			stroke,
			stroke_width,
			marker_id,
			animated: edge.animated,
			label: edge.label.clone().map(|text| EdgeLabel {
				text,
				x: path.label_x,
				y: path.label_y,
			}),
		});
	}

	Ok(Scene {
		viewport: state.viewport(),
		nodes: node_shapes,
		edges: edge_shapes,
		markers,
	})
}

fn node_shape(state: &FlowState, node: &FlowNode) -> Result<NodeShape, RenderError> {
	let pos = state.position(&node.id);
	if !pos.is_finite() {
		return Err(RenderError::NonFinitePosition {
			node: node.id.clone(),
		});
	}

	let (fill, stroke, text) = node.kind.palette();
	let style = node.style.clone().unwrap_or_default();
	let id = node.id.as_str();
	let color = |field, value: Option<String>, default: &str| match value {
		Some(value) => checked_color(id, field, value),
		None => Ok(default.to_string()),
	};
	let dimension = |field, value: Option<f64>, default: f64| {
		checked_dimension(id, field, value.unwrap_or(default))
	};

	let padding = dimension("padding", style.padding, DEFAULT_PADDING)?;
	// Without an explicit width the box grows to fit its label.
	let auto_width = NODE_WIDTH.max(label_width(&node.label) + 2.0 * padding);

	Ok(NodeShape {
		id: node.id.clone(),
		label: node.label.clone(),
		x: pos.x,
		y: pos.y,
		width: dimension("width", style.width, auto_width)?,
		height: dimension("height", style.height, NODE_HEIGHT)?,
		fill: color("background", style.background_color, fill)?,
		stroke: color("border", style.border_color, stroke)?,
		stroke_width: dimension("border width", style.border_width, DEFAULT_BORDER_WIDTH)?,
		radius: dimension("border radius", style.border_radius, DEFAULT_BORDER_RADIUS)?,
		text_color: color("text", style.color, text)?,
		padding,
	})
}

fn label_width(label: &str) -> f64 {
	label.chars().count() as f64 * LABEL_CHAR_WIDTH
}

fn checked_color(owner: &str, field: &'static str, value: String) -> Result<String, RenderError> {
	let trimmed = value.trim();
	if trimmed.is_empty() || trimmed.contains([';', '"', '\'', '<', '>', '{', '}']) {
		return Err(RenderError::InvalidColor {
			owner: owner.to_string(),
			field,
			value,
		});
	}
	Ok(trimmed.to_string())
}

fn checked_dimension(owner: &str, field: &'static str, value: f64) -> Result<f64, RenderError> {
	if !value.is_finite() || value < 0.0 {
		return Err(RenderError::InvalidDimension {
			owner: owner.to_string(),
			field,
			value,
		});
	}
	Ok(value)
}

use serde::{Deserialize, Serialize};

/// A point on the diagram canvas, in diagram units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Position {
	/// `(0, 0)`, the fallback for unknown node ids.
	pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Both coordinates are finite.
	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Node kind; only affects default coloring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Entry point, also accepted as `input`.
	#[serde(alias = "input")]
	Start,
	/// Terminal node, also accepted as `output`.
	#[serde(alias = "output")]
	End,
	/// Plain step.
	#[default]
	Default,
	/// Caller-styled node.
	Custom,
}

impl NodeKind {
	/// `(background, border, text)` used when a node has no style override.
	pub fn palette(self) -> (&'static str, &'static str, &'static str) {
		match self {
			NodeKind::Start => ("#dcfce7", "#22c55e", "#14532d"),
			NodeKind::End => ("#fee2e2", "#ef4444", "#7f1d1d"),
			NodeKind::Default => ("#ffffff", "#94a3b8", "#0f172a"),
			NodeKind::Custom => ("#ede9fe", "#8b5cf6", "#3b0764"),
		}
	}
}

/// Per-node overrides of the kind's default look.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
	/// Box fill.
	pub background_color: Option<String>,
	/// Box outline.
	pub border_color: Option<String>,
	/// Label color.
	pub color: Option<String>,
	/// Outline width.
	pub border_width: Option<f64>,
	/// Corner radius.
	pub border_radius: Option<f64>,
	/// Box width; grows to fit the label when unset.
	pub width: Option<f64>,
	/// Box height.
	pub height: Option<f64>,
	/// Horizontal space kept around the label.
	pub padding: Option<f64>,
}

/// A labeled box on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
	/// Unique within a diagram.
	pub id: String,
	/// Display text.
	#[serde(default)]
	pub label: String,
	/// Supplied position; dragging never writes back here.
	pub position: Position,
	/// Serialized as `type`.
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	/// Optional overrides.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<NodeStyle>,
}

impl FlowNode {
	/// Default-kind node at `(x, y)`.
	pub fn new(id: impl Into<String>, label: impl Into<String>, x: f64, y: f64) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			position: Position::new(x, y),
			kind: NodeKind::Default,
			style: None,
		}
	}

	/// Sets the kind.
	pub fn with_kind(mut self, kind: NodeKind) -> Self {
		self.kind = kind;
		self
	}

	/// Sets the style overrides.
	pub fn with_style(mut self, style: NodeStyle) -> Self {
		self.style = Some(style);
		self
	}
}

/// Connector style of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Same curve as `Bezier`.
	#[default]
	Default,
	/// One line segment.
	Straight,
	/// Orthogonal path turning at the vertical midpoint.
	Step,
	/// Same curve as `Bezier`.
	SmoothStep,
	/// Cubic curve bending at the vertical midpoint.
	Bezier,
}

/// Stroke overrides of an edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeStyle {
	/// Line and arrow color.
	pub stroke: Option<String>,
	/// Line width.
	pub stroke_width: Option<f64>,
}

/// Directed connector between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
	/// Unique within a diagram.
	pub id: String,
	/// Id of the node the edge leaves.
	pub source: String,
	/// Id of the node the arrow points at.
	pub target: String,
	/// Text drawn above the path midpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Serialized as `type`.
	#[serde(rename = "type", default)]
	pub kind: EdgeKind,
	/// Marching-dash animation.
	#[serde(default)]
	pub animated: bool,
	/// Optional overrides.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<EdgeStyle>,
}

impl FlowEdge {
	/// Default-kind edge from `source` to `target`.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: None,
			kind: EdgeKind::Default,
			animated: false,
			style: None,
		}
	}

	/// Sets the label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the connector style.
	pub fn with_kind(mut self, kind: EdgeKind) -> Self {
		self.kind = kind;
		self
	}

	/// Turns on the dash animation.
	pub fn animated(mut self) -> Self {
		self.animated = true;
		self
	}

	/// Sets the stroke overrides.
	pub fn with_style(mut self, style: EdgeStyle) -> Self {
		self.style = Some(style);
		self
	}
}

/// Container treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
	/// Transparent.
	#[default]
	Default,
	/// Filled background.
	Solid,
	/// Outlined card.
	Bordered,
}

impl Variant {
	/// CSS modifier class.
	pub fn class(self) -> &'static str {
		match self {
			Variant::Default => "flow-diagram--default",
			Variant::Solid => "flow-diagram--solid",
			Variant::Bordered => "flow-diagram--bordered",
		}
	}
}

/// Fixed height presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
	/// 300px.
	Sm,
	/// 400px.
	#[default]
	Default,
	/// 600px.
	Lg,
	/// Fills the parent.
	Full,
}

impl Size {
	/// CSS modifier class.
	pub fn class(self) -> &'static str {
		match self {
			Size::Sm => "flow-diagram--sm",
			Size::Default => "flow-diagram--md",
			Size::Lg => "flow-diagram--lg",
			Size::Full => "flow-diagram--full",
		}
	}

	/// CSS height of the container.
	pub fn height(self) -> &'static str {
		match self {
			Size::Sm => "300px",
			Size::Default => "400px",
			Size::Lg => "600px",
			Size::Full => "100%",
		}
	}
}

/// Classes shared by the diagram container and its error panel.
pub fn container_class(variant: Variant, size: Size, extra: &str) -> String {
	let mut class = format!("flow-diagram {} {}", variant.class(), size.class());
	let extra = extra.trim();
	if !extra.is_empty() {
		class.push(' ');
		class.push_str(extra);
	}
	class
}

/// Root element attributes, identical for the diagram container and its error panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	/// `class` attribute.
	pub class: String,
	/// `style` attribute carrying the size's height.
	pub style: String,
}

impl Frame {
	/// Frame for a variant and size, with extra classes appended.
	pub fn new(variant: Variant, size: Size, extra: &str) -> Self {
		Self {
			class: container_class(variant, size, extra),
			style: format!("height: {};", size.height()),
		}
	}
}

/// Failure to decode a [`FlowDiagramData`] payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
	/// Malformed JSON or wrong field types.
	#[error("flow diagram payload is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
}

fn default_true() -> bool {
	true
}

/// Complete input of a flow diagram as produced by an automated caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDiagramData {
	/// Nodes in draw order.
	#[serde(default)]
	pub nodes: Vec<FlowNode>,
	/// Edges in draw order.
	#[serde(default)]
	pub edges: Vec<FlowEdge>,
	/// Heading above the canvas.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Container treatment.
	#[serde(default)]
	pub variant: Variant,
	/// Container height preset.
	#[serde(default)]
	pub size: Size,
	/// Frame the viewport around the nodes.
	#[serde(default = "default_true")]
	pub fit_view: bool,
	/// Allow dragging nodes.
	#[serde(default)]
	pub interactive: bool,
	/// Extra classes on the container.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub class_name: String,
}

impl Default for FlowDiagramData {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			title: None,
			variant: Variant::Default,
			size: Size::Default,
			fit_view: true,
			interactive: false,
			class_name: String::new(),
		}
	}
}

impl FlowDiagramData {
	/// Decode a JSON payload. Node ids must be unique.
	pub fn from_json(json: &str) -> Result<Self, PayloadError> {
		let data: Self = serde_json::from_str(json)?;
		let mut seen = std::collections::HashSet::new();
		for node in &data.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(PayloadError::DuplicateNode(node.id.clone()));
			}
		}
		Ok(data)
	}

	/// Ids of edges whose source or target is not among the nodes.
	pub fn dangling_edges(&self) -> Vec<&str> {
		let ids: std::collections::HashSet<&str> =
			self.nodes.iter().map(|n| n.id.as_str()).collect();
		self.edges
			.iter()
			.filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
			.map(|e| e.id.as_str())
			.collect()
	}
}

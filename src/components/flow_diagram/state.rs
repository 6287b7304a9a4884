use std::collections::HashMap;

use super::types::{FlowNode, Position};

/// Space left of the leftmost node.
pub const MARGIN_LEFT: f64 = 50.0;
/// Space above the topmost node.
pub const MARGIN_TOP: f64 = 50.0;
/// Space right of the rightmost node position.
pub const MARGIN_RIGHT: f64 = 200.0;
/// Space below the lowest node position.
pub const MARGIN_BOTTOM: f64 = 100.0;
/// Smallest fitted viewport width.
pub const MIN_VIEW_WIDTH: f64 = 400.0;
/// Smallest fitted viewport height.
pub const MIN_VIEW_HEIGHT: f64 = 300.0;

/// Current, possibly drag-adjusted, coordinate of every node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionStore {
	positions: HashMap<String, Position>,
}

impl PositionStore {
	/// Store holding the supplied position of every node.
	pub fn from_nodes(nodes: &[FlowNode]) -> Self {
		let mut store = Self::default();
		store.reset(nodes);
		store
	}

	/// Full overwrite from the supplied positions. Drag adjustments are lost.
	pub fn reset(&mut self, nodes: &[FlowNode]) {
		self.positions = nodes
			.iter()
			.map(|node| (node.id.clone(), node.position))
			.collect();
	}

	/// Unknown ids resolve to the origin.
	pub fn get(&self, id: &str) -> Position {
		self.positions.get(id).copied().unwrap_or(Position::ORIGIN)
	}

	/// Whether `id` is a known node.
	pub fn contains(&self, id: &str) -> bool {
		self.positions.contains_key(id)
	}

	/// Returns false when `id` is not a known node; nothing is inserted then.
	pub fn set(&mut self, id: &str, position: Position) -> bool {
		match self.positions.get_mut(id) {
			Some(slot) => {
				*slot = position;
				true
			}
			None => false,
		}
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// No nodes stored.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// `(id, position)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> + '_ {
		self.positions.iter().map(|(id, pos)| (id.as_str(), *pos))
	}
}

/// Visible rectangle of the diagram, in diagram units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			min_x: 0.0,
			min_y: 0.0,
			width: 800.0,
			height: 600.0,
		}
	}
}

impl Viewport {
	/// Bounding rectangle of `positions` plus margins. `None` when empty.
	pub fn fit(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
		let mut iter = positions.into_iter();
		let first = iter.next()?;
		let (mut lo_x, mut lo_y, mut hi_x, mut hi_y) = (first.x, first.y, first.x, first.y);
		for p in iter {
			lo_x = lo_x.min(p.x);
			lo_y = lo_y.min(p.y);
			hi_x = hi_x.max(p.x);
			hi_y = hi_y.max(p.y);
		}

		let (min_x, min_y) = (lo_x - MARGIN_LEFT, lo_y - MARGIN_TOP);
		Some(Self {
			min_x,
			min_y,
			width: (hi_x + MARGIN_RIGHT - min_x).max(MIN_VIEW_WIDTH),
			height: (hi_y + MARGIN_BOTTOM - min_y).max(MIN_VIEW_HEIGHT),
		})
	}

	/// Value for the SVG `viewBox` attribute.
	pub fn view_box(&self) -> String {
		format!("{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
	}

	/// Whether `p` lies inside, edges included.
	pub fn contains(&self, p: Position) -> bool {
		p.x >= self.min_x
			&& p.x <= self.min_x + self.width
			&& p.y >= self.min_y
			&& p.y <= self.min_y + self.height
	}

	/// Diagram units per client pixel when drawn into a `width` x `height`
	/// surface with `xMidYMid meet` scaling.
	pub fn client_scale(&self, width: f64, height: f64) -> f64 {
		if width <= 0.0 || height <= 0.0 {
			return 1.0;
		}
		(self.width / width).max(self.height / height)
	}
}

/// A node being moved by the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
	/// Dragged node.
	pub node_id: String,
	/// Pointer position at pointer-down.
	pub pointer_start: Position,
	/// Node position at pointer-down.
	pub node_start: Position,
	/// Diagram units per pointer unit.
	pub scale: f64,
}

/// Node positions, viewport and the drag state machine of one diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowState {
	positions: PositionStore,
	viewport: Viewport,
	drag: Option<DragSession>,
	fit_view: bool,
	interactive: bool,
}

impl Default for FlowState {
	fn default() -> Self {
		Self {
			positions: PositionStore::default(),
			viewport: Viewport::default(),
			drag: None,
			fit_view: true,
			interactive: false,
		}
	}
}

impl FlowState {
	/// State for `nodes` with the viewport already fitted when `fit_view` is set.
	pub fn new(nodes: &[FlowNode], fit_view: bool, interactive: bool) -> Self {
		let mut state = Self {
			fit_view,
			interactive,
			..Self::default()
		};
		state.set_nodes(nodes);
		state
	}

	/// Current node positions.
	pub fn positions(&self) -> &PositionStore {
		&self.positions
	}

	/// Current position of `id`, or the origin.
	pub fn position(&self, id: &str) -> Position {
		self.positions.get(id)
	}

	/// Last computed viewport.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Active drag, if any.
	pub fn drag(&self) -> Option<&DragSession> {
		self.drag.as_ref()
	}

	/// Whether a drag is in progress.
	pub fn is_dragging(&self) -> bool {
		self.drag.is_some()
	}

	/// Whether the viewport follows the nodes.
	pub fn fit_view(&self) -> bool {
		self.fit_view
	}

	/// Whether pointer-down starts a drag.
	pub fn interactive(&self) -> bool {
		self.interactive
	}

	/// Replace the node collection. Positions are reset and any drag is dropped.
	pub fn set_nodes(&mut self, nodes: &[FlowNode]) {
		self.positions.reset(nodes);
		self.drag = None;
		self.refit();
	}

	/// Toggles fitting; turning it on refits immediately.
	pub fn set_fit_view(&mut self, fit_view: bool) {
		if self.fit_view != fit_view {
			self.fit_view = fit_view;
			self.refit();
		}
	}

	/// Toggles dragging; turning it off ends any active drag.
	pub fn set_interactive(&mut self, interactive: bool) {
		self.interactive = interactive;
		if !interactive {
			self.drag = None;
		}
	}

	/// Recompute the viewport when fitting is enabled; otherwise keep it.
	/// The store mirrors the supplied nodes after every reset, so an empty
	/// store means there is nothing to frame and the viewport is kept.
	pub fn refit(&mut self) {
		if !self.fit_view {
			return;
		}
		if let Some(viewport) = Viewport::fit(self.positions.iter().map(|(_, p)| p)) {
			self.viewport = viewport;
		}
	}

	/// Idle -> Dragging. Ignored in read-only mode.
	pub fn pointer_down(&mut self, node_id: &str, pointer: Position, scale: f64) -> bool {
		if !self.interactive {
			return false;
		}
		self.drag = Some(DragSession {
			node_id: node_id.to_string(),
			pointer_start: pointer,
			node_start: self.positions.get(node_id),
			scale,
		});
		true
	}

	/// Dragging -> Dragging. Returns whether a stored position changed.
	pub fn pointer_move(&mut self, pointer: Position) -> bool {
		let Some(drag) = &self.drag else {
			return false;
		};
		let next = Position::new(
			drag.node_start.x + (pointer.x - drag.pointer_start.x) * drag.scale,
			drag.node_start.y + (pointer.y - drag.pointer_start.y) * drag.scale,
		);
		if !self.positions.set(&drag.node_id, next) {
			return false;
		}
		self.refit();
		true
	}

	/// Dragging -> Idle. The last position is kept.
	pub fn pointer_up(&mut self) {
		self.drag = None;
	}

	/// Same as [`FlowState::pointer_up`].
	pub fn pointer_leave(&mut self) {
		self.drag = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_nodes() -> Vec<FlowNode> {
		vec![
			FlowNode::new("1", "Start", 250.0, 0.0),
			FlowNode::new("2", "Middle", 250.0, 100.0),
			FlowNode::new("3", "End", 250.0, 200.0),
		]
	}

	fn p(x: f64, y: f64) -> Position {
		Position::new(x, y)
	}

	#[test]
	fn store_has_one_entry_per_node() {
		let nodes = sample_nodes();
		let store = PositionStore::from_nodes(&nodes);
		assert_eq!(store.len(), nodes.len());
		for node in &nodes {
			assert_eq!(store.get(&node.id), node.position);
		}
	}

	#[test]
	fn unknown_id_resolves_to_origin() {
		let store = PositionStore::from_nodes(&sample_nodes());
		assert_eq!(store.get("missing"), Position::ORIGIN);
	}

	#[test]
	fn set_never_inserts_unknown_ids() {
		let mut store = PositionStore::from_nodes(&sample_nodes());
		assert!(!store.set("ghost", p(1.0, 1.0)));
		assert!(!store.contains("ghost"));
		assert_eq!(store.len(), 3);
	}

	#[test]
	fn reset_discards_drag_adjustments() {
		let nodes = sample_nodes();
		let mut state = FlowState::new(&nodes, true, true);
		state.pointer_down("1", p(0.0, 0.0), 1.0);
		state.pointer_move(p(40.0, 40.0));
		assert_eq!(state.position("1"), p(290.0, 40.0));

		state.set_nodes(&nodes);
		assert_eq!(state.position("1"), p(250.0, 0.0));
		assert!(!state.is_dragging());
	}

	#[test]
	fn reset_replaces_rather_than_merges() {
		let mut state = FlowState::new(&sample_nodes(), true, false);
		state.set_nodes(&[FlowNode::new("9", "Only", 10.0, 10.0)]);
		assert_eq!(state.positions().len(), 1);
		assert!(!state.positions().contains("1"));
	}

	#[test]
	fn viewport_encloses_sample_with_margins() {
		let state = FlowState::new(&sample_nodes(), true, false);
		let vp = state.viewport();
		assert_eq!(vp.min_x, 200.0);
		assert_eq!(vp.min_y, -50.0);
		assert_eq!(vp.width, 400.0);
		assert_eq!(vp.height, 350.0);
		assert!(vp.contains(p(200.0, -50.0)));
		assert!(vp.contains(p(510.0, 300.0)));
	}

	#[test]
	fn viewport_has_minimum_size() {
		let vp = Viewport::fit([Position::ORIGIN]).unwrap();
		assert_eq!(vp.width, MIN_VIEW_WIDTH);
		assert_eq!(vp.height, MIN_VIEW_HEIGHT);
		assert_eq!((vp.min_x, vp.min_y), (-50.0, -50.0));
	}

	#[test]
	fn viewport_grows_past_minimum() {
		let vp = Viewport::fit([p(0.0, 0.0), p(1000.0, 800.0)]).unwrap();
		assert_eq!(vp.width, 1250.0);
		assert_eq!(vp.height, 950.0);
	}

	#[test]
	fn refit_is_idempotent() {
		let mut state = FlowState::new(&sample_nodes(), true, false);
		let first = state.viewport();
		state.refit();
		assert_eq!(state.viewport(), first);
		state.refit();
		assert_eq!(state.viewport(), first);
	}

	#[test]
	fn viewport_stays_put_without_fit() {
		let state = FlowState::new(&sample_nodes(), false, false);
		assert_eq!(state.viewport(), Viewport::default());

		let mut state = FlowState::new(&sample_nodes(), true, true);
		let fitted = state.viewport();
		state.set_fit_view(false);
		state.pointer_down("3", p(0.0, 0.0), 1.0);
		state.pointer_move(p(900.0, 900.0));
		assert_eq!(state.viewport(), fitted);

		state.set_fit_view(true);
		assert_ne!(state.viewport(), fitted);
		assert!(state.viewport().contains(state.position("3")));
	}

	#[test]
	fn empty_nodes_keep_previous_viewport() {
		let mut state = FlowState::new(&sample_nodes(), true, false);
		let fitted = state.viewport();
		state.set_nodes(&[]);
		assert!(state.positions().is_empty());
		assert_eq!(state.viewport(), fitted);
	}

	#[test]
	fn viewport_fits_store_after_duplicate_ids_collapse() {
		let nodes = vec![
			FlowNode::new("a", "First", 0.0, 0.0),
			FlowNode::new("a", "Second", 600.0, 500.0),
		];
		let state = FlowState::new(&nodes, true, false);
		assert_eq!(state.positions().len(), 1);
		assert_eq!(state.position("a"), p(600.0, 500.0));
		assert_eq!(
			state.viewport(),
			Viewport::fit([p(600.0, 500.0)]).unwrap()
		);
	}

	#[test]
	fn read_only_ignores_drag() {
		let mut state = FlowState::new(&sample_nodes(), true, false);
		assert!(!state.pointer_down("2", p(10.0, 10.0), 1.0));
		assert!(!state.pointer_move(p(60.0, 80.0)));
		state.pointer_up();
		assert_eq!(state.position("2"), p(250.0, 100.0));
	}

	#[test]
	fn drag_moves_only_the_dragged_node() {
		let mut state = FlowState::new(&sample_nodes(), true, true);
		assert!(state.pointer_down("2", p(10.0, 10.0), 1.0));
		assert!(state.pointer_move(p(30.0, 5.0)));
		assert!(state.pointer_move(p(45.0, -20.0)));
		state.pointer_up();

		assert_eq!(state.position("2"), p(285.0, 70.0));
		assert_eq!(state.position("1"), p(250.0, 0.0));
		assert_eq!(state.position("3"), p(250.0, 200.0));
		assert!(!state.is_dragging());
	}

	#[test]
	fn moves_after_release_are_ignored() {
		let mut state = FlowState::new(&sample_nodes(), true, true);
		state.pointer_down("1", p(0.0, 0.0), 1.0);
		state.pointer_move(p(5.0, 5.0));
		state.pointer_leave();
		assert!(!state.pointer_move(p(100.0, 100.0)));
		assert_eq!(state.position("1"), p(255.0, 5.0));
	}

	#[test]
	fn drag_delta_is_scaled() {
		let mut state = FlowState::new(&sample_nodes(), false, true);
		state.pointer_down("1", p(100.0, 100.0), 2.0);
		state.pointer_move(p(110.0, 95.0));
		assert_eq!(state.position("1"), p(270.0, -10.0));
	}

	#[test]
	fn stale_drag_reference_changes_nothing() {
		let mut state = FlowState::new(&sample_nodes(), true, true);
		assert!(state.pointer_down("ghost", p(0.0, 0.0), 1.0));
		assert_eq!(state.drag().unwrap().node_start, Position::ORIGIN);
		assert!(!state.pointer_move(p(10.0, 10.0)));
		assert_eq!(state.positions().len(), 3);
	}

	#[test]
	fn disabling_interaction_ends_drag() {
		let mut state = FlowState::new(&sample_nodes(), true, true);
		state.pointer_down("1", p(0.0, 0.0), 1.0);
		state.set_interactive(false);
		assert!(!state.is_dragging());
		assert!(!state.pointer_move(p(10.0, 10.0)));
	}

	#[test]
	fn client_scale_uses_meet_fit() {
		let vp = Viewport {
			min_x: 0.0,
			min_y: 0.0,
			width: 800.0,
			height: 300.0,
		};
		assert_eq!(vp.client_scale(400.0, 300.0), 2.0);
		assert_eq!(vp.client_scale(0.0, 300.0), 1.0);
		assert_eq!(vp.view_box(), "0 0 800 300");
	}
}

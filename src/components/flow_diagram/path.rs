//! SVG path data for edges.

use super::types::{EdgeKind, Position};

/// Nominal node width used for edge anchors.
pub const NODE_WIDTH: f64 = 150.0;
/// Nominal node height used for edge anchors.
pub const NODE_HEIGHT: f64 = 40.0;
/// Edge labels sit this far above the path midpoint.
pub const LABEL_OFFSET: f64 = 10.0;
/// Length of an arrow head, in diagram units.
pub const ARROW_SIZE: f64 = 10.0;
/// Arrow tips stop this far before the target anchor, at the edge of the
/// nominal box for paths arriving vertically.
pub const ARROW_INSET: f64 = NODE_HEIGHT / 2.0;

/// Path of one edge plus where its label goes.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgePath {
	/// SVG path data.
	pub d: String,
	/// Label center.
	pub label_x: f64,
	/// Label baseline.
	pub label_y: f64,
}

/// Connection point of a node: the center of its nominal footprint.
pub fn anchor(position: Position) -> Position {
	Position::new(position.x + NODE_WIDTH / 2.0, position.y + NODE_HEIGHT / 2.0)
}

/// Build the path between two node positions for the given connector style.
pub fn edge_path(kind: EdgeKind, source: Position, target: Position) -> EdgePath {
	let (s, t) = (anchor(source), anchor(target));
	let mid_y = (s.y + t.y) / 2.0;

	let d = match kind {
		EdgeKind::Straight => format!("M {} {} L {} {}", s.x, s.y, t.x, t.y),
		EdgeKind::Step => format!(
			"M {} {} L {} {} L {} {} L {} {}",
			s.x, s.y, s.x, mid_y, t.x, mid_y, t.x, t.y
		),
		EdgeKind::Default | EdgeKind::SmoothStep | EdgeKind::Bezier => format!(
			"M {} {} C {} {}, {} {}, {} {}",
			s.x, s.y, s.x, mid_y, t.x, mid_y, t.x, t.y
		),
	};

	EdgePath {
		d,
		label_x: (s.x + t.x) / 2.0,
		label_y: mid_y - LABEL_OFFSET,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn straight_is_a_single_segment() {
		let path = edge_path(
			EdgeKind::Straight,
			Position::new(0.0, 0.0),
			Position::new(100.0, 200.0),
		);
		assert_eq!(path.d, "M 75 20 L 175 220");
	}

	#[test]
	fn step_turns_at_vertical_midpoint() {
		let path = edge_path(EdgeKind::Step, Position::new(0.0, 0.0), Position::new(100.0, 200.0));
		assert_eq!(path.d, "M 75 20 L 75 120 L 175 120 L 175 220");
	}

	#[test]
	fn curved_kinds_share_one_cubic() {
		let (a, b) = (Position::new(250.0, 100.0), Position::new(250.0, 200.0));
		let expected = "M 325 120 C 325 170, 325 170, 325 220";
		for kind in [EdgeKind::Default, EdgeKind::SmoothStep, EdgeKind::Bezier] {
			assert_eq!(edge_path(kind, a, b).d, expected, "{kind:?}");
		}
	}

	#[test]
	fn label_sits_above_midpoint() {
		let path = edge_path(
			EdgeKind::Default,
			Position::new(250.0, 100.0),
			Position::new(250.0, 200.0),
		);
		assert_eq!((path.label_x, path.label_y), (325.0, 160.0));
	}
}

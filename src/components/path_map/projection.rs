//! Linear projection of geographic nodes and paths into viewport pixels.
//!
//! Latitude drives the horizontal axis and longitude the vertical one. Each
//! axis is scaled on its own, so the aspect ratio of the geography is not
//! preserved.

use std::collections::{BTreeMap, HashMap};

use super::bounds::{GeoBounds, compute_bounds};
use super::types::{Node, NodeKey, Path, Viewport};

/// Click tolerance around a node centre, in pixels.
pub const HIT_RADIUS: f64 = 12.0;

/// Visual tags of a projected node. Any combination may be set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeTags {
	pub last: bool,
	pub root: bool,
	pub ping: bool,
	pub selected: bool,
}

impl NodeTags {
	/// Pings cannot be clicked or selected.
	pub fn interactive(&self) -> bool {
		!self.ping
	}
}

/// Node position in pixels; `y` is measured up from the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenNode {
	pub key: NodeKey,
	pub x: f64,
	pub y: f64,
	pub tags: NodeTags,
}

/// A path drawn as a segment anchored at its `from` node.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenSegment<'a> {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub length: f64,
	/// Clockwise rotation in radians for a y-down surface.
	pub rotation: f64,
	pub description: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
	pub viewport: Viewport,
	pub bounds: GeoBounds,
	pub nodes: Vec<ScreenNode>,
	pub segments: Vec<ScreenSegment<'a>>,
	/// Indices of paths whose endpoints are not in the node set.
	pub skipped: Vec<usize>,
}

impl Frame<'_> {
	/// Nearest interactive node within [`HIT_RADIUS`] of a point given in
	/// surface coordinates (y measured down from the top edge).
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<NodeKey> {
		let y = self.viewport.height - sy;
		self.nodes
			.iter()
			.filter(|node| node.tags.interactive())
			.map(|node| (node.key, (node.x - sx).hypot(node.y - y)))
			.filter(|&(_, dist)| dist < HIT_RADIUS)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(key, _)| key)
	}

	pub fn node(&self, key: NodeKey) -> Option<&ScreenNode> {
		self.nodes.iter().find(|node| node.key == key)
	}
}

/// Projects the current snapshot into a frame for the given viewport.
pub fn project<'a>(
	nodes: &BTreeMap<NodeKey, Node>,
	paths: &'a [Path],
	viewport: Viewport,
	selected: Option<NodeKey>,
	last: Option<NodeKey>,
) -> Frame<'a> {
	let bounds = compute_bounds(nodes.values());
	let coord_width = bounds.latitude_span();
	let coord_height = bounds.longitude_span();

	let screen_nodes: Vec<ScreenNode> = nodes
		.iter()
		.map(|(&key, node)| {
			let lat_alpha = (node.latitude - bounds.min_latitude) / coord_width;
			let long_alpha = (node.longitude - bounds.min_longitude) / coord_height;
			ScreenNode {
				key,
				x: viewport.width * lat_alpha,
				y: viewport.height * long_alpha,
				tags: NodeTags {
					last: last == Some(key),
					root: node.is_root,
					ping: node.is_ping,
					selected: selected == Some(key),
				},
			}
		})
		.collect();

	let positions: HashMap<NodeKey, (f64, f64)> = screen_nodes
		.iter()
		.map(|node| (node.key, (node.x, node.y)))
		.collect();

	let mut segments = Vec::with_capacity(paths.len());
	let mut skipped = Vec::new();
	for (index, path) in paths.iter().enumerate() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&path.from), positions.get(&path.to))
		else {
			skipped.push(index);
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		segments.push(ScreenSegment {
			index,
			x: x1,
			y: y1,
			length: dx.hypot(dy),
			rotation: -dy.atan2(dx),
			description: &path.description,
		});
	}

	Frame {
		viewport,
		bounds,
		nodes: screen_nodes,
		segments,
		skipped,
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::{FRAC_PI_2, PI};

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::path_map::types::Fix;

	const VIEW: Viewport = Viewport {
		width: 800.0,
		height: 600.0,
	};

	fn nodes(points: &[(u64, f64, f64)]) -> BTreeMap<NodeKey, Node> {
		points
			.iter()
			.map(|&(key, lat, lon)| (NodeKey(key), Node::from_fix(Fix::at(lon, lat))))
			.collect()
	}

	fn path(from: u64, to: u64) -> Path {
		Path {
			from: NodeKey(from),
			to: NodeKey(to),
			description: format!("{from}->{to}"),
		}
	}

	#[test]
	fn empty_snapshot_projects_nothing() {
		let frame = project(&BTreeMap::new(), &[], VIEW, None, None);
		assert!(frame.nodes.is_empty());
		assert!(frame.segments.is_empty());
		assert_eq!(frame.bounds, crate::components::path_map::bounds::EMPTY_BOUNDS);
	}

	#[test]
	fn lone_root_node_sits_in_the_centre() {
		let mut map = BTreeMap::new();
		map.insert(NodeKey(0), Node::root(Fix::at(-93.2, 44.9)));
		let frame = project(&map, &[], VIEW, None, None);
		let node = frame.nodes[0];
		assert!((node.x - 400.0).abs() < 1e-9);
		assert!((node.y - 300.0).abs() < 1e-9);
		assert!(node.tags.root);
	}

	#[test]
	fn minimum_corner_is_inset_by_padding() {
		let map = nodes(&[(0, 0.0, 0.0), (1, 10.0, 20.0), (2, 5.0, 5.0)]);
		let frame = project(&map, &[], VIEW, None, None);
		let corner = frame.node(NodeKey(0)).unwrap();
		assert!(corner.x > 0.0 && corner.y > 0.0);
		// 10% padding on a span of 1.2x the extent puts it at 1/12 of the axis
		assert!((corner.x - 800.0 / 12.0).abs() < 1e-9);
		assert!((corner.y - 600.0 / 12.0).abs() < 1e-9);
		for node in &frame.nodes {
			assert!(node.x > 0.0 && node.x < VIEW.width);
			assert!(node.y > 0.0 && node.y < VIEW.height);
		}
	}

	#[test]
	fn segment_length_matches_projected_distance_and_scales() {
		let map = nodes(&[(0, 0.0, 0.0), (1, 0.0, 10.0)]);
		let paths = [path(0, 1)];

		let frame = project(&map, &paths, VIEW, None, None);
		let (a, b) = (frame.node(NodeKey(0)).unwrap(), frame.node(NodeKey(1)).unwrap());
		let seg = &frame.segments[0];
		assert!((seg.length - (b.x - a.x).hypot(b.y - a.y)).abs() < 1e-9);
		assert_eq!((seg.x, seg.y), (a.x, a.y));
		assert_eq!(seg.description, "0->1");

		let doubled = project(&map, &paths, Viewport::new(1600.0, 1200.0), None, None);
		assert!((doubled.segments[0].length - 2.0 * seg.length).abs() < 1e-9);
	}

	#[test]
	fn rotation_keeps_the_quadrant() {
		let map = nodes(&[(0, 0.0, 0.0), (1, 10.0, 0.0), (2, 0.0, 10.0)]);
		let paths = [path(0, 1), path(1, 0), path(0, 2)];
		let frame = project(&map, &paths, Viewport::new(500.0, 500.0), None, None);

		assert!(frame.segments[0].rotation.abs() < 1e-9);
		// leftward segments point the other way instead of sharing the rightward angle
		assert!((frame.segments[1].rotation.abs() - PI).abs() < 1e-9);
		assert!((frame.segments[2].rotation + FRAC_PI_2).abs() < 1e-9);
	}

	#[test]
	fn dangling_paths_are_skipped() {
		let map = nodes(&[(0, 0.0, 0.0), (1, 1.0, 1.0)]);
		let paths = [path(0, 9), path(0, 1), path(4, 1)];
		let frame = project(&map, &paths, VIEW, None, None);
		assert_eq!(frame.segments.len(), 1);
		assert_eq!(frame.segments[0].index, 1);
		assert_eq!(frame.skipped, vec![0, 2]);
	}

	#[test]
	fn tags_follow_keys_not_positions() {
		let mut map = nodes(&[(0, 0.0, 0.0), (1, 1.0, 1.0)]);
		map.insert(NodeKey(2), Node::ping(Fix::at(0.5, 0.5)));
		let frame = project(&map, &[], VIEW, Some(NodeKey(1)), Some(NodeKey(1)));

		let tags = |k| frame.node(NodeKey(k)).unwrap().tags;
		assert_eq!(
			tags(1),
			NodeTags {
				last: true,
				root: false,
				ping: false,
				selected: true,
			}
		);
		assert_eq!(tags(0), NodeTags::default());
		assert!(tags(2).ping && !tags(2).interactive());
	}

	#[test]
	fn projection_is_deterministic() {
		let map = nodes(&[(0, 44.9, -93.2), (1, 45.0, -93.1), (2, 44.8, -93.3)]);
		let paths = [path(0, 1), path(1, 2)];
		let a = project(&map, &paths, VIEW, Some(NodeKey(2)), Some(NodeKey(0)));
		let b = project(&map, &paths, VIEW, Some(NodeKey(2)), Some(NodeKey(0)));
		assert_eq!(a, b);
	}

	#[test]
	fn hit_test_ignores_pings_and_flips_y() {
		let mut map = nodes(&[(0, 0.0, 0.0), (1, 10.0, 10.0)]);
		map.insert(NodeKey(2), Node::ping(Fix::at(10.0, 0.0)));
		let frame = project(&map, &[], VIEW, None, None);

		let a = *frame.node(NodeKey(0)).unwrap();
		assert_eq!(frame.node_at(a.x + 3.0, VIEW.height - a.y), Some(NodeKey(0)));
		assert_eq!(frame.node_at(a.x, a.y), None);

		let ping = *frame.node(NodeKey(2)).unwrap();
		assert_eq!(frame.node_at(ping.x, VIEW.height - ping.y), None);
	}
}

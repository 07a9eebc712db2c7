//! Padded geographic bounding box used to scale nodes into the viewport.

use super::types::Node;

/// Box returned when there is nothing to frame.
pub const EMPTY_BOUNDS: GeoBounds = GeoBounds {
	min_longitude: -1.0,
	max_longitude: 1.0,
	min_latitude: -1.0,
	max_latitude: 1.0,
};

/// Half width of the box around a lone node, in degrees.
pub const SINGLE_NODE_HALF_SPAN: f64 = 10.0;

/// Fraction of each axis' span added to both ends.
pub const PADDING_RATIO: f64 = 0.1;

/// Spans below this are treated as a single coordinate.
pub const MIN_SPAN: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
	pub min_longitude: f64,
	pub max_longitude: f64,
	pub min_latitude: f64,
	pub max_latitude: f64,
}

impl GeoBounds {
	pub fn longitude_span(&self) -> f64 {
		self.max_longitude - self.min_longitude
	}

	pub fn latitude_span(&self) -> f64 {
		self.max_latitude - self.min_latitude
	}
}

/// Computes the padded bounds of `nodes`.
///
/// Zero nodes give [`EMPTY_BOUNDS`], one node gives a box of
/// ±[`SINGLE_NODE_HALF_SPAN`] around it. With more nodes each axis is padded
/// by [`PADDING_RATIO`] of its span; an axis whose span collapses below
/// [`MIN_SPAN`] gets the single-node box instead, so the result never has a
/// zero span.
pub fn compute_bounds<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> GeoBounds {
	let mut count = 0usize;
	let (mut min_long, mut max_long) = (f64::INFINITY, f64::NEG_INFINITY);
	let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);

	for node in nodes {
		count += 1;
		min_long = min_long.min(node.longitude);
		max_long = max_long.max(node.longitude);
		min_lat = min_lat.min(node.latitude);
		max_lat = max_lat.max(node.latitude);
	}

	if count == 0 {
		return EMPTY_BOUNDS;
	}

	let (min_longitude, max_longitude) = pad_axis(min_long, max_long, count);
	let (min_latitude, max_latitude) = pad_axis(min_lat, max_lat, count);
	GeoBounds {
		min_longitude,
		max_longitude,
		min_latitude,
		max_latitude,
	}
}

fn pad_axis(min: f64, max: f64, count: usize) -> (f64, f64) {
	let span = max - min;
	if count == 1 || span < MIN_SPAN {
		let centre = min + span / 2.0;
		return (centre - SINGLE_NODE_HALF_SPAN, centre + SINGLE_NODE_HALF_SPAN);
	}
	let padding = span * PADDING_RATIO;
	(min - padding, max + padding)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::path_map::types::{Fix, Node};

	fn node(longitude: f64, latitude: f64) -> Node {
		Node::from_fix(Fix::at(longitude, latitude))
	}

	fn contains(bounds: &GeoBounds, n: &Node) -> bool {
		(bounds.min_longitude..=bounds.max_longitude).contains(&n.longitude)
			&& (bounds.min_latitude..=bounds.max_latitude).contains(&n.latitude)
	}

	#[test]
	fn empty_set_uses_default_box() {
		assert_eq!(compute_bounds(&[] as &[Node]), EMPTY_BOUNDS);
	}

	#[test]
	fn single_node_is_centred_in_fixed_box() {
		let bounds = compute_bounds(&[node(5.0, 10.0)]);
		assert_eq!(
			bounds,
			GeoBounds {
				min_longitude: -5.0,
				max_longitude: 15.0,
				min_latitude: 0.0,
				max_latitude: 20.0,
			}
		);
	}

	#[test]
	fn padding_is_a_tenth_of_each_span() {
		let bounds = compute_bounds(&[node(0.0, 0.0), node(10.0, 40.0)]);
		assert!((bounds.min_longitude - -1.0).abs() < 1e-12);
		assert!((bounds.max_longitude - 11.0).abs() < 1e-12);
		assert!((bounds.min_latitude - -4.0).abs() < 1e-12);
		assert!((bounds.max_latitude - 44.0).abs() < 1e-12);
	}

	#[test]
	fn padded_box_strictly_contains_every_node() {
		let nodes = [
			node(-93.2, 44.9),
			node(-93.0, 45.1),
			node(-92.7, 44.95),
			node(-93.4, 44.7),
		];
		let bounds = compute_bounds(&nodes);
		for n in &nodes {
			assert!(contains(&bounds, n));
			assert!(n.longitude > bounds.min_longitude && n.longitude < bounds.max_longitude);
			assert!(n.latitude > bounds.min_latitude && n.latitude < bounds.max_latitude);
		}
	}

	#[test]
	fn shared_latitude_falls_back_per_axis() {
		let bounds = compute_bounds(&[node(0.0, 3.0), node(10.0, 3.0)]);
		assert_eq!(bounds.min_latitude, -7.0);
		assert_eq!(bounds.max_latitude, 13.0);
		assert!((bounds.min_longitude - -1.0).abs() < 1e-12);
		assert!((bounds.max_longitude - 11.0).abs() < 1e-12);
	}

	#[test]
	fn coincident_nodes_behave_like_one() {
		let bounds = compute_bounds(&[node(5.0, 10.0), node(5.0, 10.0)]);
		assert_eq!(bounds, compute_bounds(&[node(5.0, 10.0)]));
		assert!(bounds.longitude_span() > 0.0 && bounds.latitude_span() > 0.0);
	}
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier, assigned in increasing order by the map state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A completed location reading, as handed over by the geolocation task.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fix {
	pub longitude: f64,
	pub latitude: f64,
	pub altitude: Option<f64>,
	pub heading: Option<f64>,
}

impl Fix {
	pub fn at(longitude: f64, latitude: f64) -> Self {
		Self {
			longitude,
			latitude,
			..Self::default()
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	pub longitude: f64,
	pub latitude: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub altitude: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub heading: Option<f64>,
	#[serde(default, skip_serializing_if = "is_false")]
	pub is_root: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub is_ping: bool,
}

fn is_false(flag: &bool) -> bool {
	!*flag
}

impl Node {
	pub fn from_fix(fix: Fix) -> Self {
		Self {
			longitude: fix.longitude,
			latitude: fix.latitude,
			altitude: fix.altitude,
			heading: fix.heading,
			is_root: false,
			is_ping: false,
		}
	}

	pub fn root(fix: Fix) -> Self {
		Self {
			is_root: true,
			..Self::from_fix(fix)
		}
	}

	pub fn ping(fix: Fix) -> Self {
		Self {
			is_ping: true,
			..Self::from_fix(fix)
		}
	}
}

/// Directed, described connection between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
	pub from: NodeKey,
	pub to: NodeKey,
	#[serde(default)]
	pub description: String,
}

impl Path {
	pub fn touches(&self, key: NodeKey) -> bool {
		self.from == key || self.to == key
	}
}

/// The persisted graph: exactly what is sent on save and received on fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
	#[serde(default)]
	pub nodes: BTreeMap<NodeKey, Node>,
	#[serde(default)]
	pub paths: Vec<Path>,
}

/// Pixel size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn node_keys_survive_as_object_keys() {
		let mut data = MapData::default();
		data.nodes.insert(NodeKey(3), Node::root(Fix::at(-93.2, 44.9)));
		data.nodes.insert(NodeKey(7), Node::from_fix(Fix::at(-93.1, 44.8)));
		data.paths.push(Path {
			from: NodeKey(3),
			to: NodeKey(7),
			description: "bridge".into(),
		});

		let json = serde_json::to_value(&data).unwrap();
		assert_eq!(json["nodes"]["3"]["isRoot"], serde_json::json!(true));
		assert!(json["nodes"]["7"].get("isRoot").is_none());
		assert_eq!(json["paths"][0]["to"], serde_json::json!(7));

		let back: MapData = serde_json::from_value(json).unwrap();
		assert_eq!(back, data);
	}

	#[test]
	fn missing_and_null_fields_take_defaults() {
		let raw = r#"{
			"nodes": {"0": {"longitude": 1.5, "latitude": 2.5, "altitude": null, "isPing": true}},
			"paths": []
		}"#;
		let data: MapData = serde_json::from_str(raw).unwrap();
		let node = &data.nodes[&NodeKey(0)];
		assert_eq!(node.altitude, None);
		assert_eq!(node.heading, None);
		assert!(node.is_ping);
		assert!(!node.is_root);
	}

	#[test]
	fn empty_payload_decodes_to_empty_collections() {
		let data: MapData = serde_json::from_str(r#"{"nodes": {}, "paths": []}"#).unwrap();
		assert_eq!(data, MapData::default());
	}
}

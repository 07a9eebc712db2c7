use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};

use super::projection::{Frame, project};
use super::types::{Fix, MapData, Node, NodeKey, Path, Viewport};
use crate::error::MapError;

/// UI actions that wait on a browser request. At most one of each kind may be
/// outstanding at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
	RootNode,
	Ping,
	PathEndpoint,
	Save,
	Fetch,
}

/// Advisory per-action request flags.
#[derive(Clone, Debug, Default)]
pub struct ActionLocks {
	held: HashSet<Action>,
}

impl ActionLocks {
	/// Returns `false` when a request of this kind is already in flight.
	pub fn try_acquire(&mut self, action: Action) -> bool {
		self.held.insert(action)
	}

	pub fn release(&mut self, action: Action) {
		self.held.remove(&action);
	}

	pub fn is_held(&self, action: Action) -> bool {
		self.held.contains(&action)
	}

	pub fn held(&self) -> &HashSet<Action> {
		&self.held
	}
}

/// Owner of the node and path collections plus the selection state. Every
/// mutation goes through here.
pub struct MapState {
	nodes: BTreeMap<NodeKey, Node>,
	paths: Vec<Path>,
	selected: Option<NodeKey>,
	last: Option<NodeKey>,
	/// `None` once the counter is exhausted; keys then fill the lowest gap.
	next_key: Option<u64>,
	pub locks: ActionLocks,
	pub viewport: Viewport,
}

impl MapState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: BTreeMap::new(),
			paths: Vec::new(),
			selected: None,
			last: None,
			next_key: Some(0),
			locks: ActionLocks::default(),
			viewport: Viewport::new(width, height),
		}
	}

	pub fn nodes(&self) -> &BTreeMap<NodeKey, Node> {
		&self.nodes
	}

	pub fn paths(&self) -> &[Path] {
		&self.paths
	}

	pub fn selected(&self) -> Option<NodeKey> {
		self.selected
	}

	pub fn last(&self) -> Option<NodeKey> {
		self.last
	}

	fn allocate_key(&mut self) -> NodeKey {
		let key = match self.next_key {
			Some(key) => key,
			None => self.lowest_free_key(),
		};
		self.next_key = key
			.checked_add(1)
			.filter(|next| !self.nodes.contains_key(&NodeKey(*next)));
		NodeKey(key)
	}

	fn lowest_free_key(&self) -> u64 {
		let mut candidate = 0;
		for key in self.nodes.keys() {
			if key.0 != candidate {
				break;
			}
			candidate += 1;
		}
		candidate
	}

	fn insert(&mut self, node: Node) -> NodeKey {
		let key = self.allocate_key();
		self.nodes.insert(key, node);
		self.last = Some(key);
		key
	}

	pub fn add_root_node(&mut self, fix: Fix) -> NodeKey {
		let key = self.insert(Node::root(fix));
		info!("Added root node {key} at ({}, {})", fix.latitude, fix.longitude);
		key
	}

	/// Replaces any existing ping with a new one.
	pub fn add_ping(&mut self, fix: Fix) -> NodeKey {
		self.clear_pings();
		let key = self.insert(Node::ping(fix));
		debug!("Ping {key} at ({}, {})", fix.latitude, fix.longitude);
		key
	}

	/// Removes every ping node together with the paths that touch one.
	/// Returns the number of nodes removed.
	pub fn clear_pings(&mut self) -> usize {
		let removed: Vec<NodeKey> = self
			.nodes
			.iter()
			.filter(|(_, node)| node.is_ping)
			.map(|(&key, _)| key)
			.collect();
		if removed.is_empty() {
			return 0;
		}
		for key in &removed {
			self.nodes.remove(key);
		}

		let before = self.paths.len();
		self.paths
			.retain(|path| !removed.iter().any(|&key| path.touches(key)));
		if self.paths.len() != before {
			warn!(
				"Dropped {} path(s) attached to cleared ping nodes",
				before - self.paths.len()
			);
		}
		self.forget_missing();
		removed.len()
	}

	/// Adds a node at `fix` and a path to it from the selected node. The new
	/// node becomes the selection so consecutive endpoints chain.
	pub fn add_path_endpoint(&mut self, fix: Fix, description: &str) -> Result<NodeKey, MapError> {
		let from = self.selected.ok_or(MapError::NoSelection)?;
		match self.nodes.get(&from) {
			None => return Err(MapError::UnknownNode(from)),
			Some(node) if node.is_ping => return Err(MapError::PingNotSelectable(from)),
			Some(_) => {}
		}
		let to = self.insert(Node::from_fix(fix));
		self.paths.push(Path {
			from,
			to,
			description: description.trim().to_string(),
		});
		self.selected = Some(to);
		info!("Added path {from} -> {to}");
		Ok(to)
	}

	pub fn add_path(&mut self, from: NodeKey, to: NodeKey, description: &str) -> Result<(), MapError> {
		for key in [from, to] {
			if !self.nodes.contains_key(&key) {
				return Err(MapError::UnknownNode(key));
			}
		}
		self.paths.push(Path {
			from,
			to,
			description: description.trim().to_string(),
		});
		Ok(())
	}

	/// Click behaviour: selecting the selected node clears the selection.
	/// Pings and unknown keys leave the selection untouched.
	pub fn toggle_selection(&mut self, key: NodeKey) -> Option<NodeKey> {
		match self.nodes.get(&key) {
			Some(node) if !node.is_ping => {
				self.selected = if self.selected == Some(key) {
					None
				} else {
					Some(key)
				};
			}
			_ => debug!("Ignoring selection of {key}"),
		}
		self.selected
	}

	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	pub fn reset_all(&mut self) {
		self.nodes.clear();
		self.paths.clear();
		self.selected = None;
		self.last = None;
		self.next_key = Some(0);
	}

	/// Swaps in a fetched graph. New keys continue after the largest fetched one.
	pub fn replace_all(&mut self, data: MapData) {
		self.next_key = match data.nodes.keys().next_back() {
			Some(key) => key.0.checked_add(1),
			None => Some(0),
		};
		self.nodes = data.nodes;
		self.paths = data.paths;
		self.forget_missing();
		info!(
			"Loaded {} node(s) and {} path(s)",
			self.nodes.len(),
			self.paths.len()
		);
		let dangling = self.dangling_paths();
		if !dangling.is_empty() {
			warn!("Loaded paths with missing endpoints, they will not be drawn: {dangling:?}");
		}
	}

	/// Indices of paths whose endpoints are not both present.
	pub fn dangling_paths(&self) -> Vec<usize> {
		self.paths
			.iter()
			.enumerate()
			.filter(|(_, path)| {
				!self.nodes.contains_key(&path.from) || !self.nodes.contains_key(&path.to)
			})
			.map(|(index, _)| index)
			.collect()
	}

	pub fn snapshot(&self) -> MapData {
		MapData {
			nodes: self.nodes.clone(),
			paths: self.paths.clone(),
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	pub fn frame(&self) -> Frame<'_> {
		project(
			&self.nodes,
			&self.paths,
			self.viewport,
			self.selected,
			self.last,
		)
	}

	fn forget_missing(&mut self) {
		if self.selected.is_some_and(|key| !self.nodes.contains_key(&key)) {
			self.selected = None;
		}
		if self.last.is_some_and(|key| !self.nodes.contains_key(&key)) {
			self.last = None;
		}
	}
}

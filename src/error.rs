use thiserror::Error;

use crate::components::path_map::NodeKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
	#[error("Node {0} does not exist")]
	UnknownNode(NodeKey),

	#[error("Select a node to start a path from")]
	NoSelection,

	#[error("Ping node {0} cannot start a path")]
	PingNotSelectable(NodeKey),

	#[error("Not an email-like identifier: {0:?}")]
	InvalidIdentifier(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
	#[error("Geolocation is not available in this browser")]
	Unavailable,

	#[error("Location permission denied")]
	PermissionDenied,

	#[error("Position unavailable")]
	PositionUnavailable,

	#[error("Timed out waiting for a position")]
	Timeout,

	#[error("Couldn't get position: {0}")]
	Failed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
	#[error("Request failed: {0}")]
	Request(String),

	#[error("Server responded with status {0}")]
	Status(u16),

	#[error("Malformed map payload: {0}")]
	Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
	#[error(transparent)]
	Map(#[from] MapError),

	#[error(transparent)]
	Geolocation(#[from] GeolocationError),

	#[error(transparent)]
	Persistence(#[from] PersistenceError),
}

pub type AppResult<T> = Result<T, AppError>;

//! Browser-side collaborators of the map: location fixes and the remote store.

pub mod geolocation;
pub mod persistence;

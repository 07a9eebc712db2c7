//! Save and fetch of the map graph against the remote store.
//!
//! The store keeps one graph per account: `POST {base}/maps/{id}` replaces it
//! with the JSON body, `GET {base}/maps/{id}` returns it.

use std::fmt;

use gloo_net::http::{Request, Response};
use log::{error, info};

use crate::components::path_map::MapData;
use crate::config::AppConfig;
use crate::error::{MapError, PersistenceError};

/// Email-like key the store files a graph under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountId(String);

impl AccountId {
	pub fn parse(raw: &str) -> Result<Self, MapError> {
		let id = raw.trim();
		let valid = match id.split_once('@') {
			Some((local, domain)) => {
				!local.is_empty()
					&& !domain.is_empty()
					&& !domain.contains('@')
					&& !id.chars().any(char::is_whitespace)
			}
			None => false,
		};
		if valid {
			Ok(Self(id.to_string()))
		} else {
			Err(MapError::InvalidIdentifier(raw.to_string()))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn map_url(config: &AppConfig, id: &AccountId) -> String {
	let encoded: String = js_sys::encode_uri_component(id.as_str()).into();
	format!("{}/maps/{}", config.api_base_url, encoded)
}

fn check_status(resp: &Response) -> Result<(), PersistenceError> {
	if resp.ok() {
		Ok(())
	} else {
		Err(PersistenceError::Status(resp.status()))
	}
}

async fn post_map(url: &str, data: &MapData) -> Result<(), PersistenceError> {
	let resp = Request::post(url)
		.json(data)
		.map_err(|e| PersistenceError::Request(e.to_string()))?
		.send()
		.await
		.map_err(|e| PersistenceError::Request(e.to_string()))?;
	check_status(&resp)
}

async fn get_map(url: &str) -> Result<MapData, PersistenceError> {
	let resp = Request::get(url)
		.send()
		.await
		.map_err(|e| PersistenceError::Request(e.to_string()))?;
	check_status(&resp)?;
	resp.json::<MapData>()
		.await
		.map_err(|e| PersistenceError::Decode(e.to_string()))
}

pub async fn save(config: &AppConfig, id: &AccountId, data: &MapData) -> Result<(), PersistenceError> {
	let result = post_map(&map_url(config, id), data).await;
	match &result {
		Ok(()) => info!(
			"Saved {} node(s) and {} path(s) for {id}",
			data.nodes.len(),
			data.paths.len()
		),
		Err(err) => error!("Save for {id} failed: {err}"),
	}
	result
}

/// On failure the caller keeps its current graph.
pub async fn fetch(config: &AppConfig, id: &AccountId) -> Result<MapData, PersistenceError> {
	let result = get_map(&map_url(config, id)).await;
	if let Err(err) = &result {
		error!("Fetch for {id} failed: {err}");
	}
	result
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn accepts_trimmed_email_like_ids() {
		let id = AccountId::parse("  walker@example.org ").unwrap();
		assert_eq!(id.as_str(), "walker@example.org");
	}

	#[test]
	fn rejects_malformed_ids() {
		for raw in ["", "walker", "@example.org", "walker@", "a@b@c", "wal ker@example.org"] {
			assert_eq!(
				AccountId::parse(raw),
				Err(MapError::InvalidIdentifier(raw.to_string())),
				"{raw:?}"
			);
		}
	}
}

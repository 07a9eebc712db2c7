//! Build-time configuration. Every value has a default and can be overridden
//! by setting the matching environment variable when compiling.

const DEFAULT_API_BASE_URL: &str = "/api";
const DEFAULT_GEO_TIMEOUT_MS: u32 = 10_000;

/// Options handed to the browser geolocation API.
#[derive(Clone, Debug, PartialEq)]
pub struct GeolocationConfig {
	pub high_accuracy: bool,
	pub timeout_ms: u32,
	pub maximum_age_ms: u32,
}

impl Default for GeolocationConfig {
	fn default() -> Self {
		Self {
			high_accuracy: true,
			timeout_ms: parse_or(option_env!("PATH_MAP_GEO_TIMEOUT_MS"), DEFAULT_GEO_TIMEOUT_MS),
			maximum_age_ms: 0,
		}
	}
}

/// Settings shared with the component tree through leptos context.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Base URL of the map store, without a trailing slash.
	pub api_base_url: String,
	pub geolocation: GeolocationConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		let api_base_url = option_env!("PATH_MAP_API_URL")
			.unwrap_or(DEFAULT_API_BASE_URL)
			.trim_end_matches('/')
			.to_string();
		Self {
			api_base_url,
			geolocation: GeolocationConfig::default(),
		}
	}
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
	raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unparsable_overrides_fall_back() {
		assert_eq!(parse_or(Some(" 2500 "), 10u32), 2500);
		assert_eq!(parse_or(Some("soon"), 10u32), 10);
		assert_eq!(parse_or::<u32>(None, 10), 10);
	}

	#[test]
	fn base_url_has_no_trailing_slash() {
		assert!(!AppConfig::default().api_base_url.ends_with('/'));
	}
}

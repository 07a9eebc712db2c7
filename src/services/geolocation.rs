//! One-shot position requests against `navigator.geolocation`.

use js_sys::{Function, Promise};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Position, PositionError, PositionOptions};

use crate::components::path_map::Fix;
use crate::config::GeolocationConfig;
use crate::error::GeolocationError;

/// Requests the current position. Resolves once the browser reports a fix,
/// an error, or the configured timeout elapses.
pub async fn locate(config: &GeolocationConfig) -> Result<Fix, GeolocationError> {
	let geolocation = web_sys::window()
		.ok_or(GeolocationError::Unavailable)?
		.navigator()
		.geolocation()
		.map_err(|_| GeolocationError::Unavailable)?;

	let options = PositionOptions::new();
	options.set_enable_high_accuracy(config.high_accuracy);
	options.set_timeout(config.timeout_ms);
	options.set_maximum_age(config.maximum_age_ms);

	let promise = Promise::new(&mut |resolve: Function, reject: Function| {
		let reject_call = reject.clone();
		let on_success = Closure::once_into_js(move |pos: JsValue| {
			let _ = resolve.call1(&JsValue::NULL, &pos);
		});
		let on_error = Closure::once_into_js(move |err: JsValue| {
			let _ = reject.call1(&JsValue::NULL, &err);
		});
		if let Err(err) = geolocation.get_current_position_with_error_callback_and_options(
			on_success.unchecked_ref(),
			Some(on_error.unchecked_ref()),
			&options,
		) {
			let _ = reject_call.call1(&JsValue::NULL, &err);
		}
	});

	match JsFuture::from(promise).await {
		Ok(value) => {
			let coords = value.unchecked_into::<Position>().coords();
			let fix = Fix {
				longitude: coords.longitude(),
				latitude: coords.latitude(),
				altitude: coords.altitude(),
				heading: coords.heading(),
			};
			debug!("Position fix: {fix:?}");
			Ok(fix)
		}
		Err(err) => {
			let err = classify(err);
			warn!("Couldn't get position: {err}");
			Err(err)
		}
	}
}

fn classify(err: JsValue) -> GeolocationError {
	match err.dyn_ref::<PositionError>() {
		Some(e) => from_code(e.code(), e.message()),
		None => GeolocationError::Failed(format!("{err:?}")),
	}
}

fn from_code(code: u16, message: String) -> GeolocationError {
	match code {
		PositionError::PERMISSION_DENIED => GeolocationError::PermissionDenied,
		PositionError::POSITION_UNAVAILABLE => GeolocationError::PositionUnavailable,
		PositionError::TIMEOUT => GeolocationError::Timeout,
		_ => GeolocationError::Failed(message),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn error_codes_map_to_distinct_kinds() {
		assert_eq!(from_code(1, String::new()), GeolocationError::PermissionDenied);
		assert_eq!(from_code(2, String::new()), GeolocationError::PositionUnavailable);
		assert_eq!(from_code(3, "late".into()), GeolocationError::Timeout);
		assert_eq!(
			from_code(9, "odd".into()),
			GeolocationError::Failed("odd".into())
		);
	}
}

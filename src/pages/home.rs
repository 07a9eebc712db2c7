use leptos::prelude::*;

use crate::components::path_map::PathMapCanvas;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<PathMapCanvas />
				<div class="map-overlay">
					<h1>"Path Map"</h1>
					<p class="subtitle">"Drop a start node, then select a node and add paths as you walk."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

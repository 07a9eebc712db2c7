use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::state::{Action, MapState};
use super::types::{Fix, NodeKey};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::geolocation::locate;
use crate::services::persistence::{self, AccountId};

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Reactive mirror of the bits of [`MapState`] the controls display.
#[derive(Clone, Copy)]
struct Ui {
	selected: RwSignal<Option<NodeKey>>,
	busy: RwSignal<HashSet<Action>>,
	status: RwSignal<Option<String>>,
}

impl Ui {
	fn is_busy(&self, action: Action) -> bool {
		self.busy.with(|held| held.contains(&action))
	}
}

/// Applies trigger results to the map state and repaints after each one.
#[derive(Clone)]
struct Controller {
	state: Rc<RefCell<MapState>>,
	ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>>,
	ui: Ui,
	config: AppConfig,
}

impl Controller {
	fn redraw(&self) {
		let state = self.state.borrow();
		if let Some(ctx) = self.ctx.borrow().as_ref() {
			render::render(&state.frame(), ctx);
		}
		self.ui.selected.set(state.selected());
		self.ui.busy.set(state.locks.held().clone());
	}

	fn report(&self, result: AppResult<()>) {
		match result {
			Ok(()) => self.ui.status.set(None),
			Err(err) => {
				warn!("{err}");
				self.ui.status.set(Some(err.to_string()));
			}
		}
	}

	/// Runs `apply` with a fresh position fix unless a request for `action` is
	/// already outstanding. Returns whether a request was started.
	fn locate_then(
		&self,
		action: Action,
		apply: impl FnOnce(&mut MapState, Fix) -> AppResult<()> + 'static,
	) -> bool {
		if !self.state.borrow_mut().locks.try_acquire(action) {
			debug!("{action:?} request already in flight");
			return false;
		}
		self.redraw();

		let this = self.clone();
		spawn_local(async move {
			let located = locate(&this.config.geolocation).await;
			let result = {
				let mut state = this.state.borrow_mut();
				state.locks.release(action);
				located
					.map_err(AppError::from)
					.and_then(|fix| apply(&mut *state, fix))
			};
			this.report(result);
			this.redraw();
		});
		true
	}

	fn clear_pings(&self) {
		let removed = self.state.borrow_mut().clear_pings();
		debug!("Cleared {removed} ping(s)");
		self.redraw();
	}

	fn reset(&self) {
		self.state.borrow_mut().reset_all();
		self.report(Ok(()));
		self.redraw();
	}

	fn click(&self, x: f64, y: f64) {
		let hit = self.state.borrow().frame().node_at(x, y);
		if let Some(key) = hit {
			self.state.borrow_mut().toggle_selection(key);
			self.redraw();
		}
	}

	fn resize(&self, width: f64, height: f64) {
		self.state.borrow_mut().resize(width, height);
		debug!("Updated size to {width}x{height}");
		self.redraw();
	}

	fn account(&self, raw: &str) -> Option<AccountId> {
		match AccountId::parse(raw) {
			Ok(id) => Some(id),
			Err(err) => {
				self.report(Err(err.into()));
				None
			}
		}
	}

	fn save(&self, raw_id: &str) {
		let Some(id) = self.account(raw_id) else {
			return;
		};
		let data = {
			let mut state = self.state.borrow_mut();
			if !state.locks.try_acquire(Action::Save) {
				return;
			}
			state.snapshot()
		};
		self.redraw();

		let this = self.clone();
		spawn_local(async move {
			let result = persistence::save(&this.config, &id, &data).await;
			this.state.borrow_mut().locks.release(Action::Save);
			this.report(result.map_err(AppError::from));
			this.redraw();
		});
	}

	fn fetch(&self, raw_id: &str) {
		let Some(id) = self.account(raw_id) else {
			return;
		};
		if !self.state.borrow_mut().locks.try_acquire(Action::Fetch) {
			return;
		}
		self.redraw();

		let this = self.clone();
		spawn_local(async move {
			let result = persistence::fetch(&this.config, &id).await;
			let result = {
				let mut state = this.state.borrow_mut();
				state.locks.release(Action::Fetch);
				match result {
					Ok(data) => {
						state.replace_all(data);
						Ok(())
					}
					Err(err) => Err(AppError::from(err)),
				}
			};
			this.report(result);
			this.redraw();
		});
	}
}

fn surface_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = surface_size(canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

#[component]
pub fn PathMapCanvas() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (w, h) = FALLBACK_SIZE;
	let controller = Controller {
		state: Rc::new(RefCell::new(MapState::new(w, h))),
		ctx: Rc::new(RefCell::new(None)),
		ui: Ui {
			selected: RwSignal::new(None),
			busy: RwSignal::new(HashSet::new()),
			status: RwSignal::new(None),
		},
		config,
	};
	let ui = controller.ui;
	let description = RwSignal::new(String::new());
	let account = RwSignal::new(String::new());
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let c = controller.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			error!("No window to attach the map to");
			return;
		};

		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
		if ctx.is_none() {
			error!("Canvas 2d context unavailable");
		}
		*c.ctx.borrow_mut() = ctx;

		let (w, h) = fit_canvas(&canvas);
		c.resize(w, h);

		let (c_resize, canvas_resize) = (c.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = fit_canvas(&canvas_resize);
			c_resize.resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let c = controller.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		c.click(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
	};

	let c_root = controller.clone();
	let on_root = move |_| {
		c_root.locate_then(Action::RootNode, |state, fix| {
			state.add_root_node(fix);
			Ok(())
		});
	};

	let c_ping = controller.clone();
	let on_ping = move |_| {
		if c_ping.state.borrow().locks.is_held(Action::Ping) {
			return;
		}
		c_ping.clear_pings();
		c_ping.locate_then(Action::Ping, |state, fix| {
			state.add_ping(fix);
			Ok(())
		});
	};

	let c_clear = controller.clone();
	let on_clear_pings = move |_| c_clear.clear_pings();

	let c_path = controller.clone();
	let on_add_path = move |_| {
		let text = description.get_untracked();
		let started = c_path.locate_then(Action::PathEndpoint, move |state, fix| {
			state.add_path_endpoint(fix, &text)?;
			Ok(())
		});
		if started {
			description.set(String::new());
		}
	};

	let c_deselect = controller.clone();
	let on_deselect = move |_| {
		c_deselect.state.borrow_mut().clear_selection();
		c_deselect.redraw();
	};

	let c_save = controller.clone();
	let on_save = move |_| c_save.save(&account.get_untracked());

	let c_fetch = controller.clone();
	let on_fetch = move |_| c_fetch.fetch(&account.get_untracked());

	let c_reset = controller;
	let on_reset = move |_| c_reset.reset();

	view! {
		<div class="path-map">
			<div class="map-toolbar">
				<button class:disabled=move || ui.is_busy(Action::RootNode) on:click=on_root>
					"Start node"
				</button>
				<button class:disabled=move || ui.is_busy(Action::Ping) on:click=on_ping>
					"Ping"
				</button>
				<button on:click=on_clear_pings>"Clear pings"</button>
				<button on:click=on_reset>"Reset"</button>
			</div>
			<div class="map-panel">
				<canvas
					node_ref=canvas_ref
					class="path-map-canvas"
					on:click=on_click
					style="display: block; cursor: pointer;"
				/>
			</div>
			<div
				class="map-buttons"
				style:display=move || if ui.selected.get().is_some() { "flex" } else { "none" }
			>
				<input
					type="text"
					placeholder="Path description"
					prop:value=move || description.get()
					on:input=move |ev| description.set(event_target_value(&ev))
				/>
				<button class:disabled=move || ui.is_busy(Action::PathEndpoint) on:click=on_add_path>
					"Add path here"
				</button>
				<button on:click=on_deselect>"Deselect"</button>
			</div>
			<div class="account-bar">
				<input
					type="email"
					placeholder="you@example.com"
					prop:value=move || account.get()
					on:input=move |ev| account.set(event_target_value(&ev))
				/>
				<button class:disabled=move || ui.is_busy(Action::Save) on:click=on_save>
					"Save"
				</button>
				<button class:disabled=move || ui.is_busy(Action::Fetch) on:click=on_fetch>
					"Fetch"
				</button>
			</div>
			<p class="map-status">{move || ui.status.get()}</p>
		</div>
	}
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::config::{MeshConfig, Profile};
use super::render::MeshRenderer;
use super::state::MeshState;
use super::types::{Pointer, Viewport};

/// Upper bound on device pixel ratio used for the drawing buffer.
const MAX_PIXEL_RATIO: f64 = 3.0;

struct Surface {
	canvas: HtmlCanvasElement,
	renderer: MeshRenderer,
	viewport: Viewport,
	reference_width: f32,
}

impl Surface {
	/// Matches the drawing buffer to the window at the capped pixel ratio.
	fn fit(&mut self, window: &Window) {
		let Some((w, h)) = window_size(window) else {
			return;
		};
		let dpr = window.device_pixel_ratio().clamp(1.0, MAX_PIXEL_RATIO);
		let (pw, ph) = ((w * dpr) as u32, (h * dpr) as u32);
		self.canvas.set_width(pw);
		self.canvas.set_height(ph);
		let style = web_sys::HtmlElement::style(&self.canvas);
		let _ = style.set_property("width", &format!("{w}px"));
		let _ = style.set_property("height", &format!("{h}px"));
		self.renderer.resize(pw as i32, ph as i32);
		self.viewport = Viewport::from_size(pw as f64, ph as f64, self.reference_width);
		debug!("mesh surface resized to {pw}x{ph}");
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Full-window animated network mesh drawn behind the page content.
#[component]
pub fn NetworkMeshCanvas(
	/// Fixed seed for a reproducible layout; random when omitted.
	#[prop(default = None)]
	seed: Option<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let pointer = Rc::new(Cell::new(Pointer::ABSENT));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let move_cb: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let leave_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window; network mesh disabled");
			return;
		};
		let Some((w, _)) = window_size(&window) else {
			warn!("window size unavailable; network mesh disabled");
			return;
		};

		let config = MeshConfig::for_profile(Profile::for_viewport_width(w));
		let reference_width = config.size_reference_width;
		let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
		let state = match MeshState::new(config, seed) {
			Ok(state) => state,
			Err(e) => {
				error!("network mesh config rejected: {e}");
				return;
			}
		};
		let renderer = match MeshRenderer::new(&canvas) {
			Ok(renderer) => renderer,
			Err(e) => {
				error!("network mesh renderer unavailable: {e}");
				return;
			}
		};
		let mut surface = Surface {
			canvas,
			renderer,
			viewport: Viewport::default(),
			reference_width,
		};
		surface.fit(&window);
		let surface = Rc::new(RefCell::new(surface));
		let state = Rc::new(RefCell::new(state));

		let surface_resize = surface.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			if let Some(win) = web_sys::window() {
				surface_resize.borrow_mut().fit(&win);
			}
		}));
		let pointer_move = pointer.clone();
		*move_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let Some((w, h)) = web_sys::window().as_ref().and_then(window_size) else {
				return;
			};
			pointer_move.set(Pointer::from_client(
				ev.client_x() as f64,
				ev.client_y() as f64,
				w,
				h,
			));
		}));
		let pointer_leave = pointer.clone();
		*leave_cb.borrow_mut() = Some(Closure::new(move || {
			pointer_leave.set(Pointer::ABSENT);
		}));

		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if let Some(ref cb) = *move_cb.borrow() {
			let _ =
				window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}
		let root = window.document().and_then(|d| d.document_element());
		if let (Some(cb), Some(root)) = (&*leave_cb.borrow(), root) {
			let _ = root.add_event_listener_with_callback("mouseleave", cb.as_ref().unchecked_ref());
		}

		let (pointer_anim, animate_inner) = (pointer.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
			{
				let surface = surface.borrow();
				let mut state = state.borrow_mut();
				let geometry = state.tick(now_ms / 1000.0, pointer_anim.get(), surface.viewport);
				surface.renderer.render(geometry);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-mesh-canvas"
			aria-hidden="true"
			style="position: fixed; inset: 0; z-index: -1; pointer-events: none; display: block;"
		/>
	}
}

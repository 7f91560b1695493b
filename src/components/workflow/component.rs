use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent, Window,
};

use super::render;
use super::state::{EditorState, Hit};
use super::storage;

type SharedState = Rc<RefCell<Option<EditorState>>>;

/// How long the copy glyph shows its confirmation state.
const COPY_FLASH_MS: f64 = 1000.0;

fn pointer_pos(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	)
}

fn persist(state: &SharedState) {
	if let Some(ref s) = *state.borrow() {
		storage::save(&s.doc.serialize());
	}
}

/// Writes the node's content to the clipboard; on success the node's copy
/// glyph flips to a checkmark until the deadline passes. A failed write
/// changes nothing.
fn copy_node_content(state: &SharedState, copied_until: &Rc<Cell<f64>>, id: String) {
	let text = state
		.borrow()
		.as_ref()
		.and_then(|s| s.doc.node(&id).map(|n| n.content.clone()));
	let (Some(text), Some(window)) = (text, web_sys::window()) else {
		return;
	};
	let promise = window.navigator().clipboard().write_text(&text);
	let (state, copied_until) = (state.clone(), copied_until.clone());
	spawn_local(async move {
		if JsFuture::from(promise).await.is_ok() {
			if let Some(ref mut s) = *state.borrow_mut() {
				s.copied = Some(id);
			}
			copied_until.set(js_sys::Date::now() + COPY_FLASH_MS);
		}
	});
}

/// The whole editor: toolbar, drawing canvas, and the node edit dialog.
///
/// All graph state lives in one [`EditorState`] behind an `Rc<RefCell>`;
/// pointer handlers feed it screen coordinates and an animation-frame loop
/// redraws everything from scratch each frame.
#[component]
pub fn WorkflowCanvas(
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let title_ref = NodeRef::<leptos::html::Input>::new();
	let content_ref = NodeRef::<leptos::html::Textarea>::new();
	let editing: RwSignal<Option<String>> = RwSignal::new(None);

	let state: SharedState = Rc::new(RefCell::new(None));
	let copied_until: Rc<Cell<f64>> = Rc::new(Cell::new(0.0));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, copied_init, animate_init, resize_cb_init) = (
		state.clone(),
		copied_until.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut editor = EditorState::new(js_sys::Date::now() as u64, w, h);
		if let Some(snapshot) = storage::load() {
			editor.doc.restore(snapshot);
		}
		*state_init.borrow_mut() = Some(editor);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, copied_anim, animate_inner) = (
			state_init.clone(),
			copied_init.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let deadline = copied_anim.get();
				if deadline > 0.0 && js_sys::Date::now() >= deadline {
					s.copied = None;
					copied_anim.set(0.0);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_pd, copied_pd) = (state.clone(), copied_until.clone());
	let on_pointerdown = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, ev.client_x(), ev.client_y());
		let hit = match *state_pd.borrow_mut() {
			Some(ref mut s) => s.pointer_down(x, y),
			None => return,
		};
		if let Hit::Copy(id) = hit {
			copy_node_content(&state_pd, &copied_pd, id);
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_pm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, ev.client_x(), ev.client_y());
		let changed = match *state_pu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(x, y),
			None => false,
		};
		if changed {
			persist(&state_pu);
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut s) = *state_pl.borrow_mut() {
			s.pointer_cancel();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_pos(&canvas, ev.client_x(), ev.client_y());
		let target = state_dc.borrow().as_ref().and_then(|s| {
			s.node_at(x, y)
				.and_then(|id| s.doc.node(&id).map(|n| (id, n.title.clone(), n.content.clone())))
		});
		let Some((id, title, content)) = target else {
			return;
		};
		if let Some(input) = title_ref.get() {
			let input: web_sys::HtmlInputElement = input.into();
			input.set_value(&title);
		}
		if let Some(area) = content_ref.get() {
			let area: web_sys::HtmlTextAreaElement = area.into();
			area.set_value(&content);
		}
		editing.set(Some(id));
	};

	let state_add = state.clone();
	let on_add = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_add.borrow_mut() {
			s.add_default_node();
		}
		persist(&state_add);
	};

	let state_save = state.clone();
	let on_save = move |_: MouseEvent| persist(&state_save);

	let state_load = state.clone();
	let on_load = move |_: MouseEvent| {
		let Some(snapshot) = storage::load() else {
			return;
		};
		if let Some(ref mut s) = *state_load.borrow_mut() {
			s.doc.restore(snapshot);
		}
	};

	let state_es = state.clone();
	let on_edit_save = move |_: MouseEvent| {
		if let Some(id) = editing.get() {
			let title = title_ref
				.get()
				.map(|el| {
					let el: web_sys::HtmlInputElement = el.into();
					el.value()
				})
				.unwrap_or_default();
			let content = content_ref
				.get()
				.map(|el| {
					let el: web_sys::HtmlTextAreaElement = el.into();
					el.value()
				})
				.unwrap_or_default();
			if let Some(ref mut s) = *state_es.borrow_mut() {
				s.doc.update_node(&id, title, content);
			}
			persist(&state_es);
		}
		editing.set(None);
	};

	let on_edit_cancel = move |_: MouseEvent| editing.set(None);

	view! {
		<div class="workflow-editor">
			<div class="toolbar">
				<button on:click=on_add>"Add step"</button>
				<button on:click=on_save>"Save"</button>
				<button on:click=on_load>"Load"</button>
			</div>
			<canvas
				node_ref=canvas_ref
				class="workflow-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointerleave=on_pointerleave
				on:wheel=on_wheel
				on:dblclick=on_dblclick
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<div class="modal" class:hidden=move || editing.get().is_none()>
				<div class="modal-body">
					<input node_ref=title_ref placeholder="Step title" />
					<textarea node_ref=content_ref placeholder="Prompt text"></textarea>
					<div class="modal-actions">
						<button on:click=on_edit_save>"Save"</button>
						<button on:click=on_edit_cancel>"Cancel"</button>
					</div>
				</div>
			</div>
		</div>
	}
}

use leptos::prelude::*;

use crate::components::workflow::WorkflowCanvas;

/// The editor page: a fullscreen workflow canvas with its toolbar overlay.
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

			<div class="fullscreen-editor">
				<WorkflowCanvas fullscreen=true />
				<div class="editor-overlay">
					<h1>"Prompt Flow"</h1>
					<p class="subtitle">
						"Drag steps to reposition. Drag a handle onto another step to connect. Double-click to edit. Scroll to zoom, drag the background to pan."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

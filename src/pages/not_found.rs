use leptos::prelude::*;

/// 404 fallback page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Not Found"</h1>
		<p>"There is nothing here."</p>
	}
}

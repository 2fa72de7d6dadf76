use leptos::prelude::*;

/// 404 page, still drawn over the mesh background.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="page-overlay">
			<h1>"Page not found"</h1>
			<p class="subtitle">
				<a href="/">"Back home"</a>
			</p>
		</main>
	}
}

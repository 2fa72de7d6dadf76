use leptos::prelude::*;

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

			<main class="page-overlay">
				<h1>"Network Mesh"</h1>
				<p class="subtitle">"Move the pointer to push the nodes around."</p>
			</main>
		</ErrorBoundary>
	}
}

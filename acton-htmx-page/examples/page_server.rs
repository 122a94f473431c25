//! Minimal server rendering one HTMX page
//!
//! Run from a project directory containing `node_modules/htmx.org` and an
//! optional `components/` folder:
//!
//! ```text
//! cargo run --example page_server
//! ```

use acton_htmx_page::prelude::*;
use axum::{extract::State, routing::get, Router};

async fn index(State(state): State<PageState>) -> Result<PageResponse, PageError> {
    let items: Node = ["Render", "Hash", "Serve"]
        .iter()
        .map(|step| format!("<li>{step}</li>"))
        .collect();

    let page = Page::from(
        Template::builder()
            .text("<h1>acton-htmx-page</h1><ul>")
            .value(items)
            .text(r#"</ul><button hx-get="/clicked" hx-swap="outerHTML">Click</button>"#)
            .build(),
    );
    state.render(&page).await
}

async fn clicked() -> &'static str {
    "<p>Clicked!</p>"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    acton_htmx_page::observability::init()?;

    let config = PageConfig::load_for_service("page-server")?;
    let state = PageState::from_config(&config)?;

    let app = Router::new()
        .route("/", get(index))
        .route("/clicked", get(clicked))
        .with_state(state.clone())
        .merge(router(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Listening on http://127.0.0.1:3000");
    axum::serve(listener, app).await?;

    Ok(())
}

//! Axum integration
//!
//! [`PageState`] carries everything a page handler needs for one
//! deployment, and [`router`] serves the vendored script next to the pages.
//!
//! ```rust,no_run
//! use acton_htmx_page::prelude::*;
//! use axum::{extract::State, routing::get, Router};
//!
//! async fn index(State(state): State<PageState>) -> Result<PageResponse, PageError> {
//!     let page = Page::from(Template::literal("<h1>${greeting}</h1>"));
//!     state.render(&page).await
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PageConfig::load_for_service("my-app")?;
//! let state = PageState::from_config(&config)?;
//!
//! let app = Router::new()
//!     .route("/", get(index))
//!     .with_state(state.clone())
//!     .merge(router(&state));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::PageConfig;
use crate::error::{PageError, PageResult};
use crate::page::{Page, PageAssembler, PageEnv, PageResponse};
use crate::storage::{FileStorage, LocalFileStorage};
use axum::{
    http::{header::CONTENT_SECURITY_POLICY, HeaderMap, HeaderValue},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeFile;

/// Shared state for page handlers
pub struct PageState<S: FileStorage = LocalFileStorage> {
    assembler: Arc<PageAssembler<S>>,
    env: Arc<PageEnv>,
    headers: HeaderMap,
}

impl<S: FileStorage> Clone for PageState<S> {
    fn clone(&self) -> Self {
        Self {
            assembler: Arc::clone(&self.assembler),
            env: Arc::clone(&self.env),
            headers: self.headers.clone(),
        }
    }
}

impl PageState<LocalFileStorage> {
    /// Creates state over the local filesystem from configuration
    ///
    /// The configured base Content-Security-Policy becomes the incoming
    /// policy every page extends.
    ///
    /// # Errors
    ///
    /// Returns `PageError::InvalidHeader` if the configured policy is not a
    /// valid header value.
    pub fn from_config(config: &PageConfig) -> PageResult<Self> {
        let mut headers = HeaderMap::new();
        let policy = &config.security.content_security_policy;
        if !policy.is_empty() {
            let value = HeaderValue::from_str(policy)
                .map_err(|e| PageError::InvalidHeader(format!("configured CSP: {e}")))?;
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }

        Ok(Self::new(
            PageAssembler::from_config(config),
            PageEnv::from(config),
            headers,
        ))
    }
}

impl<S: FileStorage> PageState<S> {
    /// Creates state from its parts
    #[must_use]
    pub fn new(assembler: PageAssembler<S>, env: PageEnv, headers: HeaderMap) -> Self {
        Self {
            assembler: Arc::new(assembler),
            env: Arc::new(env),
            headers,
        }
    }

    /// Page assembler
    #[must_use]
    pub fn assembler(&self) -> &PageAssembler<S> {
        &self.assembler
    }

    /// Deployment environment
    #[must_use]
    pub fn env(&self) -> &PageEnv {
        &self.env
    }

    /// Headers every page response starts from
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Assembles `page` for the current request
    ///
    /// # Errors
    ///
    /// See [`PageAssembler::build_page`].
    pub async fn render(&self, page: &Page) -> PageResult<PageResponse> {
        page.render(&self.assembler, &self.env, &self.headers).await
    }
}

/// Serves the copied script at its configured URL
///
/// The file only exists once a page has been assembled; until then the
/// route answers 404.
pub fn router<S: FileStorage>(state: &PageState<S>) -> Router {
    let assets = state.assembler().assets();
    let url = assets.script_url();
    let file = state.env().paths.public_dir.join(&assets.file_name);

    tracing::debug!(url = %url, file = %file.display(), "Serving script asset");
    Router::new().route_service(&url, ServeFile::new(file))
}

//! Page assembly
//!
//! [`PageAssembler::build_page`] turns a [`Template`] and its values into a
//! full HTML document plus the response options to send it with:
//!
//! 1. make sure the public directory and the served `htmx.js` exist
//! 2. hash the script and embed it as `<script src integrity>` in the shell
//! 3. load component fragments and resolve the template against them
//! 4. splice the HTML into `<body>` and extend the Content-Security-Policy
//!
//! ```rust,no_run
//! use acton_htmx_page::config::PageConfig;
//! use acton_htmx_page::page::{Page, PageAssembler, PageEnv};
//! use acton_htmx_page::template::Template;
//! use axum::http::HeaderMap;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PageConfig::default();
//! let assembler = PageAssembler::from_config(&config);
//! let env = PageEnv::from(&config);
//!
//! let page = Page::from(Template::builder().text("<h1>").value("Hello").text("</h1>").build());
//! let response = page.render(&assembler, &env, &HeaderMap::new()).await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

mod shell;

pub use shell::{inject_body, inject_script, DefaultShell};

use crate::components::load_components;
use crate::config::{AssetSettings, ComponentSettings, PageConfig, PagePaths};
use crate::error::{PageError, PageResult};
use crate::integrity::IntegrityToken;
use crate::storage::{FileStorage, LocalFileStorage, StorageError};
use crate::template::{resolve, Node, Template};
use axum::{
    http::{
        header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const INDEX_HTML: &str = "index.html";
const STYLE_SRC: &str = "style-src 'unsafe-inline';";

/// Per-deployment environment supplied by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageEnv {
    /// Directories the page is assembled from
    pub paths: PagePaths,
}

impl PageEnv {
    /// Creates an environment from explicit paths
    #[must_use]
    pub const fn new(paths: PagePaths) -> Self {
        Self { paths }
    }
}

impl From<&PageConfig> for PageEnv {
    fn from(config: &PageConfig) -> Self {
        Self::new(config.paths.clone())
    }
}

/// Status and headers to build the HTTP response with
#[derive(Debug, Clone)]
pub struct ResponseOptions {
    /// Response status, always 200 for an assembled page
    pub status: StatusCode,
    /// Incoming headers merged with `Content-Type` and the extended CSP
    pub headers: HeaderMap,
}

/// An assembled page: the HTML body and its response options
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Full HTML document
    pub body: String,
    /// Status and headers
    pub options: ResponseOptions,
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        (self.options.status, self.options.headers, self.body).into_response()
    }
}

/// Builds the `script-src`/`style-src` policy for a page
///
/// The new directives are appended to the raw bytes of `incoming`, so every
/// directive the caller already set is preserved in front of them, even when
/// it carries bytes that are not valid UTF-8.
#[must_use]
pub fn content_security_policy(incoming: &[u8], token: &IntegrityToken) -> Vec<u8> {
    let directives = format!("script-src 'self' '{token}';{STYLE_SRC}");
    [incoming, directives.as_bytes()].concat()
}

/// Assembles server-rendered HTMX pages
#[derive(Debug, Clone)]
pub struct PageAssembler<S: FileStorage = LocalFileStorage> {
    storage: Arc<S>,
    assets: AssetSettings,
    components: ComponentSettings,
}

impl PageAssembler<LocalFileStorage> {
    /// Creates an assembler over the local filesystem
    #[must_use]
    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(
            Arc::new(LocalFileStorage::new()),
            config.assets.clone(),
            config.components.clone(),
        )
    }
}

impl<S: FileStorage> PageAssembler<S> {
    /// Creates an assembler over the given storage backend
    #[must_use]
    pub const fn new(storage: Arc<S>, assets: AssetSettings, components: ComponentSettings) -> Self {
        Self {
            storage,
            assets,
            components,
        }
    }

    /// Storage backend in use
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Asset settings in use
    #[must_use]
    pub const fn assets(&self) -> &AssetSettings {
        &self.assets
    }

    /// Assembles the page for `template` filled with `values`
    ///
    /// `headers` are the response headers the HTTP layer already prepared;
    /// they are kept, except that `Content-Type` and
    /// `Content-Security-Policy` are replaced.
    ///
    /// # Errors
    ///
    /// - `PageError::AssetDirectory` / `PageError::AssetCopy` /
    ///   `PageError::AssetRead` if the script asset cannot be provisioned
    /// - `PageError::ComponentRead` if a component cannot be loaded
    /// - any template resolution error from [`resolve`]
    /// - `PageError::UnsupportedAlgorithm` for a misconfigured digest
    /// - `PageError::InvalidHeader` if the extended CSP is not a valid header value
    pub async fn build_page(
        &self,
        env: &PageEnv,
        template: &Template,
        values: &[Node],
        headers: &HeaderMap,
    ) -> PageResult<PageResponse> {
        self.ensure_public_dir(env).await?;
        let script_path = self.ensure_script(env).await?;

        let token = self.integrity(&script_path).await?;
        let script = self.script_tag(&token);
        let shell = inject_script(&self.load_shell(env).await, &script);

        let components = load_components(
            self.storage.as_ref(),
            &env.paths.components_dir,
            &self.components.extension,
        )
        .await?;
        let html = resolve(template, &components, values)?;
        let body = inject_body(&shell, &html);

        let incoming_csp = headers
            .get(CONTENT_SECURITY_POLICY)
            .map_or(&[][..], HeaderValue::as_bytes);
        let csp = content_security_policy(incoming_csp, &token);

        let mut merged = headers.clone();
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        merged.insert(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_bytes(&csp)
                .map_err(|e| PageError::InvalidHeader(format!("CSP: {e}")))?,
        );

        Ok(PageResponse {
            body,
            options: ResponseOptions {
                status: StatusCode::OK,
                headers: merged,
            },
        })
    }

    /// Renders the script tag for the served asset
    #[must_use]
    pub fn script_tag(&self, token: &IntegrityToken) -> String {
        format!(
            r#"<script src="{}" integrity="{token}"></script>"#,
            self.assets.script_url()
        )
    }

    async fn ensure_public_dir(&self, env: &PageEnv) -> PageResult<()> {
        let dir = &env.paths.public_dir;
        let asset_dir_error = |source: StorageError| PageError::AssetDirectory {
            path: dir.clone(),
            source,
        };

        if !self.storage.exists(dir).await.map_err(asset_dir_error)? {
            self.storage.create_dir(dir).await.map_err(asset_dir_error)?;
            tracing::info!(dir = %dir.display(), "Created public directory");
        }
        Ok(())
    }

    /// Copies the vendored script into the public directory on first use
    async fn ensure_script(&self, env: &PageEnv) -> PageResult<PathBuf> {
        let target = env.paths.public_dir.join(&self.assets.file_name);
        let copy_error = |source: StorageError| PageError::AssetCopy {
            from: self.assets.vendored_script.clone(),
            to: target.clone(),
            source,
        };

        if !self.storage.exists(&target).await.map_err(copy_error)? {
            self.storage
                .copy(&self.assets.vendored_script, &target)
                .await
                .map_err(copy_error)?;
            tracing::info!(
                from = %self.assets.vendored_script.display(),
                to = %target.display(),
                "Copied script asset"
            );
        }
        Ok(target)
    }

    async fn integrity(&self, script_path: &Path) -> PageResult<IntegrityToken> {
        let bytes = self
            .storage
            .read(script_path)
            .await
            .map_err(|source| PageError::AssetRead {
                path: script_path.to_path_buf(),
                source,
            })?;
        let token = IntegrityToken::compute(&bytes, &self.assets.integrity_algorithm)?;
        tracing::debug!(asset = %script_path.display(), integrity = %token, "Computed integrity token");
        Ok(token)
    }

    /// Project `index.html`, or the default shell if it cannot be read
    async fn load_shell(&self, env: &PageEnv) -> String {
        let path = env.paths.static_dir.join(INDEX_HTML);
        match self.storage.read_to_string(&path).await {
            Ok(shell) => shell,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default page shell");
                DefaultShell::get().to_string()
            }
        }
    }
}

/// A template paired with the values for its slots
///
/// This is the handler surface: build it once per route and render it for
/// every request.
#[derive(Debug, Clone)]
pub struct Page {
    template: Template,
    values: Vec<Node>,
}

impl Page {
    /// Pairs `template` with its slot values
    #[must_use]
    pub const fn new(template: Template, values: Vec<Node>) -> Self {
        Self { template, values }
    }

    /// The page template
    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Slot values in order
    #[must_use]
    pub fn values(&self) -> &[Node] {
        &self.values
    }

    /// Assembles this page for one request
    ///
    /// # Errors
    ///
    /// See [`PageAssembler::build_page`].
    pub async fn render<S: FileStorage>(
        &self,
        assembler: &PageAssembler<S>,
        env: &PageEnv,
        headers: &HeaderMap,
    ) -> PageResult<PageResponse> {
        assembler
            .build_page(env, &self.template, &self.values, headers)
            .await
    }
}

impl From<(Template, Vec<Node>)> for Page {
    fn from((template, values): (Template, Vec<Node>)) -> Self {
        Self::new(template, values)
    }
}

impl From<Template> for Page {
    fn from(template: Template) -> Self {
        Self::new(template, Vec::new())
    }
}

#[cfg(test)]
mod tests;

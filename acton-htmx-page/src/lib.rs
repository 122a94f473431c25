//! acton-htmx-page: server-rendered HTMX pages for Acton applications
//!
//! Builds complete HTML responses from a page shell, reusable component
//! fragments and caller-supplied values:
//!
//! - **integrity**: SHA-2 subresource integrity tokens
//! - **components**: loads `*.html` fragments from a directory
//! - **template**: resolves `${0}` slots and `${name}` fragments, then flattens
//! - **page**: provisions `htmx.js`, fills the shell and extends the CSP
//! - **routes**: axum state and the script route
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_htmx_page::prelude::*;
//! use axum::http::HeaderMap;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = PageConfig::default();
//! let assembler = PageAssembler::from_config(&config);
//! let env = PageEnv::from(&config);
//!
//! let (template, values) = Template::builder()
//!     .text("<h1>Hello ")
//!     .value("World")
//!     .text("</h1>")
//!     .build();
//!
//! let response = assembler
//!     .build_page(&env, &template, &values, &HeaderMap::new())
//!     .await?;
//! assert_eq!(response.options.status, 200);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod components;
pub mod config;
pub mod error;
pub mod integrity;
pub mod observability;
pub mod page;
pub mod routes;
pub mod storage;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_htmx_page::prelude::*;
    //! ```

    pub use crate::components::{load_components, Components};
    pub use crate::config::PageConfig;
    pub use crate::error::{PageError, PageResult};
    pub use crate::integrity::IntegrityToken;
    pub use crate::page::{Page, PageAssembler, PageEnv, PageResponse, ResponseOptions};
    pub use crate::routes::{router, PageState};
    pub use crate::storage::{FileStorage, LocalFileStorage, StorageError};
    pub use crate::template::{resolve, Node, Template};
}

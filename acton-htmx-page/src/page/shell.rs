//! Page shell handling
//!
//! The shell is the outer `index.html` skeleton. A project may ship its own
//! in its static directory; otherwise the bundled default is used.

use once_cell::sync::OnceCell;

const BUNDLED_SHELL: &str = include_str!("../../assets/index.html");
const HEAD_CLOSE: &str = "</head>";
const BODY_OPEN: &str = "<body>";

static DEFAULT_SHELL: OnceCell<String> = OnceCell::new();

/// Process-wide fallback shell
///
/// Initialized at most once, either explicitly before serving starts or
/// lazily from the bundled `index.html` on first use. Read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub struct DefaultShell;

impl DefaultShell {
    /// Installs a custom default shell
    ///
    /// Returns `false` (and leaves the shell unchanged) if the default was
    /// already initialized.
    pub fn init(shell: impl Into<String>) -> bool {
        DEFAULT_SHELL.set(shell.into()).is_ok()
    }

    /// Returns the default shell, initializing it from the bundled file
    #[must_use]
    pub fn get() -> &'static str {
        DEFAULT_SHELL.get_or_init(|| BUNDLED_SHELL.to_string())
    }

    /// The bundled shell compiled into the crate
    #[must_use]
    pub const fn bundled() -> &'static str {
        BUNDLED_SHELL
    }
}

/// Inserts `script` right before the first `</head>`
///
/// A shell without `</head>` is returned unchanged.
#[must_use]
pub fn inject_script(shell: &str, script: &str) -> String {
    shell.replacen(HEAD_CLOSE, &format!("{script}{HEAD_CLOSE}"), 1)
}

/// Inserts `html` right after the first `<body>`
///
/// A shell without `<body>` is returned unchanged.
#[must_use]
pub fn inject_body(shell: &str, html: &str) -> String {
    shell.replacen(BODY_OPEN, &format!("{BODY_OPEN}{html}"), 1)
}

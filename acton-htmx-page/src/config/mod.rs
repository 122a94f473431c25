//! Configuration management for acton-htmx-page
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-htmx-page/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-htmx-page/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [paths]
//! static = "./static"
//! public = "./public"
//! components = "./components"
//!
//! [assets]
//! vendored_script = "node_modules/htmx.org/dist/htmx.min.js"
//! file_name = "htmx.js"
//! url_path = "/htmx.js"
//! integrity_algorithm = "sha-384"
//!
//! [components]
//! extension = ".html"
//!
//! [security]
//! content_security_policy = "default-src 'self';"
//! ```

use crate::integrity::DEFAULT_ALGORITHM;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directories a page is assembled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePaths {
    /// Directory holding the project's `index.html` shell
    #[serde(rename = "static")]
    pub static_dir: PathBuf,

    /// Directory served to clients, receives the copied script asset
    #[serde(rename = "public")]
    pub public_dir: PathBuf,

    /// Directory scanned for component fragments
    #[serde(rename = "components")]
    pub components_dir: PathBuf,
}

impl Default for PagePaths {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("./static"),
            public_dir: PathBuf::from("./public"),
            components_dir: PathBuf::from("./components"),
        }
    }
}

/// Vendored script asset settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Where the script is copied from on first use
    pub vendored_script: PathBuf,

    /// File name of the copy inside the public directory
    pub file_name: String,

    /// URL the script is served under
    pub url_path: String,

    /// Digest algorithm for the integrity token
    pub integrity_algorithm: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            vendored_script: ["node_modules", "htmx.org", "dist", "htmx.min.js"]
                .iter()
                .collect(),
            file_name: "htmx.js".to_string(),
            url_path: "/htmx.js".to_string(),
            integrity_algorithm: DEFAULT_ALGORITHM.to_string(),
        }
    }
}

impl AssetSettings {
    /// URL of the served script, always rooted at `/`
    #[must_use]
    pub fn script_url(&self) -> String {
        if self.url_path.starts_with('/') {
            self.url_path.clone()
        } else {
            format!("/{}", self.url_path)
        }
    }
}

/// Component loading settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSettings {
    /// File extension of fragment files
    pub extension: String,
}

impl Default for ComponentSettings {
    fn default() -> Self {
        Self {
            extension: ".html".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Base Content-Security-Policy every page extends
    pub content_security_policy: String,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            content_security_policy: "default-src 'self';".to_string(),
        }
    }
}

/// Complete acton-htmx-page configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageConfig {
    /// Page directories
    #[serde(default)]
    pub paths: PagePaths,

    /// Script asset settings
    #[serde(default)]
    pub assets: AssetSettings,

    /// Component settings
    #[serde(default)]
    pub components: ComponentSettings,

    /// Security settings
    #[serde(default)]
    pub security: SecuritySettings,
}

impl PageConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_htmx_page::config::PageConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = PageConfig::load_for_service("my-app")?;
    /// println!("components from {}", config.paths.components_dir.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            // 5. Start with defaults (lowest priority)
            .merge(Toml::string(&toml::to_string(&Self::default())?));

        // 4. System config
        let system_config = PathBuf::from("/etc/acton-htmx-page")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        // 3. User config
        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        // 2. Local config
        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        // 1. Environment variables
        figment = figment.merge(Env::prefixed("ACTON_").split("__").lowercase(true));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Missing files are ignored and defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail
    /// type conversion.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path))
            .merge(Env::prefixed("ACTON_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// ```rust
    /// use acton_htmx_page::config::PageConfig;
    ///
    /// let path = PageConfig::recommended_path("my-app");
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-htmx-page")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }
}

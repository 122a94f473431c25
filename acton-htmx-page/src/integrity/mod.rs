//! Subresource integrity hashing
//!
//! Produces the base64 digests used in `integrity="..."` attributes and the
//! matching `script-src` hash sources of a Content-Security-Policy.
//!
//! ```rust
//! use acton_htmx_page::integrity::{hash, IntegrityToken, DEFAULT_ALGORITHM};
//!
//! let digest = hash(b"", DEFAULT_ALGORITHM).unwrap();
//! assert_eq!(digest, "OLBgp1GsljhM2TJ+sbHjaiH9txEUvgdDTAzHv2P24donTt6/529l+9Ua0vFImLlb");
//!
//! let token = IntegrityToken::compute(b"", DEFAULT_ALGORITHM).unwrap();
//! assert_eq!(token.to_string(), format!("sha384-{digest}"));
//! ```

use crate::error::{PageError, PageResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

/// Algorithm used when none is configured
pub const DEFAULT_ALGORITHM: &str = "sha-384";

/// Digest algorithms accepted for integrity tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384 (the default)
    Sha384,
    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Prefix used in subresource integrity strings (`sha384`, ...)
    #[must_use]
    pub const fn sri_prefix(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Computes the raw digest of `content`
    #[must_use]
    pub fn digest(self, content: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(content).to_vec(),
            Self::Sha384 => Sha384::digest(content).to_vec(),
            Self::Sha512 => Sha512::digest(content).to_vec(),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = PageError;

    /// Accepts WebCrypto-style names (`SHA-384`) and SRI prefixes (`sha384`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha-256" | "sha256" => Ok(Self::Sha256),
            "sha-384" | "sha384" => Ok(Self::Sha384),
            "sha-512" | "sha512" => Ok(Self::Sha512),
            _ => Err(PageError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha384 => write!(f, "SHA-384"),
            Self::Sha512 => write!(f, "SHA-512"),
        }
    }
}

/// Hashes `content` and returns the digest as standard base64
///
/// # Errors
///
/// Returns `PageError::UnsupportedAlgorithm` if `algorithm` is not a known
/// digest name.
pub fn hash(content: &[u8], algorithm: &str) -> PageResult<String> {
    let algorithm: DigestAlgorithm = algorithm.parse()?;
    Ok(STANDARD.encode(algorithm.digest(content)))
}

/// A subresource integrity token such as `sha384-<base64>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityToken {
    algorithm: DigestAlgorithm,
    digest: String,
}

impl IntegrityToken {
    /// Computes the token for the exact bytes of `content`
    ///
    /// # Errors
    ///
    /// Returns `PageError::UnsupportedAlgorithm` if `algorithm` is not a known
    /// digest name.
    pub fn compute(content: &[u8], algorithm: &str) -> PageResult<Self> {
        let algorithm: DigestAlgorithm = algorithm.parse()?;
        Ok(Self {
            algorithm,
            digest: STANDARD.encode(algorithm.digest(content)),
        })
    }

    /// Algorithm the token was computed with
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Base64 digest without the algorithm prefix
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for IntegrityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.algorithm.sri_prefix(), self.digest)
    }
}

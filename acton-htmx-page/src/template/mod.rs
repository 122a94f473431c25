//! Page templates
//!
//! A [`Template`] is the Rust counterpart of a tagged template literal: `n`
//! static segments with `n - 1` slots between them. Slot `i` is filled by
//! the caller's `values[i]`. Static text may also name component fragments
//! with `${name}`; see [`resolve`] for the full expression grammar.
//!
//! ```rust
//! use acton_htmx_page::components::Components;
//! use acton_htmx_page::template::{resolve, Template};
//!
//! let (template, values) = Template::builder()
//!     .text("Hello ")
//!     .value("World")
//!     .text("!")
//!     .build();
//!
//! let html = resolve(&template, &Components::new(), &values).unwrap();
//! assert_eq!(html, "Hello World!");
//! ```

mod node;
mod resolver;

pub use node::Node;
pub use resolver::resolve;

use crate::error::{PageError, PageResult};

/// Static segments with interpolation slots between them
///
/// Invariant: there is always at least one segment, so a template with `n`
/// segments has exactly `n - 1` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<String>,
}

impl Template {
    /// Creates a template from its static segments
    ///
    /// # Errors
    ///
    /// Returns `PageError::EmptyTemplate` if `segments` is empty.
    pub fn new<I, S>(segments: I) -> PageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PageError::EmptyTemplate);
        }
        Ok(Self { segments })
    }

    /// Creates a template with a single segment and no slots
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
        }
    }

    /// Starts building a template together with its slot values
    #[must_use]
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    /// Static segments in order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of slots (always one less than the number of segments)
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Rebuilds the single expression string `seg0${0}seg1${1}...segN`
    pub(crate) fn expression(&self) -> String {
        let mut expression = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                expression.push_str("${");
                expression.push_str(&(i - 1).to_string());
                expression.push('}');
            }
            expression.push_str(segment);
        }
        expression
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

/// Interleaves static text and slot values into a [`Template`]
///
/// Consecutive `text` calls are joined into one segment, and consecutive
/// `value` calls get an empty segment between them, so the segment/slot
/// invariant always holds.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    segments: Vec<String>,
    current: String,
    values: Vec<Node>,
}

impl TemplateBuilder {
    /// Appends static text
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.current.push_str(text);
        self
    }

    /// Closes the current segment and opens a slot filled by `value`
    #[must_use]
    pub fn value(mut self, value: impl Into<Node>) -> Self {
        self.segments.push(std::mem::take(&mut self.current));
        self.values.push(value.into());
        self
    }

    /// Finishes the template, returning it with its slot values
    #[must_use]
    pub fn build(mut self) -> (Template, Vec<Node>) {
        self.segments.push(self.current);
        (
            Template {
                segments: self.segments,
            },
            self.values,
        )
    }
}

//! Interpolated values and flattening

use std::fmt;

/// A value interpolated into a template slot
///
/// Values may nest: a list of rows, each itself a list of cells, flattens to
/// a single string in document order.
///
/// ```rust
/// use acton_htmx_page::template::Node;
///
/// let rows = Node::from(vec![
///     Node::from("<li>a</li>"),
///     Node::from(vec!["<li>b</li>", "<li>c</li>"]),
///     Node::from(None::<String>),
/// ]);
/// assert_eq!(rows.flatten(), "<li>a</li><li>b</li><li>c</li>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Node {
    /// Absent value, flattens to the empty string
    #[default]
    Empty,
    /// Text inserted verbatim
    Leaf(String),
    /// Ordered children, flattened depth-first
    Sequence(Vec<Node>),
}

impl Node {
    /// Concatenates every leaf depth-first, left to right
    #[must_use]
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Leaf(text) => out.push_str(text),
            Self::Sequence(children) => {
                for child in children {
                    child.write_into(out);
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Leaf(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Leaf(text.to_string())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> FromIterator<T> for Node {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_single_leaf_is_identity() {
        let text = "<p>unchanged</p>";
        assert_eq!(Node::from(text).flatten(), text);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let node = Node::Sequence(vec![
            Node::from("1"),
            Node::Sequence(vec![Node::from("2"), Node::Sequence(vec![Node::from("3")])]),
            Node::from("4"),
        ]);
        assert_eq!(node.flatten(), "1234");
    }

    #[test]
    fn test_empty_branches_flatten_to_nothing() {
        let node = Node::Sequence(vec![Node::Empty, Node::from("x"), Node::Sequence(vec![])]);
        assert_eq!(node.flatten(), "x");
        assert_eq!(Node::default().flatten(), "");
    }

    #[test]
    fn test_collect_from_iterator() {
        let node: Node = (1..=3).map(|i| format!("<i>{i}</i>")).collect();
        assert_eq!(node.to_string(), "<i>1</i><i>2</i><i>3</i>");
    }
}

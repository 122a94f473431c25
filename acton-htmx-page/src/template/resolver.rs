//! Placeholder resolution against fragments and slot values

use super::{Node, Template};
use crate::components::Components;
use crate::error::{PageError, PageResult};

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Resolves `template` into a flat HTML string
///
/// The template is rebuilt as one expression (`seg0${0}seg1...`) and every
/// `${key}` in it is replaced:
///
/// - an all-digit key is a slot and takes `values[key]` verbatim
/// - an identifier (`[A-Za-z_][A-Za-z0-9_-]*`) names a fragment, whose own
///   content is resolved recursively
/// - anything else, including an unterminated `${`, is kept as literal text
///
/// Slot values are never re-scanned and never escaped.
///
/// # Errors
///
/// - `PageError::MissingValue` if a slot index has no value
/// - `PageError::UnknownComponent` if a fragment name is not in `fragments`
/// - `PageError::ComponentCycle` if a fragment ends up including itself
pub fn resolve(template: &Template, fragments: &Components, values: &[Node]) -> PageResult<String> {
    let resolver = Resolver { fragments, values };
    let tree = resolver.expand(&template.expression(), &mut Vec::new())?;
    Ok(tree.flatten())
}

/// A parsed `${...}` key
enum Key<'a> {
    Slot(usize),
    Fragment(&'a str),
}

impl<'a> Key<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        let first = chars.next()?;

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse().ok().map(Self::Slot);
        }

        let valid_start = first.is_ascii_alphabetic() || first == '_';
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        (valid_start && valid_rest).then_some(Self::Fragment(raw))
    }
}

struct Resolver<'a> {
    fragments: &'a Components,
    values: &'a [Node],
}

impl Resolver<'_> {
    /// Expands one expression; `stack` holds the fragments currently open
    fn expand(&self, source: &str, stack: &mut Vec<String>) -> PageResult<Node> {
        let mut parts = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            let (before, tail) = rest.split_at(start);
            if !before.is_empty() {
                parts.push(Node::from(before));
            }

            let body = &tail[OPEN.len()..];
            let Some((raw, after)) = body.split_once(CLOSE) else {
                parts.push(Node::from(tail));
                rest = "";
                break;
            };

            match Key::parse(raw) {
                Some(Key::Slot(index)) => parts.push(self.slot(index)?),
                Some(Key::Fragment(name)) => parts.push(self.fragment(name, stack)?),
                None => {
                    // Not a placeholder: keep the opener and rescan after it
                    parts.push(Node::from(OPEN));
                    rest = body;
                    continue;
                }
            }
            rest = after;
        }

        if !rest.is_empty() {
            parts.push(Node::from(rest));
        }
        Ok(Node::Sequence(parts))
    }

    fn slot(&self, index: usize) -> PageResult<Node> {
        self.values
            .get(index)
            .cloned()
            .ok_or(PageError::MissingValue {
                index,
                provided: self.values.len(),
            })
    }

    fn fragment(&self, name: &str, stack: &mut Vec<String>) -> PageResult<Node> {
        let content = self
            .fragments
            .get(name)
            .ok_or_else(|| PageError::UnknownComponent(name.to_string()))?;

        if stack.iter().any(|open| open == name) {
            return Err(PageError::ComponentCycle(name.to_string()));
        }

        stack.push(name.to_string());
        let node = self.expand(content, stack)?;
        stack.pop();
        Ok(node)
    }
}

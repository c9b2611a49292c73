//! Heading/value pairing over the metrics container
//!
//! The container is a flat run of `<p>` nodes where a heading paragraph is
//! followed by its value paragraph. A heading stays open until a value
//! closes it; a second heading replaces an open one.

use super::types::{NodeKind, TextNode};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    AwaitingHeading,
    HeadingOpen(String),
}

/// Build the ordered heading -> value map.
///
/// Keys are lower-cased heading text, values trimmed value text. Repeated
/// headings keep their first position and take the latest value.
pub fn pair_headings(nodes: &[TextNode]) -> IndexMap<String, String> {
    let mut pairs = IndexMap::new();
    let mut state = ScanState::AwaitingHeading;

    for node in nodes {
        state = match (state, node.kind()) {
            (_, NodeKind::Heading) => ScanState::HeadingOpen(node.text.trim().to_lowercase()),
            (ScanState::HeadingOpen(heading), NodeKind::Value) => {
                pairs.insert(heading, node.text.trim().to_string());
                ScanState::AwaitingHeading
            }
            (state, _) => state,
        };
    }

    // an open heading at the end has no value and is dropped
    pairs
}

//! Testing utilities for tintmark workspace
//!
//! Shared fixtures, markup helpers and tree generators.

#![allow(missing_docs)]

use proptest::prelude::*;
use tintmark_tree::{Document, Element, NodeId, NodeKind};
use tintmark_xml::{SerializeOptions, XmlParser, XmlSerializer};

/// First candidate carries the marker, second does not.
pub const SCENARIO_MARKED: &str =
    "<Root><Neutral><Origin/></Neutral><Neutral><Other/></Neutral></Root>";

pub const SCENARIO_MARKED_EXPECTED: &str = concat!(
    "<Root><Neutral><Origin/><Actor.Color R=\"128\" G=\"128\" B=\"128\"/></Neutral>",
    "<Neutral><Other/></Neutral></Root>",
);

/// First candidate already holds a property with an extra attribute.
pub const SCENARIO_EXISTING: &str = concat!(
    "<Root><Neutral><Origin/><Actor.Color R=\"0\" G=\"0\" B=\"0\" X=\"9\"/></Neutral>",
    "<Neutral><Other/></Neutral></Root>",
);

pub const SCENARIO_EXISTING_EXPECTED: &str = concat!(
    "<Root><Neutral><Origin/><Actor.Color R=\"128\" G=\"128\" B=\"128\" X=\"9\"/></Neutral>",
    "<Neutral><Other/></Neutral></Root>",
);

/// No element matches the default candidate tag.
pub const SCENARIO_NO_CANDIDATES: &str =
    "<Root><Actor><Origin/></Actor><!-- keep --><Other a=\"1\">text</Other></Root>";

/// Parse markup, panicking on malformed fixtures
pub fn parse(xml: &str) -> Document {
    XmlParser::new()
        .parse(xml)
        .unwrap_or_else(|err| panic!("fixture does not parse: {err}\n{xml}"))
}

/// Render with default options (no declaration, no indentation)
pub fn render(doc: &Document) -> String {
    XmlSerializer::new(SerializeOptions::default())
        .serialize_to_string(doc)
        .unwrap_or_else(|err| panic!("document does not render: {err}"))
}

/// Every node of the subtree under `id` (inclusive) with its parent and payload
///
/// Two equal snapshots mean the subtree was not touched.
pub fn subtree_snapshot(doc: &Document, id: NodeId) -> Vec<(NodeId, Option<NodeId>, NodeKind)> {
    std::iter::once(id)
        .chain(doc.descendants(id))
        .filter_map(|node_id| {
            doc.node(node_id)
                .map(|node| (node_id, node.parent(), node.kind().clone()))
        })
        .collect()
}

/// Tags used by generated trees
pub const TAGS: [&str; 4] = ["Neutral", "Origin", "Actor.Color", "Other"];

/// One generated node: parent choice, tag choice and optional attribute values
#[derive(Debug, Clone)]
pub struct NodeShape {
    pub parent: usize,
    pub tag: usize,
    pub attributes: Vec<(usize, u8)>,
    pub text: bool,
}

const ATTRIBUTE_KEYS: [&str; 4] = ["R", "G", "B", "X"];

/// Build a document from generated shapes
///
/// Parent choices index the list of already created elements, which always
/// yields a valid tree. A shape with `text` also gets a text child.
pub fn build_document(shapes: &[NodeShape]) -> Document {
    let mut doc = Document::with_root("Root");
    let mut elements: Vec<NodeId> = vec![doc.document_element().expect("root element")];
    for shape in shapes {
        let parent = elements[shape.parent % elements.len()];
        let mut element = Element::new(TAGS[shape.tag % TAGS.len()]);
        for &(key, value) in &shape.attributes {
            element.set_attribute(ATTRIBUTE_KEYS[key % ATTRIBUTE_KEYS.len()], value.to_string());
        }
        let id = doc.append(parent, NodeKind::Element(element)).expect("append element");
        if shape.text {
            doc.append(id, NodeKind::Text(" ".to_string())).expect("append text");
        }
        elements.push(id);
    }
    doc
}

/// Strategy for a single generated node
pub fn node_shape() -> impl Strategy<Value = NodeShape> {
    (
        0..64usize,
        0..TAGS.len(),
        proptest::collection::vec((0..ATTRIBUTE_KEYS.len(), any::<u8>()), 0..3),
        any::<bool>(),
    )
        .prop_map(|(parent, tag, attributes, text)| NodeShape {
            parent,
            tag,
            attributes,
            text,
        })
}

/// Strategy for whole documents built from [`node_shape`]
pub fn arb_document() -> impl Strategy<Value = Document> {
    proptest::collection::vec(node_shape(), 0..40).prop_map(|shapes| build_document(&shapes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_parse_and_render_unchanged() {
        for fixture in [
            SCENARIO_MARKED,
            SCENARIO_MARKED_EXPECTED,
            SCENARIO_EXISTING,
            SCENARIO_EXISTING_EXPECTED,
            SCENARIO_NO_CANDIDATES,
        ] {
            assert_eq!(render(&parse(fixture)), fixture);
        }
    }

    #[test]
    fn snapshot_covers_subtree() {
        let doc = parse(SCENARIO_MARKED);
        let root = doc.document_element().unwrap();
        assert_eq!(subtree_snapshot(&doc, root).len(), 5);
    }

    #[test]
    fn build_document_wraps_parent_choices() {
        let shapes = vec![
            NodeShape { parent: 0, tag: 0, attributes: vec![], text: false },
            NodeShape { parent: 7, tag: 1, attributes: vec![(0, 1)], text: true },
        ];
        let doc = build_document(&shapes);
        // document node, Root, Neutral, Origin, text
        assert_eq!(doc.node_count(), 5);
    }
}

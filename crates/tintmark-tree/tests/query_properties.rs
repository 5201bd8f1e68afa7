//! Property tests for descendant selection over generated trees.

use proptest::prelude::*;
use tintmark_test_utils::{arb_document, TAGS};
use tintmark_tree::{DescendantQuery, Document, NodeId};

/// Document-order reference walk over `children`
fn preorder(doc: &Document, id: NodeId, out: &mut Vec<NodeId>) {
    for &child in doc.children(id) {
        out.push(child);
        preorder(doc, child, out);
    }
}

proptest! {
    #[test]
    fn prop_selection_is_the_tagged_elements_in_document_order(
        doc in arb_document(),
        tag in 0..TAGS.len(),
    ) {
        let query = DescendantQuery::new(TAGS[tag]).unwrap();

        let mut order = Vec::new();
        preorder(&doc, doc.root(), &mut order);
        let expected: Vec<NodeId> = order
            .into_iter()
            .filter(|&id| doc.name(id) == Some(TAGS[tag]))
            .collect();

        prop_assert_eq!(query.select(&doc), expected);
    }

    #[test]
    fn prop_selection_is_stable_under_appends(doc in arb_document()) {
        let mut doc = doc;
        let query = DescendantQuery::new("Neutral").unwrap();
        let before = query.select(&doc);

        for &id in &before {
            doc.append_element(id, "Actor.Color").unwrap();
        }

        for id in &before {
            prop_assert_eq!(doc.name(*id), Some("Neutral"));
        }
        prop_assert_eq!(query.select(&doc), before);
    }
}

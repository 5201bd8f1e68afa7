//! Structural predicates over candidate subtrees
//!
//! Two read-only searches, both operating on element children only:
//!
//! - [`has_qualifying_descendant`]: is a tag present anywhere below a node?
//! - [`locate_property_node`]: follow a same-tag descent path to a leaf.
//!
//! The second walk is narrow. It tolerates wrapper levels that
//! repeat the property tag and gives up as soon as no same-tagged child
//! exists; it never searches breadth-wise.

use tintmark_tree::{Document, NodeId};

/// Find the first descendant of `node` tagged `target`
///
/// Each level scans the direct children in order before recursing into
/// them one by one, so a shallow match under an early child wins over a
/// deeper one. Leaves yield `None`.
#[must_use]
pub fn find_qualifying_descendant(doc: &Document, node: NodeId, target: &str) -> Option<NodeId> {
    // Explicit stack: nesting depth is bounded only by the input size.
    let mut pending = vec![node];
    while let Some(current) = pending.pop() {
        let children: Vec<NodeId> = doc.element_children(current).collect();
        if let Some(&hit) = children
            .iter()
            .find(|&&child| doc.name(child) == Some(target))
        {
            return Some(hit);
        }
        pending.extend(children.into_iter().rev());
    }
    None
}

/// Check whether any descendant of `node` is tagged `target`
#[inline]
#[must_use]
pub fn has_qualifying_descendant(doc: &Document, node: NodeId, target: &str) -> bool {
    find_qualifying_descendant(doc, node, target).is_some()
}

/// Walk from `start` towards a leaf tagged `property_tag`
///
/// While the current node has element children, descend into the first
/// child tagged `property_tag`; if there is none the walk is stuck and
/// yields `None`. Once a childless node is reached it is returned if its
/// tag is `property_tag`.
///
/// A walk longer than the document has nodes cannot terminate normally and
/// is treated as not found.
#[must_use]
pub fn locate_property_node(doc: &Document, start: NodeId, property_tag: &str) -> Option<NodeId> {
    let mut current = start;
    let mut steps = 0usize;

    loop {
        let mut children = doc.element_children(current).peekable();
        if children.peek().is_none() {
            break;
        }

        current = children.find(|&child| doc.name(child) == Some(property_tag))?;

        steps += 1;
        if steps > doc.node_count() {
            tracing::warn!(
                start = %start,
                property_tag,
                steps,
                "property walk stalled; treating property as absent"
            );
            return None;
        }
    }

    (doc.name(current) == Some(property_tag)).then_some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tintmark_tree::NodeKind;

    /// `<Neutral><A><B><Origin/></B></A><C/></Neutral>`
    fn nested() -> (Document, NodeId, NodeId) {
        let mut doc = Document::with_root("Neutral");
        let neutral = doc.document_element().unwrap();
        let a = doc.append_element(neutral, "A").unwrap();
        let b = doc.append_element(a, "B").unwrap();
        let origin = doc.append_element(b, "Origin").unwrap();
        doc.append_element(neutral, "C").unwrap();
        (doc, neutral, origin)
    }

    #[test]
    fn finds_deep_descendant() {
        let (doc, neutral, origin) = nested();
        assert_eq!(find_qualifying_descendant(&doc, neutral, "Origin"), Some(origin));
        assert!(has_qualifying_descendant(&doc, neutral, "Origin"));
        assert!(!has_qualifying_descendant(&doc, neutral, "Missing"));
    }

    #[test]
    fn leaf_never_qualifies() {
        let (doc, _, origin) = nested();
        assert!(!has_qualifying_descendant(&doc, origin, "Origin"));
    }

    #[test]
    fn node_itself_is_not_a_descendant() {
        let doc = Document::with_root("Origin");
        let root = doc.document_element().unwrap();
        assert!(!has_qualifying_descendant(&doc, root, "Origin"));
    }

    #[test]
    fn direct_children_are_scanned_before_recursion() {
        // <R><A><T id="deep"/></A><T id="shallow"/></R>
        let mut doc = Document::with_root("R");
        let root = doc.document_element().unwrap();
        let a = doc.append_element(root, "A").unwrap();
        doc.append_element(a, "T").unwrap();
        let shallow = doc.append_element(root, "T").unwrap();

        assert_eq!(find_qualifying_descendant(&doc, root, "T"), Some(shallow));
    }

    #[test]
    fn recursion_follows_child_order() {
        // <R><A><X><T/></X></A><B><T/></B></R>
        let mut doc = Document::with_root("R");
        let root = doc.document_element().unwrap();
        let a = doc.append_element(root, "A").unwrap();
        let x = doc.append_element(a, "X").unwrap();
        let first = doc.append_element(x, "T").unwrap();
        let b = doc.append_element(root, "B").unwrap();
        doc.append_element(b, "T").unwrap();

        assert_eq!(find_qualifying_descendant(&doc, root, "T"), Some(first));
    }

    #[test]
    fn deep_chains_are_searched_without_recursion() {
        let mut doc = Document::with_root("R");
        let root = doc.document_element().unwrap();
        let mut current = root;
        for _ in 0..200_000 {
            current = doc.append_element(current, "Wrap").unwrap();
        }
        let target = doc.append_element(current, "T").unwrap();

        assert_eq!(find_qualifying_descendant(&doc, root, "T"), Some(target));
        assert!(!has_qualifying_descendant(&doc, root, "Missing"));
    }

    #[test]
    fn text_and_comments_are_ignored() {
        let mut doc = Document::with_root("R");
        let root = doc.document_element().unwrap();
        doc.append(root, NodeKind::Text("Origin".into())).unwrap();
        doc.append(root, NodeKind::Comment("<Origin/>".into())).unwrap();
        assert!(!has_qualifying_descendant(&doc, root, "Origin"));
    }

    #[test]
    fn locate_returns_childless_start_with_matching_tag() {
        let doc = Document::with_root("Actor.Color");
        let start = doc.document_element().unwrap();
        assert_eq!(locate_property_node(&doc, start, "Actor.Color"), Some(start));
    }

    #[test]
    fn locate_rejects_childless_start_with_other_tag() {
        let doc = Document::with_root("Other");
        let start = doc.document_element().unwrap();
        assert_eq!(locate_property_node(&doc, start, "Actor.Color"), None);
    }

    #[test]
    fn locate_descends_through_same_tag_wrappers() {
        // <Actor.Color><Actor.Color><Actor.Color/></Actor.Color></Actor.Color>
        let mut doc = Document::with_root("Actor.Color");
        let outer = doc.document_element().unwrap();
        let middle = doc.append_element(outer, "Actor.Color").unwrap();
        let inner = doc.append_element(middle, "Actor.Color").unwrap();

        assert_eq!(locate_property_node(&doc, outer, "Actor.Color"), Some(inner));
    }

    #[test]
    fn locate_takes_first_same_tag_child() {
        let mut doc = Document::with_root("Actor.Color");
        let outer = doc.document_element().unwrap();
        doc.append_element(outer, "Other").unwrap();
        let first = doc.append_element(outer, "Actor.Color").unwrap();
        doc.append_element(outer, "Actor.Color").unwrap();

        assert_eq!(locate_property_node(&doc, outer, "Actor.Color"), Some(first));
    }

    #[test]
    fn locate_gives_up_without_same_tag_child() {
        // <Actor.Color><Wrapper><Actor.Color/></Wrapper></Actor.Color>
        let mut doc = Document::with_root("Actor.Color");
        let outer = doc.document_element().unwrap();
        let wrapper = doc.append_element(outer, "Wrapper").unwrap();
        doc.append_element(wrapper, "Actor.Color").unwrap();

        assert_eq!(locate_property_node(&doc, outer, "Actor.Color"), None);
    }

    #[test]
    fn locate_ignores_text_children() {
        let mut doc = Document::with_root("Actor.Color");
        let start = doc.document_element().unwrap();
        doc.append(start, NodeKind::Text("\n  ".into())).unwrap();
        assert_eq!(locate_property_node(&doc, start, "Actor.Color"), Some(start));
    }

    #[test]
    fn locate_unknown_start_is_not_found() {
        let doc = Document::with_root("Actor.Color");
        assert_eq!(
            locate_property_node(&doc, NodeId::from_index(42), "Actor.Color"),
            None
        );
    }
}

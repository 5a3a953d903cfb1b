//! Property-based tests for the document engine
//!
//! Trees are generated, written out as markup, parsed back and compared.
//! The remaining properties cover tree links, signed indexing, name
//! matching and text decoding.

use minixml::{decode_text, Document, GrowList, Node, ParseOptions};
use proptest::prelude::*;

/// Generated element
#[derive(Debug, Clone)]
struct Elem {
    name: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Elem>,
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-c][a-c0-9]{0,2}"
}

fn arb_attrs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z][a-z]{0,3}", "[a-z0-9 ]{0,6}"), 0..3)
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9 ]{0,7}"
}

fn arb_element() -> impl Strategy<Value = Elem> {
    let leaf = (arb_name(), arb_attrs(), prop::option::of(arb_text())).prop_map(
        |(name, attrs, text)| Elem {
            name,
            attrs,
            text,
            children: Vec::new(),
        },
    );
    leaf.prop_recursive(3, 32, 5, |inner| {
        (
            arb_name(),
            arb_attrs(),
            prop::option::of(arb_text()),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(name, attrs, text, children)| Elem {
                name,
                attrs,
                text,
                children,
            })
    })
}

/// Write an element as markup, text before children
fn write_elem(elem: &Elem, out: &mut String) {
    out.push('<');
    out.push_str(&elem.name);
    for (key, value) in &elem.attrs {
        out.push_str(&format!(" {key}=\"{value}\""));
    }
    if elem.text.is_none() && elem.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(text) = &elem.text {
        out.push_str(text);
    }
    for child in &elem.children {
        write_elem(child, out);
    }
    out.push_str("</");
    out.push_str(&elem.name);
    out.push('>');
}

fn serialize(elem: &Elem) -> String {
    let mut out = String::new();
    write_elem(elem, &mut out);
    out
}

fn assert_same_tree(expected: &Elem, node: Node<'_>) -> Result<(), TestCaseError> {
    prop_assert_eq!(node.name(), Some(expected.name.as_str()));
    let attrs: Vec<(String, String)> = node
        .attributes()
        .map(|a| (a.key.to_string(), a.value.to_string()))
        .collect();
    prop_assert_eq!(&attrs, &expected.attrs);
    prop_assert_eq!(node.text(), expected.text.as_deref());
    prop_assert_eq!(node.child_count(), expected.children.len());
    for (child_elem, child) in expected.children.iter().zip(node.children()) {
        assert_same_tree(child_elem, child)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn roundtrip_preserves_tree(elem in arb_element()) {
        let markup = serialize(&elem);
        let doc = Document::parse_with(markup.as_str(), &ParseOptions::strict())
            .map_err(|e| TestCaseError::fail(format!("{e} in {markup}")))?;
        assert_same_tree(&elem, doc.root())?;
    }

    #[test]
    fn every_child_appears_once_under_its_parent(elem in arb_element()) {
        let doc = Document::parse(serialize(&elem)).unwrap();
        for node in doc.nodes() {
            match node.parent() {
                Some(parent) => {
                    prop_assert_eq!(parent.children().filter(|c| *c == node).count(), 1);
                    prop_assert_eq!(parent.child(node.index() as isize), Some(node));
                }
                None => prop_assert_eq!(node, doc.root()),
            }
        }
    }

    #[test]
    fn negative_child_index_counts_from_end(elem in arb_element()) {
        let doc = Document::parse(serialize(&elem)).unwrap();
        let root = doc.root();
        let count = root.child_count() as isize;
        for i in -(count + 2)..(count + 2) {
            let expected = if (0..count).contains(&i) {
                root.children().nth(i as usize)
            } else if (-count..0).contains(&i) {
                root.children().nth((count + i) as usize)
            } else {
                None
            };
            prop_assert_eq!(root.child(i), expected);
            if let Some(child) = expected {
                let path = format!("{}[{}]", child.name().unwrap_or(""), i);
                prop_assert_eq!(root.select(&path), Some(child));
            }
        }
        if count > 0 {
            prop_assert_eq!(root.child(-1), root.child(count - 1));
        }
    }

    #[test]
    fn find_all_is_prefix_filtered_in_document_order(
        elem in arb_element(),
        prefix in "[a-c]{0,2}",
    ) {
        let doc = Document::parse(serialize(&elem)).unwrap();
        let root = doc.root();
        let found = root.find_all(&prefix);
        prop_assert!(found
            .iter()
            .all(|n| n.name().is_some_and(|name| name.starts_with(&prefix))));
        prop_assert!(found.iter().zip(found.iter().skip(1)).all(|(a, b)| a.index() < b.index()));
        let expected = root
            .children()
            .filter(|c| c.name().is_some_and(|name| name.starts_with(&prefix)))
            .count();
        prop_assert_eq!(found.len(), expected);
        prop_assert_eq!(root.find_first(&prefix), found.first().copied());
    }

    #[test]
    fn grow_list_signed_indexing(
        items in prop::collection::vec(any::<u8>(), 0..16),
        index in -20isize..20,
    ) {
        let list: GrowList<u8> = items.iter().copied().collect();
        let len = items.len() as isize;
        let expected = if index >= 0 && index < len {
            items.get(index as usize)
        } else if index < 0 && index >= -len {
            items.get((len + index) as usize)
        } else {
            None
        };
        prop_assert_eq!(list.get(index), expected);
    }

    #[test]
    fn decode_text_is_identity_without_escapes(text in "[a-z <>\\]\\[!;]{0,24}") {
        prop_assume!(!text.contains("<![CDATA[") && !text.contains("]]>"));
        let once = decode_text(&text);
        prop_assert_eq!(once.as_ref(), text.as_str());
        let twice = decode_text(&once);
        prop_assert_eq!(twice.as_ref(), once.as_ref());
    }

    #[test]
    fn decode_text_never_grows(text in "[a-z&;<>\\[\\]!CDAT]{0,32}") {
        prop_assert!(decode_text(&text).len() <= text.len());
    }
}

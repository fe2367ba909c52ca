// ABOUTME: Flattens an element subtree to line-oriented text, skipping navigation and other noise.
// ABOUTME: Block elements and <br> become line breaks so verse and paragraph boundaries survive.

use std::collections::HashSet;

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::node::Element;
use scraper::{ElementRef, Node};

use crate::patterns::{BLOCK_TAGS, NOISE_CLASSES, NOISE_TAGS, VERSE_LABEL_CLASS_HINT};

fn is_noise(element: &Element) -> bool {
    if NOISE_TAGS.contains(&element.name()) {
        return true;
    }
    element
        .classes()
        .any(|class| NOISE_CLASSES.iter().any(|noise| class.eq_ignore_ascii_case(noise)))
}

fn is_block(element: &Element) -> bool {
    BLOCK_TAGS.contains(&element.name())
}

fn is_verse_label(element: &Element) -> bool {
    element
        .classes()
        .any(|class| class.to_ascii_lowercase().contains(VERSE_LABEL_CLASS_HINT))
}

/// Text of `root` with one line per block, noise subtrees removed.
///
/// The root itself is never treated as noise, so locating a `<main>` that
/// carries a `nav` class still yields its text. Lines are trimmed, inner
/// whitespace collapsed and empty lines dropped.
pub fn extract_text(root: ElementRef) -> String {
    extract_text_skipping(root, &HashSet::new())
}

/// Like [`extract_text`], also dropping the subtrees rooted at `skip`.
pub fn extract_text_skipping(root: ElementRef, skip: &HashSet<NodeId>) -> String {
    let mut raw = String::new();
    let mut skipping: Option<NodeId> = None;

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                match node.value() {
                    Node::Text(t) => raw.push_str(&**t),
                    Node::Element(el) => {
                        let dropped = skip.contains(&node.id()) || is_noise(el);
                        if node.id() != root.id() && dropped {
                            skipping = Some(node.id());
                            continue;
                        }
                        if el.name() == "br" || is_block(el) {
                            raw.push('\n');
                        } else if is_verse_label(el) {
                            raw.push(' ');
                        }
                    }
                    _ => {}
                }
            }
            Edge::Close(node) => {
                if let Some(id) = skipping {
                    if id == node.id() {
                        skipping = None;
                    }
                    continue;
                }
                if let Node::Element(el) = node.value() {
                    if is_block(el) {
                        raw.push('\n');
                    } else if is_verse_label(el) {
                        raw.push(' ');
                    }
                }
            }
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// All text nodes of `element`, each trimmed, concatenated without separators.
///
/// Used to measure how much content an element holds.
pub fn stripped_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

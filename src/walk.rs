//! Layout tree walker.
//!
//! DESIGN
//! ======
//! `walk` consumes a tree and returns a structurally identical tree with the
//! transform applied to every reachable component:
//!
//! 1. Component: transform first, then walk `children`, then every slot path
//!    declared on the (possibly transformed) component's kind.
//! 2. Sequence: walk each element, keep order and sequence kind.
//! 3. Mapping: returned as-is. Mappings are only entered through slot paths.
//! 4. Leaf: returned as-is.
//!
//! Slot paths are interpreted by a small recursive descent over the parsed
//! segments. A missing property or an unexpected value shape at any segment
//! stops that path silently.
//!
//! KNOWN GAP
//! =========
//! A mapping shaped like a serialized component (`type` + `namespace` +
//! `props`) is recognized but passed through untouched: it carries no live
//! kind, so its slots and identifier are not rewritten.
//!
//! The walker holds no state of its own. Independent trees can be walked in
//! parallel.

use std::mem;
use std::sync::Arc;

use tracing::warn;

use crate::path::Segment;
use crate::tree::{Component, Node, Props, Sequence};

/// Walk `tree`, applying `transform` to every component.
pub fn walk<F>(tree: Node, transform: &mut F) -> Node
where
    F: FnMut(Component) -> Component,
{
    match tree {
        Node::Component(component) => Node::Component(walk_component(component, transform)),
        Node::Sequence(Sequence { kind, items }) => Node::Sequence(Sequence {
            kind,
            items: items.into_iter().map(|item| walk(item, transform)).collect(),
        }),
        Node::Mapping(_) if tree.is_serialized_component() => {
            warn!("serialized component mapping passed through without transformation");
            tree
        }
        Node::Mapping(_) | Node::Leaf(_) => tree,
    }
}

fn walk_component<F>(component: Component, transform: &mut F) -> Component
where
    F: FnMut(Component) -> Component,
{
    let mut transformed = transform(component);

    if let Some(children) = transformed.children.take() {
        transformed.children = Some(Box::new(walk(*children, transform)));
    }

    let kind = Arc::clone(transformed.shared_kind());
    for path in kind.slots() {
        walk_slot(&mut transformed.props, path.segments(), transform);
    }

    transformed
}

/// Walk the sub-trees reachable from `props` along `segments`.
fn walk_slot<F>(props: &mut Props, segments: &[Segment], transform: &mut F)
where
    F: FnMut(Component) -> Component,
{
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let Some(value) = props.get_mut(&segment.name) else {
        return;
    };

    if rest.is_empty() {
        // Final segment: the property holds the sub-tree itself.
        let walkable = match value {
            Node::Sequence(_) => segment.array,
            Node::Component(_) => true,
            Node::Mapping(_) | Node::Leaf(_) => false,
        };
        if walkable {
            let taken = mem::take(value);
            *value = walk(taken, transform);
        }
        return;
    }

    match value {
        Node::Sequence(seq) if segment.array => {
            for item in &mut seq.items {
                if let Node::Mapping(nested) = item {
                    walk_slot(nested, rest, transform);
                }
            }
        }
        Node::Mapping(nested) => walk_slot(nested, rest, transform),
        _ => {}
    }
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;

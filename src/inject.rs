//! Identifier injection for multi-instance layouts.
//!
//! When a layout may be opened in several tabs at once, every identifier in
//! the resolved tree is rewritten into pattern-matching form scoped to the
//! tab instance:
//!
//! | Before                     | After                                  |
//! |----------------------------|----------------------------------------|
//! | no identifier              | unchanged                              |
//! | `"graph"`                  | `{"type": "graph", "index": <tab>}`    |
//! | `{"type": "x"}`            | `{"type": "x", "index": <tab>}`        |
//! | `{"type": "x", "index": 7}`| unchanged (explicit index is kept)     |

use serde_json::{Map, Value};
use tracing::debug;

use crate::tree::{Component, Identifier, Node};
use crate::walk::walk;

/// Field holding the author's grouping name in a pattern identifier.
pub const TYPE_KEY: &str = "type";

/// Field holding the instance index in a pattern identifier.
pub const INDEX_KEY: &str = "index";

/// Per-instance transform that scopes identifiers to one tab.
#[derive(Debug, Clone)]
pub struct IdInjector {
    instance_id: String,
}

impl IdInjector {
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self { instance_id: instance_id.into() }
    }

    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Rewrite the identifier of one component.
    #[must_use]
    pub fn apply(&self, mut component: Component) -> Component {
        component.id = component.id.take().map(|id| self.scope(id));
        component
    }

    fn scope(&self, id: Identifier) -> Identifier {
        match id {
            Identifier::Name(name) => {
                let mut fields = Map::new();
                fields.insert(TYPE_KEY.to_owned(), Value::String(name));
                fields.insert(INDEX_KEY.to_owned(), Value::String(self.instance_id.clone()));
                Identifier::Pattern(fields)
            }
            Identifier::Pattern(fields) if fields.contains_key(INDEX_KEY) => Identifier::Pattern(fields),
            Identifier::Pattern(mut fields) => {
                fields.insert(INDEX_KEY.to_owned(), Value::String(self.instance_id.clone()));
                Identifier::Pattern(fields)
            }
        }
    }
}

/// Build the per-instance transform for use with [`walk`].
pub fn make_injector(instance_id: impl Into<String>) -> impl FnMut(Component) -> Component {
    let injector = IdInjector::new(instance_id);
    move |component| injector.apply(component)
}

/// Scope every identifier in `tree` to `instance_id`.
pub fn inject(tree: Node, instance_id: &str) -> Node {
    debug!(instance_id, "injecting instance id into layout");
    walk(tree, &mut make_injector(instance_id))
}

#[cfg(test)]
#[path = "inject_test.rs"]
mod tests;

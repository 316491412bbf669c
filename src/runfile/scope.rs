//! Variable Scopes
//!
//! Scopes live in an arena and point only at their parent, so lookups climb
//! upward and no scope ever holds a reference to its children.

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved global attribute naming the default shell.
pub const SHELL_ATTR: &str = ".SHELL";

/// Handle to a scope inside a [`Scopes`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A name→value attribute map with an optional enclosing scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub attrs: IndexMap<String, String>,
    #[serde(skip)]
    pub parent: Option<ScopeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Scopes {
    arena: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty scope.
    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.arena.push(Scope {
            attrs: IndexMap::new(),
            parent,
        });
        ScopeId(self.arena.len() - 1)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id.0]
    }

    /// Bind `name` in exactly this scope, overwriting any earlier binding.
    pub(crate) fn set(&mut self, id: ScopeId, name: impl Into<String>, value: impl Into<String>) {
        self.arena[id.0].attrs.insert(name.into(), value.into());
    }

    /// Find `name` in `id` or the nearest enclosing scope that binds it.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.get(scope_id);
            if let Some(value) = scope.attrs.get(name) {
                return Some(value.as_str());
            }
            current = scope.parent;
        }
        None
    }

    /// All bindings visible from `id`, narrower scopes taking precedence.
    pub fn flatten(&self, id: ScopeId) -> IndexMap<String, String> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(scope_id) = current {
            chain.push(scope_id);
            current = self.get(scope_id).parent;
        }
        let mut merged = IndexMap::new();
        for scope_id in chain.into_iter().rev() {
            for (name, value) in &self.get(scope_id).attrs {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }
}

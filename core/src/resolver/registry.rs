#![deny(missing_docs)]

//! # Relative Resolver Registry
//!
//! Maps external document URIs to whatever answers references into them:
//! either a node resolved ahead of time, or a [`Resolver`] scoped to the other
//! document. The registry is fixed once built. No network access is performed.

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::Resolver;
use crate::swagger::NodeRef;
use indexmap::IndexMap;

/// What a registered URI resolves through.
#[derive(Debug, Clone)]
pub enum RelativeResolver<'a> {
    /// A terminal node returned as-is for any pointer into the URI.
    Resolved(NodeRef<'a>),
    /// A resolver for the external document; pointers are looked up there.
    Resolver(Resolver<'a>),
}

/// Immutable URI -> [`RelativeResolver`] mapping.
#[derive(Debug, Clone, Default)]
pub struct RelativeResolverRegistry<'a> {
    entries: IndexMap<String, RelativeResolver<'a>>,
}

impl<'a> RelativeResolverRegistry<'a> {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder<'a> {
        RegistryBuilder::default()
    }

    /// Returns the entry registered for `uri`.
    pub fn get(&self, uri: &str) -> Option<&RelativeResolver<'a>> {
        self.entries.get(uri)
    }

    /// Registered URIs, in registration order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered URIs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no URI is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations and validates them in [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder<'a> {
    pending: Vec<(String, RelativeResolver<'a>)>,
}

impl<'a> RegistryBuilder<'a> {
    /// Registers a node already resolved for `uri`.
    pub fn with_node(mut self, uri: impl Into<String>, node: impl Into<NodeRef<'a>>) -> Self {
        self.pending
            .push((uri.into(), RelativeResolver::Resolved(node.into())));
        self
    }

    /// Registers a resolver for the document at `uri`.
    pub fn with_resolver(mut self, uri: impl Into<String>, resolver: Resolver<'a>) -> Self {
        self.pending
            .push((uri.into(), RelativeResolver::Resolver(resolver)));
        self
    }

    /// Validates the registrations.
    ///
    /// Fails with [`ResolveError::InvalidResolverRegistration`] when a URI is
    /// empty or registered twice, or when a pre-resolved node still carries a `$ref`.
    pub fn build(self) -> ResolveResult<RelativeResolverRegistry<'a>> {
        let mut entries = IndexMap::with_capacity(self.pending.len());
        for (uri, entry) in self.pending {
            if uri.is_empty() || entries.contains_key(&uri) {
                return Err(ResolveError::InvalidResolverRegistration(uri));
            }
            if let RelativeResolver::Resolved(node) = &entry {
                if node.is_reference() {
                    return Err(ResolveError::InvalidResolverRegistration(uri));
                }
            }
            entries.insert(uri, entry);
        }
        Ok(RelativeResolverRegistry { entries })
    }
}

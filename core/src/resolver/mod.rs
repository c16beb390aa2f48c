#![deny(missing_docs)]

//! # Resolver Module
//!
//! Resolves `$ref` chains to terminal nodes and binds raw data against the
//! resolved schemas.
//!
//! Handles:
//! - Local references, looked up in this resolver's document.
//! - External references, delegated through the [`RelativeResolverRegistry`].
//! - Property lookup across declared properties, `allOf` and `additionalProperties`.
//! - Response schema selection with `default` fallback.
//! - Recursive binding of JSON data into [`Bound`] values.
//!
//! A [`Resolver`] never mutates its inputs and caches nothing, so one instance
//! can be shared freely between callers.

pub mod binder;
pub mod properties;
pub mod registry;
pub mod responses;

pub use binder::{Bound, BoundContainer};
pub use registry::{RegistryBuilder, RelativeResolver, RelativeResolverRegistry};

use crate::error::{ResolveError, ResolveResult};
use crate::swagger::{Document, NodeRef, Operation, Pointer};
use tracing::{instrument, trace};

/// Default bound on reference-chain length and binding depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tuning knobs fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Deepest reference chain / data nesting followed before failing with
    /// [`ResolveError::RecursionLimitExceeded`].
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Resolves references and binds data against one document.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    document: &'a Document,
    registry: RelativeResolverRegistry<'a>,
    options: ResolverOptions,
}

impl<'a> Resolver<'a> {
    /// A resolver for `document` with no external documents.
    pub fn new(document: &'a Document) -> Self {
        Self::with_registry(document, RelativeResolverRegistry::default())
    }

    /// A resolver for `document` that delegates external references to `registry`.
    pub fn with_registry(document: &'a Document, registry: RelativeResolverRegistry<'a>) -> Self {
        Self {
            document,
            registry,
            options: ResolverOptions::default(),
        }
    }

    /// Replaces the default options.
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// The document this resolver looks pointers up in.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// The registry consulted for external references.
    pub fn registry(&self) -> &RelativeResolverRegistry<'a> {
        &self.registry
    }

    /// The options in effect.
    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Follows `node`'s reference chain to a terminal node.
    ///
    /// Nodes without a `$ref` are returned unchanged.
    #[instrument(level = "debug", skip_all)]
    pub fn resolve(&self, node: impl Into<NodeRef<'a>>) -> ResolveResult<NodeRef<'a>> {
        self.resolve_at(node.into(), 0).map(|(_, resolved)| resolved)
    }

    /// Resolves `node` and also returns the resolver owning the terminal node's
    /// document. Local references nested in that node are looked up there.
    pub(crate) fn resolve_at<'r>(
        &'r self,
        node: NodeRef<'a>,
        depth: usize,
    ) -> ResolveResult<(&'r Resolver<'a>, NodeRef<'a>)> {
        let Some(reference) = node.reference() else {
            return Ok((self, node));
        };
        self.guard(depth)?;
        trace!(reference = %reference, depth, "resolving reference");

        let Some(uri) = reference.uri() else {
            let target = self.find_type_at_pointer(reference.pointer())?;
            return self.resolve_at(target, depth + 1);
        };

        match self.registry.get(uri) {
            None => Err(ResolveError::RelativeResolverUnavailable(uri.to_string())),
            Some(RelativeResolver::Resolved(resolved)) => Ok((self, *resolved)),
            Some(RelativeResolver::Resolver(relative)) => {
                trace!(uri, "delegating to relative resolver");
                let target = relative.find_type_at_pointer(reference.pointer())?;
                relative.resolve_at(target, depth + 1)
            }
        }
    }

    /// Maps `/{section}/{key}` to the node stored under `key` in that section.
    ///
    /// Segments past the second are not interpreted.
    pub fn find_type_at_pointer(&self, pointer: &Pointer) -> ResolveResult<NodeRef<'a>> {
        let section = pointer.segment(0)?;
        let doc = self.document;
        match section {
            "paths" => Ok(doc.path(pointer.segment(1)?)?.into()),
            "definitions" => Ok(doc.definition(pointer.segment(1)?)?.into()),
            "parameters" => Ok(doc.parameter(pointer.segment(1)?)?.into()),
            "responses" => Ok(doc.response(pointer.segment(1)?)?.into()),
            "securityDefinitions" => Ok(doc.security_definition(pointer.segment(1)?)?.into()),
            other => Err(ResolveError::UnsupportedPointerSegment(other.to_string())),
        }
    }

    /// Finds the operation for `method` on the path template `path`,
    /// following a `$ref`-ed path item.
    pub fn find_operation(&self, path: &str, method: &str) -> ResolveResult<&'a Operation> {
        match self.resolve(self.document.path(path)?)? {
            NodeRef::PathItem(item) => item.operation(method),
            _ => Err(ResolveError::MissingDocumentProperty(path.to_string())),
        }
    }

    fn guard(&self, depth: usize) -> ResolveResult<()> {
        if depth > self.options.max_depth {
            return Err(ResolveError::RecursionLimitExceeded(self.options.max_depth));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{Reference, Schema};

    const DOC: &str = r##"
swagger: "2.0"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        200: { description: ok }
  /animals:
    $ref: '#/paths/~1pets'
definitions:
  Pet:
    type: object
    properties:
      name: { type: string }
  Alias: { $ref: '#/definitions/Pet' }
  Loop: { $ref: '#/definitions/Loop' }
  Remote: { $ref: 'common.yaml#/definitions/Error' }
  Missing: { $ref: '#/definitions/Nowhere' }
parameters:
  limit: { name: limit, in: query, type: integer }
  limitAlias: { $ref: '#/parameters/limit' }
responses:
  NotFound: { description: not found }
securityDefinitions:
  key: { type: apiKey, name: X-Key, in: header }
"##;

    const COMMON: &str = r##"
definitions:
  Error:
    type: object
    properties:
      code: { type: integer }
  Wrapped: { $ref: '#/definitions/Error' }
"##;

    fn doc(yaml: &str) -> Document {
        Document::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_resolve_non_reference_is_identity() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);
        let pet = d.definition("Pet").unwrap();
        assert_eq!(resolver.resolve(pet).unwrap(), NodeRef::Schema(pet));

        let scheme = d.security_definition("key").unwrap();
        assert_eq!(resolver.resolve(scheme).unwrap(), NodeRef::SecurityScheme(scheme));
    }

    #[test]
    fn test_resolve_local_chain() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);
        let alias = d.definition("Alias").unwrap();
        let resolved = resolver.resolve(alias).unwrap();
        assert_eq!(resolved, NodeRef::Schema(d.definition("Pet").unwrap()));
        assert!(!resolved.is_reference());

        let param = resolver.resolve(d.parameter("limitAlias").unwrap()).unwrap();
        assert_eq!(param.type_tag(), Some("integer"));
    }

    #[test]
    fn test_find_type_at_pointer_sections() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);

        let node = resolver
            .find_type_at_pointer(&Pointer::new(["responses", "NotFound"]))
            .unwrap();
        assert!(matches!(node, NodeRef::Response(_)));

        let node = resolver
            .find_type_at_pointer(&Pointer::new(["paths", "/pets"]))
            .unwrap();
        assert!(matches!(node, NodeRef::PathItem(_)));

        let node = resolver
            .find_type_at_pointer(&Pointer::new(["securityDefinitions", "key"]))
            .unwrap();
        assert!(matches!(node, NodeRef::SecurityScheme(_)));
    }

    #[test]
    fn test_find_type_at_pointer_errors() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);

        let err = resolver
            .find_type_at_pointer(&Pointer::new(["components", "schemas"]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedPointerSegment(s) if s == "components"));

        let err = resolver
            .find_type_at_pointer(&Pointer::new(["definitions", "Nowhere"]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingDocumentProperty(s) if s == "Nowhere"));

        let err = resolver
            .find_type_at_pointer(&Pointer::new(["definitions"]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::PointerOutOfRange { index: 1, .. }));

        let err = resolver.resolve(d.definition("Missing").unwrap()).unwrap_err();
        assert!(matches!(err, ResolveError::MissingDocumentProperty(s) if s == "Nowhere"));
    }

    #[test]
    fn test_external_reference_without_registry() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);
        let err = resolver.resolve(d.definition("Remote").unwrap()).unwrap_err();
        assert!(matches!(err, ResolveError::RelativeResolverUnavailable(u) if u == "common.yaml"));
    }

    #[test]
    fn test_external_reference_delegates_to_relative_resolver() {
        let d = doc(DOC);
        let common = doc(COMMON);
        let wrapped = Schema::from_reference(Reference::parse("common.yaml#/definitions/Wrapped"));
        let registry = RelativeResolverRegistry::builder()
            .with_resolver("common.yaml", Resolver::new(&common))
            .build()
            .unwrap();
        let resolver = Resolver::with_registry(&d, registry);

        let resolved = resolver.resolve(d.definition("Remote").unwrap()).unwrap();
        assert_eq!(resolved, NodeRef::Schema(common.definition("Error").unwrap()));

        // The relative document's own local chain is followed in that document.
        let resolved = resolver.resolve(&wrapped).unwrap();
        assert_eq!(resolved, NodeRef::Schema(common.definition("Error").unwrap()));
    }

    #[test]
    fn test_resolution_reports_owning_resolver() {
        let d = doc(DOC);
        let common = doc(COMMON);
        let registry = RelativeResolverRegistry::builder()
            .with_resolver("common.yaml", Resolver::new(&common))
            .build()
            .unwrap();
        let resolver = Resolver::with_registry(&d, registry);

        let (owner, _) = resolver
            .resolve_at(d.definition("Alias").unwrap().into(), 0)
            .unwrap();
        assert!(std::ptr::eq(owner.document(), &d));

        let (owner, node) = resolver
            .resolve_at(d.definition("Remote").unwrap().into(), 0)
            .unwrap();
        assert!(std::ptr::eq(owner.document(), &common));
        assert_eq!(node, NodeRef::Schema(common.definition("Error").unwrap()));
    }

    #[test]
    fn test_accessors() {
        let d = doc(DOC);
        let common = doc(COMMON);
        let registry = RelativeResolverRegistry::builder()
            .with_resolver("common.yaml", Resolver::new(&common))
            .build()
            .unwrap();
        let options = ResolverOptions { max_depth: 32 };
        let resolver = Resolver::with_registry(&d, registry).with_options(options);

        assert!(std::ptr::eq(resolver.document(), &d));
        assert_eq!(resolver.registry().uris().collect::<Vec<_>>(), ["common.yaml"]);
        assert_eq!(resolver.options(), options);
        assert_eq!(Resolver::new(&d).options().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_external_reference_to_resolved_node() {
        let d = doc(DOC);
        let error = Schema::typed("string");
        let registry = RelativeResolverRegistry::builder()
            .with_node("common.yaml", &error)
            .build()
            .unwrap();
        let resolver = Resolver::with_registry(&d, registry);

        let resolved = resolver.resolve(d.definition("Remote").unwrap()).unwrap();
        assert_eq!(resolved, NodeRef::Schema(&error));
    }

    #[test]
    fn test_cyclic_reference_hits_recursion_limit() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d).with_options(ResolverOptions { max_depth: 8 });
        let err = resolver.resolve(d.definition("Loop").unwrap()).unwrap_err();
        assert!(matches!(err, ResolveError::RecursionLimitExceeded(8)));
    }

    #[test]
    fn test_find_operation_through_path_reference() {
        let d = doc(DOC);
        let resolver = Resolver::new(&d);
        let op = resolver.find_operation("/animals", "get").unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("listPets"));

        let err = resolver.find_operation("/pets", "delete").unwrap_err();
        assert!(matches!(err, ResolveError::MissingDocumentProperty(m) if m == "delete"));
    }
}

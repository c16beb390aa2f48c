#![deny(missing_docs)]

//! # Property Resolution
//!
//! Finds the schema governing one property of an object schema.
//!
//! Order:
//! 1. Declared `properties`.
//! 2. `allOf` members, all of them, in declaration order. When several members
//!    define the property, the last one wins.
//! 3. The `additionalProperties` schema, searched the same way.

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::Resolver;
use crate::swagger::{NodeRef, Schema};
use tracing::trace;

impl<'a> Resolver<'a> {
    /// Returns the sub-schema that applies to `property` on `schema`.
    ///
    /// Fails with [`ResolveError::MissingDocumentProperty`] when no strategy
    /// yields one.
    pub fn find_schema_for_property(
        &self,
        schema: &'a Schema,
        property: &str,
    ) -> ResolveResult<&'a Schema> {
        let found = match self.resolve_at(schema.into(), 0)? {
            (owner, NodeRef::Schema(resolved)) => owner.property_at(resolved, property, 0)?,
            _ => None,
        };
        found
            .map(|(_, schema)| schema)
            .ok_or_else(|| ResolveError::MissingDocumentProperty(property.to_string()))
    }

    /// `Ok(None)` means "not defined here"; errors are real resolution failures.
    ///
    /// `schema` must belong to this resolver's document. The returned resolver
    /// owns the document the found sub-schema was declared in.
    pub(crate) fn property_at<'r>(
        &'r self,
        schema: &'a Schema,
        property: &str,
        depth: usize,
    ) -> ResolveResult<Option<(&'r Resolver<'a>, &'a Schema)>> {
        self.guard(depth)?;

        if let Some(declared) = schema.properties.get(property) {
            return Ok(Some((self, declared)));
        }

        let mut composed = None;
        for member in &schema.all_of {
            if let (owner, NodeRef::Schema(member)) = self.resolve_at(member.into(), depth + 1)? {
                if let Some(found) = owner.property_at(member, property, depth + 1)? {
                    composed = Some(found);
                }
            }
        }
        if composed.is_some() {
            trace!(property, "property found in allOf");
            return Ok(composed);
        }

        if let Some(wildcard) = schema.wildcard() {
            if let (owner, NodeRef::Schema(wildcard)) =
                self.resolve_at(wildcard.into(), depth + 1)?
            {
                trace!(property, "falling back to additionalProperties");
                return owner.property_at(wildcard, property, depth + 1);
            }
        }

        Ok(None)
    }
}

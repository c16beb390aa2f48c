#![deny(missing_docs)]

//! # Node Capabilities
//!
//! The resolver never switches on concrete node types. It asks a node two
//! questions instead: does it carry a `$ref` ([`Referential`]), and what is its
//! type tag ([`Typed`])? [`NodeRef`] is the borrowed handle passed between the
//! resolver and binder.

use crate::error::{ResolveError, ResolveResult};
use crate::swagger::document::{Parameter, PathItem, Response, Schema, SecurityScheme};
use crate::swagger::pointer::Reference;

/// A node that may stand in for another via `$ref`.
pub trait Referential {
    /// The reference carried by this node, if any.
    fn reference(&self) -> Option<&Reference>;
}

/// A node exposing a type tag.
pub trait Typed {
    /// The type tag (`object`, `array`, ...). `None` means untyped.
    fn type_tag(&self) -> Option<&str>;

    /// The item type of an array node.
    fn items(&self) -> ResolveResult<&Schema> {
        Err(ResolveError::MissingDocumentProperty("items".into()))
    }
}

impl Referential for Schema {
    fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

impl Typed for Schema {
    fn type_tag(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }

    fn items(&self) -> ResolveResult<&Schema> {
        self.items
            .as_deref()
            .ok_or_else(|| ResolveError::MissingDocumentProperty("items".into()))
    }
}

impl Referential for Parameter {
    fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

impl Typed for Parameter {
    fn type_tag(&self) -> Option<&str> {
        self.param_type.as_deref()
    }

    fn items(&self) -> ResolveResult<&Schema> {
        self.items
            .as_deref()
            .ok_or_else(|| ResolveError::MissingDocumentProperty("items".into()))
    }
}

impl Referential for Response {
    fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

impl Referential for PathItem {
    fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }
}

impl Typed for SecurityScheme {
    fn type_tag(&self) -> Option<&str> {
        self.scheme_type.as_deref()
    }
}

/// A borrowed handle to any node reachable from a document section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    /// `#/definitions/*`, or any inline schema.
    Schema(&'a Schema),
    /// `#/parameters/*`.
    Parameter(&'a Parameter),
    /// `#/responses/*`.
    Response(&'a Response),
    /// `#/paths/*`.
    PathItem(&'a PathItem),
    /// `#/securityDefinitions/*`.
    SecurityScheme(&'a SecurityScheme),
}

impl<'a> NodeRef<'a> {
    /// The object-like schema behind this node, if it is one.
    pub fn as_schema(&self) -> Option<&'a Schema> {
        match *self {
            NodeRef::Schema(schema) if schema.is_object() => Some(schema),
            _ => None,
        }
    }

    /// Like [`Referential::reference`], but tied to the document lifetime.
    pub fn reference(&self) -> Option<&'a Reference> {
        match *self {
            NodeRef::Schema(s) => s.reference(),
            NodeRef::Parameter(p) => p.reference(),
            NodeRef::Response(r) => r.reference(),
            NodeRef::PathItem(p) => p.reference(),
            NodeRef::SecurityScheme(_) => None,
        }
    }

    /// Like [`Typed::type_tag`], but tied to the document lifetime.
    pub fn type_tag(&self) -> Option<&'a str> {
        match *self {
            NodeRef::Schema(s) => s.type_tag(),
            NodeRef::Parameter(p) => p.type_tag(),
            NodeRef::SecurityScheme(s) => s.type_tag(),
            NodeRef::Response(_) | NodeRef::PathItem(_) => None,
        }
    }

    /// Like [`Typed::items`], but tied to the document lifetime.
    pub fn items(&self) -> ResolveResult<&'a Schema> {
        match *self {
            NodeRef::Schema(s) => s.items(),
            NodeRef::Parameter(p) => p.items(),
            _ => Err(ResolveError::MissingDocumentProperty("items".into())),
        }
    }

    /// True when the node still has a `$ref` to follow.
    pub fn is_reference(&self) -> bool {
        self.reference().is_some()
    }
}

impl<'a> From<&'a Schema> for NodeRef<'a> {
    fn from(schema: &'a Schema) -> Self {
        NodeRef::Schema(schema)
    }
}

impl<'a> From<&'a Parameter> for NodeRef<'a> {
    fn from(parameter: &'a Parameter) -> Self {
        NodeRef::Parameter(parameter)
    }
}

impl<'a> From<&'a Response> for NodeRef<'a> {
    fn from(response: &'a Response) -> Self {
        NodeRef::Response(response)
    }
}

impl<'a> From<&'a PathItem> for NodeRef<'a> {
    fn from(item: &'a PathItem) -> Self {
        NodeRef::PathItem(item)
    }
}

impl<'a> From<&'a SecurityScheme> for NodeRef<'a> {
    fn from(scheme: &'a SecurityScheme) -> Self {
        NodeRef::SecurityScheme(scheme)
    }
}

#![deny(missing_docs)]

//! # CDD Bind
//!
//! Resolves `$ref` pointers in Swagger 2.0 documents, across document
//! boundaries, and binds raw JSON data into named containers by walking it
//! alongside the resolved schemas.
//!
//! ```rust,ignore
//! use cdd_bind::{Document, Resolver};
//!
//! let doc = Document::from_yaml_str(yaml)?;
//! let resolver = Resolver::new(&doc);
//! let op = resolver.find_operation("/pets/{id}", "get")?;
//! let pet = resolver.bind_operation_response(op, "200", &body)?;
//! ```

/// Shared error types.
pub mod error;

/// Reference resolution and data binding.
pub mod resolver;

/// Swagger document model, node capabilities and pointers.
pub mod swagger;

pub use error::{ResolveError, ResolveResult};
pub use resolver::{
    Bound, BoundContainer, RegistryBuilder, RelativeResolver, RelativeResolverRegistry, Resolver,
    ResolverOptions, DEFAULT_MAX_DEPTH,
};
pub use swagger::{
    AdditionalProperties, Document, NodeRef, Operation, Parameter, PathItem, Pointer, Reference,
    Referential, Response, Schema, SecurityScheme, Typed,
};

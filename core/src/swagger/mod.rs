#![deny(missing_docs)]

//! # Swagger Module
//!
//! - **document**: Deserialized Swagger 2.0 object model.
//! - **node**: Capability traits and the borrowed [`NodeRef`] handle.
//! - **pointer**: JSON Pointers and `$ref` parsing.

pub mod document;
pub mod node;
pub mod pointer;

pub use document::{
    AdditionalProperties, Document, Header, Operation, Parameter, PathItem, Paths, Response,
    Schema, SecurityScheme,
};
pub use node::{NodeRef, Referential, Typed};
pub use pointer::{Pointer, Reference};

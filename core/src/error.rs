//! # Error Handling
//!
//! Provides the unified `ResolveError` enum raised by reference resolution,
//! pointer lookup, property resolution and data binding.

use derive_more::{Display, From};

/// The Resolver Error Enum.
///
/// Every failure is a distinct kind so callers can match on it.
/// Only the parser wrappers participate in `From` conversions.
#[derive(Debug, Display, From)]
pub enum ResolveError {
    /// A typed accessor on the document/node model found nothing under this name.
    #[display("Missing document property: '{_0}'")]
    MissingDocumentProperty(String),

    /// Data carried a property that no declared, composed or wildcard schema defines.
    #[display("Undefined schema for property '{property}' of '{schema}'")]
    UndefinedPropertySchema {
        /// The offending property key.
        property: String,
        /// Type name of the schema the property was looked up on.
        schema: String,
    },

    /// Neither the exact status code nor the default response yields a schema.
    #[display("Undefined response schema for operation '{operation_id}' and status '{status}'")]
    UndefinedOperationResponseSchema {
        /// Identifier of the owning operation.
        operation_id: String,
        /// Requested status code.
        status: String,
    },

    /// An external reference named a URI with no registered resolver.
    #[display("No relative resolver registered for '{_0}'")]
    RelativeResolverUnavailable(String),

    /// A registry entry was rejected while building the registry.
    #[display("Invalid resolver registration for '{_0}'")]
    InvalidResolverRegistration(String),

    /// The leading pointer segment names no document section.
    #[display("Unsupported pointer segment: '{_0}'")]
    UnsupportedPointerSegment(String),

    /// A pointer segment was requested past the end of the pointer.
    #[display("Pointer '{pointer}' has no segment at index {index}")]
    PointerOutOfRange {
        /// The pointer, rendered as a JSON Pointer.
        pointer: String,
        /// The requested index.
        index: usize,
    },

    /// Reference chain or binding recursion went deeper than the configured limit.
    #[display("Recursion limit of {_0} exceeded")]
    RecursionLimitExceeded(usize),

    /// Wrapper for JSON document parse errors.
    #[from]
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML document parse errors.
    #[from]
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Json(e) => Some(e),
            ResolveError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

/// Helper type alias for Result using ResolveError.
pub type ResolveResult<T> = Result<T, ResolveError>;

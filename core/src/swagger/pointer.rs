#![deny(missing_docs)]

//! # Pointers and References
//!
//! `$ref` strings split into an optional document URI and a JSON Pointer
//! fragment. Only the fragment is interpreted here; the URI is an opaque key
//! into the relative resolver registry.

use crate::error::{ResolveError, ResolveResult};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of decoded segments locating a node within a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// Creates a pointer from already-decoded segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a JSON Pointer fragment such as `/definitions/Pet`.
    ///
    /// A leading `#` is tolerated. The empty fragment is the empty pointer.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let fragment = fragment.strip_prefix('/').unwrap_or(fragment);
        if fragment.is_empty() {
            return Self::default();
        }
        Self {
            segments: fragment.split('/').map(decode_pointer_segment).collect(),
        }
    }

    /// Returns the segment at `index`.
    pub fn segment(&self, index: usize) -> ResolveResult<&str> {
        self.segments
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ResolveError::PointerOutOfRange {
                pointer: self.to_string(),
                index,
            })
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the pointer to the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, used as the name of a referenced definition.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Decodes a JSON Pointer segment taken from a URI fragment.
///
/// Percent-decoding comes first, then `~1` and `~0` are unescaped.
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8_lossy()
        .replace("~1", "/")
        .replace("~0", "~")
}

/// A parsed `$ref`: a pointer, optionally qualified with an external document URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct Reference {
    uri: Option<String>,
    pointer: Pointer,
}

impl Reference {
    /// A reference into the current document.
    pub fn local(pointer: Pointer) -> Self {
        Self { uri: None, pointer }
    }

    /// A reference into the document registered under `uri`.
    pub fn external(uri: impl Into<String>, pointer: Pointer) -> Self {
        Self {
            uri: Some(uri.into()),
            pointer,
        }
    }

    /// Parses a `$ref` string of the form `[uri][#pointer]`.
    pub fn parse(raw: &str) -> Self {
        let (document, fragment) = match raw.split_once('#') {
            Some((document, fragment)) => (document, fragment),
            None => (raw, ""),
        };
        let uri = (!document.is_empty()).then(|| document.to_string());
        Self {
            uri,
            pointer: Pointer::parse(fragment),
        }
    }

    /// The external document URI, if any.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True when the reference targets the current document.
    pub fn is_local(&self) -> bool {
        self.uri.is_none()
    }

    /// The pointer part of the reference.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Name of the referenced node, e.g. `Pet` for `#/definitions/Pet`.
    pub fn target_name(&self) -> &str {
        self.pointer.last().unwrap_or_default()
    }
}

impl From<String> for Reference {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.to_string()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.uri.as_deref().unwrap_or_default(), self.pointer)
    }
}

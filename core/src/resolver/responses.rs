#![deny(missing_docs)]

//! # Response Resolution
//!
//! Selects the response schema of an operation for a status code.

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::{Bound, Resolver};
use crate::swagger::{NodeRef, Operation, Schema};
use serde_json::Value;

impl<'a> Resolver<'a> {
    /// Returns the schema of the response for `status`.
    ///
    /// Falls back to the `default` response when the exact status is not
    /// declared. A `$ref`-ed response is resolved before its schema is read.
    pub fn find_schema_for_operation_response(
        &self,
        operation: &'a Operation,
        status: &str,
    ) -> ResolveResult<&'a Schema> {
        self.response_schema_at(operation, status).map(|(_, schema)| schema)
    }

    /// Binds a response body for `status` against the operation's response schema.
    pub fn bind_operation_response(
        &self,
        operation: &'a Operation,
        status: &str,
        data: &Value,
    ) -> ResolveResult<Bound> {
        let (owner, schema) = self.response_schema_at(operation, status)?;
        owner.bind(schema, data)
    }

    fn response_schema_at<'r>(
        &'r self,
        operation: &'a Operation,
        status: &str,
    ) -> ResolveResult<(&'r Resolver<'a>, &'a Schema)> {
        let undefined = || ResolveError::UndefinedOperationResponseSchema {
            operation_id: operation.operation_id.clone().unwrap_or_default(),
            status: status.to_string(),
        };

        let response = operation
            .responses
            .get(status)
            .or_else(|| operation.default_response())
            .ok_or_else(undefined)?;

        match self.resolve_at(response.into(), 0)? {
            (owner, NodeRef::Response(resolved)) => resolved
                .schema
                .as_ref()
                .map(|schema| (owner, schema))
                .ok_or_else(undefined),
            _ => Err(undefined()),
        }
    }
}

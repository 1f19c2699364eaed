//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape so the generated document can
//! reference them.

use utoipa::ToSchema;

use crate::inbound::http::recipe_dto::{RecipeResponse, SubscriptionResponse};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session is attached to the request.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "no tag selected")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for a page of recipes.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RecipePageSchema {
    /// Total number of recipes matching the filters.
    #[schema(example = 12)]
    count: u64,
    /// Absolute link to the next page.
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<RecipeResponse>,
}

/// OpenAPI schema for a page of followed authors.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct SubscriptionPageSchema {
    #[schema(example = 2)]
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<SubscriptionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"), "schema should name traceId");
        assert!(schema_json.contains("details"), "schema should name details");
    }

    #[test]
    fn page_schema_describes_the_envelope() {
        let schema_json = schema_to_json::<RecipePageSchema>();
        for field in ["count", "next", "previous", "results"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}

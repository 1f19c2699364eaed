//! Shared parsing and validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with `{field, code}` details
//! (plus the rejected `value` where one exists), the same shape the domain
//! uses for draft validation.

use pagination::{PageRequest, PaginationError};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, IngredientId, RecipeId, TagId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidInteger,
    InvalidFlag,
    InvalidPage,
    InvalidLimit,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidFlag => "invalid_flag",
            Self::InvalidPage => "invalid_page",
            Self::InvalidLimit => "invalid_limit",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.as_str()),
        ErrorCode::MissingField,
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        value_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_recipe_id(value: &str) -> Result<RecipeId, Error> {
    parse_uuid(value, FieldName::new("id")).map(RecipeId::from_uuid)
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_i64(value: &str, field: FieldName) -> Result<i64, Error> {
    value.parse::<i64>().map_err(|_| {
        value_error(
            field,
            format!("{} must be an integer", field.as_str()),
            ErrorCode::InvalidInteger,
            value,
        )
    })
}

pub(crate) fn parse_tag_id(value: &str) -> Result<TagId, Error> {
    parse_i64(value, FieldName::new("id")).map(TagId)
}

pub(crate) fn parse_ingredient_id(value: &str) -> Result<IngredientId, Error> {
    parse_i64(value, FieldName::new("id")).map(IngredientId)
}

pub(crate) fn parse_u32(value: &str, field: FieldName) -> Result<u32, Error> {
    value.parse::<u32>().map_err(|_| {
        value_error(
            field,
            format!("{} must be a non-negative integer", field.as_str()),
            ErrorCode::InvalidInteger,
            value,
        )
    })
}

/// Parse a boolean query flag. `1`/`true` and `0`/`false` are accepted.
pub(crate) fn parse_flag(value: &str, field: FieldName) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(value_error(
            field,
            format!("{} must be 0 or 1", field.as_str()),
            ErrorCode::InvalidFlag,
            value,
        )),
    }
}

pub(crate) fn map_pagination_error(error: PaginationError) -> Error {
    match error {
        PaginationError::InvalidPage => {
            field_error(FieldName::new("page"), error.to_string(), ErrorCode::InvalidPage)
        }
        PaginationError::InvalidLimit { .. } => {
            field_error(FieldName::new("limit"), error.to_string(), ErrorCode::InvalidLimit)
        }
    }
}

/// Validate raw `page`/`limit` query values.
pub(crate) fn parse_page_request(
    page: Option<&str>,
    limit: Option<&str>,
) -> Result<PageRequest, Error> {
    let page = page
        .map(|raw| parse_u32(raw, FieldName::new("page")))
        .transpose()?;
    let limit = limit
        .map(|raw| parse_u32(raw, FieldName::new("limit")))
        .transpose()?;
    PageRequest::new(page, limit).map_err(map_pagination_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details()?.get(key)?.as_str()
    }

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("0", false)]
    #[case("FALSE", false)]
    fn flags_accept_numeric_and_word_forms(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(raw, FieldName::new("is_favorited")), Ok(expected));
    }

    #[rstest]
    fn bad_flag_names_the_field() {
        let err = parse_flag("maybe", FieldName::new("is_in_shopping_cart")).expect_err("invalid");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("is_in_shopping_cart"));
        assert_eq!(detail(&err, "code"), Some("invalid_flag"));
        assert_eq!(detail(&err, "value"), Some("maybe"));
    }

    #[rstest]
    #[case(Some("0"), None, "page", "invalid_page")]
    #[case(None, Some("0"), "limit", "invalid_limit")]
    #[case(None, Some("101"), "limit", "invalid_limit")]
    #[case(Some("two"), None, "page", "invalid_integer")]
    fn page_request_errors_name_the_parameter(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = parse_page_request(page, limit).expect_err("invalid paging");
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }

    #[rstest]
    fn page_request_defaults() {
        let request = parse_page_request(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
    }

    #[rstest]
    fn malformed_recipe_id_is_rejected() {
        let err = parse_recipe_id("not-a-uuid").expect_err("invalid uuid");
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }
}

//! Ingredients and tags: read-only reference data referenced by recipes.
//!
//! Both are bulk-imported from CSV files. The parsing helpers here validate
//! each row so the import either applies a whole file or nothing.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum ingredient name length.
pub const INGREDIENT_NAME_MAX: usize = 128;
/// Maximum measurement unit length.
pub const MEASUREMENT_UNIT_MAX: usize = 64;
/// Maximum tag name and slug length.
pub const TAG_FIELD_MAX: usize = 32;

/// Ingredient primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub i64);

/// Tag primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub i64);

impl std::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Ingredient with its measurement unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Primary key.
    pub id: IngredientId,
    /// Unique display name.
    pub name: String,
    /// Unit amounts are expressed in, such as `g` or `pcs`.
    pub measurement_unit: String,
}

/// Recipe tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Primary key.
    pub id: TagId,
    /// Unique display name.
    pub name: String,
    /// Unique URL-safe identifier used by recipe filters.
    pub slug: String,
}

/// Ingredient row awaiting import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    /// Unique display name.
    pub name: String,
    /// Measurement unit.
    pub measurement_unit: String,
}

/// Tag row awaiting import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Unique display name.
    pub name: String,
    /// Unique slug.
    pub slug: String,
}

/// Rejections raised while parsing reference data rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    /// The row does not have exactly two columns.
    #[error("line {line}: expected 2 columns, found {found}")]
    ColumnCount {
        /// 1-based line number.
        line: usize,
        /// Number of columns present.
        found: usize,
    },
    /// A column is blank.
    #[error("line {line}: {field} must not be empty")]
    Empty {
        /// 1-based line number.
        line: usize,
        /// Name of the blank column.
        field: &'static str,
    },
    /// A column exceeds its length limit.
    #[error("line {line}: {field} must be at most {max} characters")]
    TooLong {
        /// 1-based line number.
        line: usize,
        /// Name of the long column.
        field: &'static str,
        /// Allowed length.
        max: usize,
    },
    /// The CSV reader rejected the input.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Reader diagnostic.
        message: String,
    },
    /// A slug contains characters outside `[-a-zA-Z0-9_]`.
    #[error("line {line}: slug may only contain letters, digits, '-' and '_'")]
    InvalidSlug {
        /// 1-based line number.
        line: usize,
    },
}

impl ReferenceDataError {
    /// 1-based line number of the offending row.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::ColumnCount { line, .. }
            | Self::Empty { line, .. }
            | Self::TooLong { line, .. }
            | Self::Malformed { line, .. }
            | Self::InvalidSlug { line } => *line,
        }
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows written.
    pub inserted: usize,
    /// Rows already present with identical values.
    pub skipped: usize,
}

fn record_line(record: &StringRecord) -> usize {
    record
        .position()
        .and_then(|pos| usize::try_from(pos.line()).ok())
        .unwrap_or_default()
}

fn columns(line: usize, record: &StringRecord) -> Result<(String, String), ReferenceDataError> {
    match (record.get(0), record.get(1), record.len()) {
        (Some(first), Some(second), 2) => Ok((first.to_owned(), second.to_owned())),
        (_, _, found) => Err(ReferenceDataError::ColumnCount { line, found }),
    }
}

fn check_field(
    line: usize,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ReferenceDataError> {
    if value.is_empty() {
        return Err(ReferenceDataError::Empty { line, field });
    }
    if value.chars().count() > max {
        return Err(ReferenceDataError::TooLong { line, field, max });
    }
    Ok(())
}

/// Yield non-blank records with their 1-based starting line.
///
/// Quoted fields may contain commas; surrounding whitespace is trimmed.
fn data_records(
    contents: &str,
) -> impl Iterator<Item = Result<(usize, StringRecord), ReferenceDataError>> + '_ {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes())
        .into_records()
        .filter_map(|result| match result {
            Ok(record) if record.iter().all(str::is_empty) => None,
            Ok(record) => Some(Ok((record_line(&record), record))),
            Err(err) => Some(Err(ReferenceDataError::Malformed {
                line: err
                    .position()
                    .and_then(|pos| usize::try_from(pos.line()).ok())
                    .unwrap_or_default(),
                message: err.to_string(),
            })),
        })
}

/// Parse `name,measurement_unit` rows.
///
/// # Errors
/// Returns the first malformed row as a [`ReferenceDataError`].
///
/// # Examples
/// ```
/// use recipe_backend::domain::parse_ingredients_csv;
///
/// let rows = parse_ingredients_csv("flour, g\n\neggs,pcs\n").expect("valid rows");
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].measurement_unit, "g");
/// ```
pub fn parse_ingredients_csv(contents: &str) -> Result<Vec<NewIngredient>, ReferenceDataError> {
    data_records(contents)
        .map(|row| {
            let (line, record) = row?;
            let (name, measurement_unit) = columns(line, &record)?;
            check_field(line, "name", &name, INGREDIENT_NAME_MAX)?;
            check_field(line, "measurement_unit", &measurement_unit, MEASUREMENT_UNIT_MAX)?;
            Ok(NewIngredient {
                name,
                measurement_unit,
            })
        })
        .collect()
}

/// Parse `name,slug` rows.
///
/// # Errors
/// Returns the first malformed row as a [`ReferenceDataError`].
pub fn parse_tags_csv(contents: &str) -> Result<Vec<NewTag>, ReferenceDataError> {
    data_records(contents)
        .map(|row| {
            let (line, record) = row?;
            let (name, slug) = columns(line, &record)?;
            check_field(line, "name", &name, TAG_FIELD_MAX)?;
            check_field(line, "slug", &slug, TAG_FIELD_MAX)?;
            if !slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ReferenceDataError::InvalidSlug { line });
            }
            Ok(NewTag { name, slug })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ingredient_rows_skip_blank_lines_and_trim() {
        let rows = parse_ingredients_csv("  flour ,g\n\n sugar, g \n").expect("valid rows");
        assert_eq!(
            rows,
            vec![
                NewIngredient {
                    name: "flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
                NewIngredient {
                    name: "sugar".to_owned(),
                    measurement_unit: "g".to_owned(),
                },
            ]
        );
    }

    #[rstest]
    #[case("flour", ReferenceDataError::ColumnCount { line: 2, found: 1 })]
    #[case("flour,g,extra", ReferenceDataError::ColumnCount { line: 2, found: 3 })]
    #[case(",g", ReferenceDataError::Empty { line: 2, field: "name" })]
    #[case("flour,", ReferenceDataError::Empty { line: 2, field: "measurement_unit" })]
    fn malformed_ingredient_rows_report_line(
        #[case] second_line: &str,
        #[case] expected: ReferenceDataError,
    ) {
        let contents = format!("eggs,pcs\n{second_line}\n");
        assert_eq!(parse_ingredients_csv(&contents), Err(expected));
    }

    #[rstest]
    fn quoted_fields_keep_commas_and_lose_quotes() {
        let rows =
            parse_ingredients_csv("\"salt, coarse\",g\n\"flour\",g\n").expect("valid rows");
        let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["salt, coarse", "flour"]);
    }

    #[rstest]
    fn quoted_tag_names_are_accepted() {
        let rows = parse_tags_csv("\"Soups, stews\",soups\n").expect("valid rows");
        assert_eq!(rows[0].name, "Soups, stews");
        assert_eq!(rows[0].slug, "soups");
    }

    #[rstest]
    fn long_ingredient_names_are_rejected() {
        let contents = format!("{},g", "x".repeat(INGREDIENT_NAME_MAX + 1));
        assert_eq!(
            parse_ingredients_csv(&contents),
            Err(ReferenceDataError::TooLong {
                line: 1,
                field: "name",
                max: INGREDIENT_NAME_MAX,
            })
        );
    }

    #[rstest]
    #[case("Breakfast,breakfast", true)]
    #[case("Quick meals,quick_meals-2", true)]
    #[case("Lunch,lunch time", false)]
    #[case("Dinner,d!nner", false)]
    fn tag_slugs_are_validated(#[case] row: &str, #[case] accepted: bool) {
        assert_eq!(parse_tags_csv(row).is_ok(), accepted);
    }
}

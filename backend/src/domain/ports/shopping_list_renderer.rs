//! Port turning an aggregated shopping list into a downloadable document.
//!
//! The aggregation has no knowledge of output formats; renderers receive the
//! list together with a [`ShoppingListTemplate`] and return raw bytes.

use crate::domain::ShoppingList;

use super::define_port_error;

define_port_error! {
    /// Errors raised by shopping list renderers.
    pub enum ShoppingListRenderError {
        /// The template references an unknown placeholder.
        Template { message: String } => "invalid shopping list template: {message}",
    }
}

/// Template text. Line templates may use the `{name}`, `{unit}` and
/// `{amount}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListTemplate {
    /// Text emitted before the first line.
    pub header: String,
    /// Template applied to every item.
    pub line: String,
    /// Text emitted when the list is empty.
    pub empty: String,
    /// Text emitted after the last line.
    pub footer: String,
}

impl Default for ShoppingListTemplate {
    fn default() -> Self {
        Self {
            header: "Shopping list".to_owned(),
            line: "{name} ({unit}) - {amount}".to_owned(),
            empty: "Your shopping cart is empty.".to_owned(),
            footer: "Generated by Recipes".to_owned(),
        }
    }
}

/// Rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListDocument {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type of `body`.
    pub content_type: String,
    /// Document contents.
    pub body: Vec<u8>,
}

/// Port for document rendering.
#[cfg_attr(test, mockall::automock)]
pub trait ShoppingListRenderer: Send + Sync {
    /// Render `list` with `template`.
    fn render(
        &self,
        list: &ShoppingList,
        template: &ShoppingListTemplate,
    ) -> Result<ShoppingListDocument, ShoppingListRenderError>;
}

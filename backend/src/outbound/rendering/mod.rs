//! Shopping list document renderers.

mod plain_text;

pub use plain_text::PlainTextShoppingListRenderer;

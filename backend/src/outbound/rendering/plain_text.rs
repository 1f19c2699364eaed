//! UTF-8 plain-text shopping list renderer.
//!
//! The document is the template header, one line per item (or the empty
//! text when the cart produced nothing) and the footer, each terminated by
//! a newline.

use crate::domain::ports::{
    ShoppingListDocument, ShoppingListRenderError, ShoppingListRenderer, ShoppingListTemplate,
};
use crate::domain::{ShoppingList, ShoppingListItem};

/// Download name of rendered documents.
pub const FILE_NAME: &str = "shopping_list.txt";
/// MIME type of rendered documents.
pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Renders shopping lists as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextShoppingListRenderer;

fn fill_line(template: &str, item: &ShoppingListItem) -> Result<String, ShoppingListRenderError> {
    let mut out = String::with_capacity(template.len() + item.name.len());
    let mut rest = template;
    while let Some((literal, after)) = rest.split_once('{') {
        out.push_str(literal);
        let Some((placeholder, tail)) = after.split_once('}') else {
            return Err(ShoppingListRenderError::template(format!(
                "unclosed placeholder in {template:?}"
            )));
        };
        match placeholder {
            "name" => out.push_str(&item.name),
            "unit" => out.push_str(&item.measurement_unit),
            "amount" => out.push_str(&item.total_amount.to_string()),
            other => {
                return Err(ShoppingListRenderError::template(format!(
                    "unknown placeholder {{{other}}}"
                )));
            }
        }
        rest = tail;
    }
    out.push_str(rest);
    Ok(out)
}

impl ShoppingListRenderer for PlainTextShoppingListRenderer {
    fn render(
        &self,
        list: &ShoppingList,
        template: &ShoppingListTemplate,
    ) -> Result<ShoppingListDocument, ShoppingListRenderError> {
        let mut lines = vec![template.header.clone()];
        if list.is_empty() {
            lines.push(template.empty.clone());
        } else {
            for item in list.items() {
                lines.push(fill_line(&template.line, item)?);
            }
        }
        lines.push(template.footer.clone());

        let mut body = lines.join("\n");
        body.push('\n');
        Ok(ShoppingListDocument {
            file_name: FILE_NAME.to_owned(),
            content_type: CONTENT_TYPE.to_owned(),
            body: body.into_bytes(),
        })
    }
}

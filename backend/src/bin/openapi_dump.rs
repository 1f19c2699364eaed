//! Print the OpenAPI document as JSON.

use recipe_backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|err| std::io::Error::other(format!("serialise OpenAPI document: {err}")))?;
    println!("{json}");
    Ok(())
}

//! Raw query-string access supporting repeated keys such as `tags=a&tags=b`,
//! which `web::Query` cannot deserialise into a list.

use actix_web::HttpRequest;
use url::Url;

use crate::domain::Error;

/// Decoded query pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn parse(raw: &str) -> Self {
        Self(
            url::form_urlencoded::parse(raw.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    pub(crate) fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    /// First value for `key`, ignoring empty values.
    pub(crate) fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, value)| name == key && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Every non-empty value for `key`.
    pub(crate) fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(name, value)| name == key && !value.is_empty())
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// The called URL re-rooted on the public origin; pagination links are
/// derived from it.
pub(crate) fn public_request_url(base: &str, req: &HttpRequest) -> Result<Url, Error> {
    let query = req.query_string();
    let raw = if query.is_empty() {
        format!("{base}{}", req.path())
    } else {
        format!("{base}{}?{query}", req.path())
    };
    Url::parse(&raw).map_err(|err| Error::internal(format!("invalid public URL {raw}: {err}")))
}

//! Page URL parameters.

/// Parameters read from the page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    /// Whose drawing to open.
    pub user_id: Option<String>,
    /// Base URL of the persistence server (e.g. "http://localhost:3030").
    pub api: Option<String>,
}

impl UrlParams {
    /// Parse `userId` and `api` from the query string and the hash fragment.
    ///
    /// Values in the query string win over the fragment.
    pub fn parse(search: &str, hash: &str) -> Self {
        let mut params = parse_params(search);
        let fragment = parse_params(hash);
        if params.user_id.is_none() {
            params.user_id = fragment.user_id;
        }
        if params.api.is_none() {
            params.api = fragment.api;
        }
        params
    }
}

/// Parse a single query string or hash.
fn parse_params(s: &str) -> UrlParams {
    // Remove leading ? or #
    let s = s.trim_start_matches(['?', '#']);

    let mut params = UrlParams::default();
    for pair in s.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let Some(value) = decode_value(value) else {
            continue;
        };
        match key {
            "userId" => params.user_id = Some(value),
            "api" => params.api = Some(value.trim_end_matches('/').to_string()),
            _ => {}
        }
    }
    params
}

/// Decode a form-encoded value (`+` is a space). Empty or malformed values are dropped.
fn decode_value(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(value) if !value.is_empty() => Some(value.into_owned()),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Ignoring malformed URL parameter {:?}: {}", raw, e);
            None
        }
    }
}

use crate::domain::order::ORDER_IDS_PARAM;
use reqwest::Url;

/// Extracts the raw `orderIds` value from a provider redirect.
///
/// Accepts an absolute URL, a relative path with a query, or a bare query
/// string. Returns `None` when the parameter is absent.
pub fn order_ids_param(redirect: &str) -> Option<String> {
    let redirect = redirect.trim();
    let query = match Url::parse(redirect) {
        Ok(url) => url.query()?.to_string(),
        Err(_) => {
            let without_fragment = redirect.split('#').next().unwrap_or_default();
            match without_fragment.split_once('?') {
                Some((_, query)) => query.to_string(),
                None => without_fragment.to_string(),
            }
        }
    };
    // Reuse the URL parser for percent-decoding of the bare query.
    let carrier = Url::parse(&format!("http://redirect.invalid/?{query}")).ok()?;
    carrier
        .query_pairs()
        .find(|(key, _)| key == ORDER_IDS_PARAM)
        .map(|(_, value)| value.into_owned())
}

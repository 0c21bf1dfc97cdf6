use glean_common::{ParamError, ParamSet, query_pairs};
use url::form_urlencoded;

/// `base?<form-encoded params>`; spaces become `+`.
///
/// Values follow the same pair rules as the spots query: `null` is dropped
/// and arrays repeat the key.
pub fn make_query(base: &str, params: &ParamSet) -> Result<String, ParamError> {
    let pairs = query_pairs(params)?;
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Ok(format!("{base}?{encoded}"))
}

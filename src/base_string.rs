//! Signature base string construction (RFC 5849 §3.4.1).

use url::Url;

use crate::encode::percent_encode;
use crate::{SignError, SignResult};

/// Base string URI of `url`: lowercase scheme and host, default port
/// dropped, query and fragment removed.
pub fn normalize_base_url(url: &Url) -> SignResult<String> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| SignError::InvalidUrl(url.to_string()))?;
    let scheme = url.scheme().to_ascii_lowercase();
    let port = match (scheme.as_str(), url.port()) {
        ("http", Some(80)) | ("https", Some(443)) => None,
        (_, port) => port,
    };
    let mut base = format!("{}://{}", scheme, host.to_ascii_lowercase());
    if let Some(port) = port {
        base.push(':');
        base.push_str(&port.to_string());
    }
    match url.path() {
        "" => base.push('/'),
        path => base.push_str(path),
    }
    Ok(base)
}

/// Normalized request parameters (RFC 5849 §3.4.1.3.2).
///
/// Names and values are encoded first and then sorted by name, ties broken
/// by value, comparing encoded bytes. `oauth_signature` never takes part.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .filter(|(k, _)| *k != crate::OAUTH_SIGNATURE_KEY)
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build `METHOD&encoded-base-url&encoded-parameters`.
///
/// `params` must already hold every contributing parameter: protocol
/// parameters, query parameters and form body parameters, all unencoded.
pub fn signature_base_string<'a, I>(method: &str, url: &Url, params: I) -> SignResult<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let base_url = normalize_base_url(url)?;
    Ok(format!(
        "{}&{}&{}",
        percent_encode(&method.to_ascii_uppercase()),
        percent_encode(&base_url),
        percent_encode(&normalize_parameters(params))
    ))
}

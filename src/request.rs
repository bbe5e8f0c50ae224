use http::Method;
use url::Url;

use crate::encode::percent_encode;
use crate::{OAuthParameters, SecretsProvider, SignError, SignResult, Signer};
use crate::{OAUTH_CALLBACK_KEY, OAUTH_KEY_PREFIX};

/// A request ready for the transport: target URL including the query, and
/// the `Authorization: OAuth ...` header value carrying the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub authorization: String,
}

pub struct RequestBuilder<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    method: Method,
    url: Url,
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> RequestBuilder<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    /// Start building a request to `endpoint`.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied endpoint cannot be parsed.
    pub fn new(
        method: Method,
        endpoint: &str,
        secrets: &'a TSecretsProvider,
        parameters: OAuthParameters<'a>,
    ) -> SignResult<Self> {
        let url = Url::parse(endpoint).map_err(|_| SignError::InvalidUrl(endpoint.to_string()))?;
        Ok(RequestBuilder {
            method,
            url,
            secrets,
            parameters,
        })
    }

    /// Convenience method to make a `GET` request to a URL.
    pub fn get(
        endpoint: &str,
        secrets: &'a TSecretsProvider,
        parameters: OAuthParameters<'a>,
    ) -> SignResult<Self> {
        Self::new(Method::GET, endpoint, secrets, parameters)
    }

    /// Modify the query string of the URL.
    ///
    /// This method appends and does not overwrite: a key given twice shows
    /// up twice. Pairs named `oauth_*` are protocol parameters and travel in
    /// the `Authorization` header instead of the query; those may appear only
    /// once, and signing fails on a repeat.
    pub fn query<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut encoded = Vec::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == OAUTH_CALLBACK_KEY && self.parameters.get_callback().is_none() {
                self.parameters = self.parameters.callback(value.to_string());
            } else if key.starts_with(OAUTH_KEY_PREFIX) {
                self.parameters = self
                    .parameters
                    .parameter(key.to_string(), value.to_string());
            } else {
                encoded.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }
        if !encoded.is_empty() {
            let query = match self.url.query() {
                None | Some("") => encoded.join("&"),
                Some(existing) => format!("{}&{}", existing, encoded.join("&")),
            };
            self.url.set_query(Some(&query));
        }
        self
    }

    /// Generate an OAuth signature and return the finished request.
    pub fn sign(self) -> SignResult<SignedRequest> {
        let authorization = Signer::new(self.secrets, self.parameters).generate_signature(
            &self.method,
            &self.url,
            &[],
        )?;
        Ok(SignedRequest {
            method: self.method,
            url: self.url,
            authorization,
        })
    }
}

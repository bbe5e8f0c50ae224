use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use http::Method;
use rand::Rng;
use sha1::Sha1;
use url::Url;

use crate::base_string::signature_base_string;
use crate::encode::percent_encode;
use crate::{SecretsProvider, SignError, SignResult};
use crate::{
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_KEY_PREFIX, OAUTH_NONCE_KEY,
    OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY,
    OAUTH_VERIFIER_KEY, OAUTH_VERSION_KEY, REALM_KEY,
};

const OAUTH_VERSION: &str = "1.0";

/// Protocol parameters the signer always produces itself.
const RESERVED_KEYS: &[&str] = &[
    OAUTH_CONSUMER_KEY,
    OAUTH_NONCE_KEY,
    OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY,
    OAUTH_TOKEN_KEY,
    OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMethod {
    #[default]
    HmacSha1,
    Plaintext,
}

impl SignatureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = SignError;

    fn from_str(s: &str) -> SignResult<Self> {
        if s.eq_ignore_ascii_case("HMAC-SHA1") {
            Ok(SignatureMethod::HmacSha1)
        } else if s.eq_ignore_ascii_case("PLAINTEXT") {
            Ok(SignatureMethod::Plaintext)
        } else {
            Err(SignError::UnsupportedMethod(s.to_string()))
        }
    }
}

/// Signing key: `encode(consumer_secret) & encode(token_secret)`.
///
/// The ampersand is present even when there is no token secret yet.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

/// Compute `oauth_signature` over `base_string`, base64 for HMAC-SHA1.
pub fn sign(
    signature_method: SignatureMethod,
    base_string: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> SignResult<String> {
    let key = signing_key(consumer_secret, token_secret);
    match signature_method {
        SignatureMethod::HmacSha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
                .map_err(|_| SignError::InvalidKey)?;
            mac.update(base_string.as_bytes());
            Ok(BASE64.encode(mac.finalize().into_bytes()))
        }
        // RFC 5849 §3.4.4: the key is the signature
        SignatureMethod::Plaintext => Ok(key),
    }
}

/// 16 random bytes as 32 hex characters.
pub fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Seconds since the Unix epoch.
pub fn generate_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// Sign a request and return its `Authorization` header value.
    ///
    /// Query parameters on `url` and the decoded form body in `form` take
    /// part in the signature alongside the protocol parameters.
    pub fn generate_signature(
        self,
        method: &Method,
        url: &Url,
        form: &[(String, String)],
    ) -> SignResult<String> {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();
        let mut oauth_params = self.parameters.protocol_parameters(consumer_key, token)?;

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let contributing = oauth_params
            .iter()
            .chain(query.iter().map(|(k, v)| (k, v)))
            .chain(form.iter().map(|(k, v)| (k, v)))
            .map(|(k, v)| (k.as_str(), v.as_str()));
        let base_string = signature_base_string(method.as_str(), url, contributing)?;
        tracing::trace!(%base_string, "signature base string");

        let signature = sign(
            self.parameters.signature_method,
            &base_string,
            consumer_secret,
            token_secret,
        )?;
        oauth_params.insert(OAUTH_SIGNATURE_KEY.to_string(), signature);

        Ok(authorization_header(
            self.parameters.realm.as_deref(),
            &oauth_params,
        ))
    }
}

/// `OAuth realm="..", key="value", ..` with every name and value encoded.
fn authorization_header(realm: Option<&str>, oauth_params: &BTreeMap<String, String>) -> String {
    let realm = realm.map(|r| (REALM_KEY, r));
    let parts: Vec<String> = realm
        .into_iter()
        .chain(oauth_params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect();
    format!("OAuth {}", parts.join(", "))
}

/// Per-request protocol options. Nonce and timestamp are generated when
/// not set explicitly, so a fresh value set is built on every request.
#[derive(Debug, Clone)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    signature_method: SignatureMethod,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
    extra: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl Default for OAuthParameters<'static> {
    fn default() -> Self {
        OAuthParameters::new()
    }
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        OAuthParameters {
            callback: None,
            nonce: None,
            realm: None,
            signature_method: SignatureMethod::HmacSha1,
            timestamp: None,
            verifier: None,
            version: true,
            extra: Vec::new(),
        }
    }

    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value, sent in the header but never signed
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    pub fn signature_method(self, signature_method: SignatureMethod) -> Self {
        OAuthParameters {
            signature_method,
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set the oauth_version value (boolean)
    ///
    /// # Note
    /// When `true` (the default), oauth_version is sent as "1.0".
    /// Otherwise it is omitted, which RFC 5849 also allows.
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }

    /// Add any other `oauth_*` protocol parameter, e.g. an extension.
    pub fn parameter<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn get_signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub fn get_callback(&self) -> Option<&str> {
        self.callback.as_deref()
    }

    /// Protocol parameters for one request, without `oauth_signature`.
    fn protocol_parameters(
        &self,
        consumer_key: &str,
        token: Option<&str>,
    ) -> SignResult<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        params.insert(OAUTH_CONSUMER_KEY.to_string(), consumer_key.to_string());
        params.insert(
            OAUTH_NONCE_KEY.to_string(),
            self.nonce
                .as_deref()
                .map(str::to_string)
                .unwrap_or_else(generate_nonce),
        );
        params.insert(
            OAUTH_SIGNATURE_METHOD_KEY.to_string(),
            self.signature_method.as_str().to_string(),
        );
        params.insert(
            OAUTH_TIMESTAMP_KEY.to_string(),
            self.timestamp
                .unwrap_or_else(generate_timestamp)
                .to_string(),
        );
        if self.version {
            params.insert(OAUTH_VERSION_KEY.to_string(), OAUTH_VERSION.to_string());
        }
        if let Some(token) = token {
            params.insert(OAUTH_TOKEN_KEY.to_string(), token.to_string());
        }
        if let Some(ref callback) = self.callback {
            params.insert(OAUTH_CALLBACK_KEY.to_string(), callback.to_string());
        }
        if let Some(ref verifier) = self.verifier {
            params.insert(OAUTH_VERIFIER_KEY.to_string(), verifier.to_string());
        }
        for (key, value) in &self.extra {
            if RESERVED_KEYS.contains(&key.as_ref())
                || !key.starts_with(OAUTH_KEY_PREFIX)
                || params.contains_key(key.as_ref())
            {
                return Err(SignError::ReservedParameter(key.to_string()));
            }
            params.insert(key.to_string(), value.to_string());
        }
        Ok(params)
    }
}

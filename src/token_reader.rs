use std::collections::HashMap;

use serde::Deserialize;

use crate::transport::HttpResponse;
use crate::{
    AccessCredential, Rejection, TemporaryCredential, TokenReaderError, TokenReaderResult,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY,
};

/// Represents response of token acquisition.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents, e.g. `oauth_callback_confirmed`
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl From<TokenResponse> for TemporaryCredential {
    fn from(resp: TokenResponse) -> Self {
        TemporaryCredential::new(resp.oauth_token, resp.oauth_token_secret)
    }
}

impl From<TokenResponse> for AccessCredential {
    fn from(resp: TokenResponse) -> Self {
        AccessCredential::new(resp.oauth_token, resp.oauth_token_secret)
    }
}

/// Add parse_oauth_token feature to the transport's response.
// this trait is sealed
pub trait TokenReader: private::Sealed {
    /// Require a 2xx status and a form-encoded body carrying both
    /// `oauth_token` and `oauth_token_secret`.
    fn parse_oauth_token(&self) -> Result<TokenResponse, Rejection>;
}

impl TokenReader for HttpResponse {
    fn parse_oauth_token(&self) -> Result<TokenResponse, Rejection> {
        if !self.is_success() {
            return Err(Rejection::Status {
                status: self.status,
                body: self.body.clone(),
            });
        }
        Ok(read_oauth_token(&self.body)?)
    }
}

pub(crate) fn read_oauth_token(text: &str) -> TokenReaderResult<TokenResponse> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text.trim())
        .map_err(|e| TokenReaderError::Undecodable(e.to_string()))?;
    let mut destructured: HashMap<String, String> = pairs.into_iter().collect();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_KEY,
            text.to_string(),
        )),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}

mod private {
    use crate::transport::HttpResponse;

    pub trait Sealed {}
    impl Sealed for HttpResponse {}
}

use tracing::debug;

use crate::encode::percent_encode;
use crate::request::{RequestBuilder, SignedRequest};
use crate::transport::Transport;
use crate::{
    AccessCredential, ClientCredential, Error, OAuthParameters, Result, Secrets, SignatureMethod,
    Step, TemporaryCredential, TokenReader,
};

/// The three endpoints of an OAuth 1.0a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
}

/// A client bound to one server: endpoints, client credential, signature
/// method and the transport that carries the exchanges.
#[derive(Debug)]
pub struct Client<T> {
    endpoints: Endpoints,
    credential: ClientCredential,
    signature_method: SignatureMethod,
    transport: T,
}

impl<T> Client<T>
where
    T: Transport,
{
    /// Constructs a new `Client` signing with HMAC-SHA1.
    pub fn new(endpoints: Endpoints, credential: ClientCredential, transport: T) -> Self {
        Client {
            endpoints,
            credential,
            signature_method: SignatureMethod::HmacSha1,
            transport,
        }
    }

    pub fn signature_method(self, signature_method: SignatureMethod) -> Self {
        Client {
            signature_method,
            ..self
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fail with the first required input that is empty.
    ///
    /// Endpoints are only checked for presence; a malformed one is left for
    /// signing or the server to reject.
    pub fn ensure_configured(&self) -> Result<()> {
        let required = [
            ("request token URL", &self.endpoints.request_token_url),
            ("authorize URL", &self.endpoints.authorize_url),
            ("access token URL", &self.endpoints.access_token_url),
            ("consumer key", &self.credential.key),
            ("consumer secret", &self.credential.secret),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(Error::MissingConfiguration(*name)),
            None => Ok(()),
        }
    }

    /// Step 1: obtain a temporary credential.
    ///
    /// `params` are merged into the request; see [`RequestBuilder::query`].
    pub fn get_request_token<K, V>(&self, params: &[(K, V)]) -> Result<TemporaryCredential>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let secrets = Secrets::from(&self.credential);
        let request = RequestBuilder::get(
            &self.endpoints.request_token_url,
            &secrets,
            self.parameters(),
        )?
        .query(params)
        .sign()?;
        debug!(url = %request.url, "requesting temporary credential");
        let credential: TemporaryCredential =
            self.exchange(Step::TemporaryCredential, &request)?;
        debug!(oauth_token = %credential.token, "temporary credential received");
        Ok(credential)
    }

    /// Step 2: URL the user visits to authorize the temporary credential.
    pub fn get_authorize_url(&self, temporary: &TemporaryCredential) -> String {
        let separator = if self.endpoints.authorize_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}{}={}",
            self.endpoints.authorize_url,
            separator,
            crate::OAUTH_TOKEN_KEY,
            percent_encode(&temporary.token)
        )
    }

    /// Step 3: trade the temporary credential and verifier for the token
    /// credential. The request is signed with the temporary token secret.
    pub fn get_access_token(
        &self,
        temporary: &TemporaryCredential,
        verifier: &str,
    ) -> Result<AccessCredential> {
        let secrets = Secrets::from(&self.credential)
            .token(temporary.token.as_str(), temporary.secret.as_str());
        let request = RequestBuilder::get(
            &self.endpoints.access_token_url,
            &secrets,
            self.parameters().verifier(verifier),
        )?
        .sign()?;
        debug!(url = %request.url, "requesting access token");
        let credential: AccessCredential = self.exchange(Step::AccessToken, &request)?;
        debug!(oauth_token = %credential.token, "access token received");
        Ok(credential)
    }

    fn parameters<'a>(&self) -> OAuthParameters<'a> {
        OAuthParameters::new().signature_method(self.signature_method)
    }

    fn exchange<C>(&self, step: Step, request: &SignedRequest) -> Result<C>
    where
        C: From<crate::TokenResponse>,
    {
        let response = self
            .transport
            .execute(request)
            .map_err(|source| Error::Network { step, source })?;
        debug!(status = response.status, %step, "response received");
        let token = response
            .parse_oauth_token()
            .map_err(|rejection| Error::rejected(step, rejection))?;
        Ok(token.into())
    }
}

use std::borrow::Cow;
use std::fmt;

/// Client credential: identifies the application to the server.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredential {
    pub key: String,
    pub secret: String,
}

/// Temporary credential (request token) returned by the first exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredential {
    pub token: String,
    pub secret: String,
}

/// Token credential (access token): the output of a complete flow.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential {
    pub token: String,
    pub secret: String,
}

impl ClientCredential {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        ClientCredential {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl TemporaryCredential {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        TemporaryCredential {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl AccessCredential {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        AccessCredential {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

// secrets stay out of Debug output so they never reach the logs
impl fmt::Debug for ClientCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredential")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredential")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Renders the two output lines of a successful run.
impl fmt::Display for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}={}", crate::OAUTH_TOKEN_KEY, self.token)?;
        write!(f, "{}={}", crate::OAUTH_TOKEN_SECRET_KEY, self.secret)
    }
}

pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    fn get_token_option_pair<'a>(&'a self) -> (Option<&'a str>, Option<&'a str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or((None, None))
    }
}

/// Key material for one signed request: the client credential and, after
/// the first exchange, the token credential being used.
#[derive(Debug, Clone)]
pub struct Secrets<'a, T> {
    token: T,
    token_secret: T,
    consumer_key: Cow<'a, str>,
    consumer_secret: Cow<'a, str>,
}

impl<'a> Secrets<'a, ()> {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            token: (),
            token_secret: (),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    pub fn token<TKey, TSecret>(
        self,
        token: TKey,
        token_secret: TSecret,
    ) -> Secrets<'a, Cow<'a, str>>
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            token: token.into(),
            token_secret: token_secret.into(),
            consumer_key: self.consumer_key,
            consumer_secret: self.consumer_secret,
        }
    }
}

impl<'a> From<&'a ClientCredential> for Secrets<'a, ()> {
    fn from(client: &'a ClientCredential) -> Self {
        Secrets::new(client.key.as_str(), client.secret.as_str())
    }
}

impl SecretsProvider for Secrets<'_, ()> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        None
    }
}

impl SecretsProvider for Secrets<'_, Cow<'_, str>> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        Some((&self.token, &self.token_secret))
    }
}

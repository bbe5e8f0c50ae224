use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

/// The two signed exchanges of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    TemporaryCredential,
    AccessToken,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::TemporaryCredential => f.write_str("temporary credential request"),
            Step::AccessToken => f.write_str("access token exchange"),
        }
    }
}

/// Why a server response could not be turned into a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("server answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Malformed(#[from] TokenReaderError),
}

impl Rejection {
    pub fn status(&self) -> Option<u16> {
        match self {
            Rejection::Status { status, .. } => Some(*status),
            Rejection::Malformed(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing configuration : {0} is required")]
    MissingConfiguration(&'static str),
    #[error("temporary credential request rejected : {0}")]
    TemporaryCredentialRejected(Rejection),
    #[error("access token exchange rejected : {0}")]
    AccessTokenRejected(Rejection),
    #[error("{step} failed : {source}")]
    Network {
        step: Step,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot set up the HTTP client : {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("OAuth sign failed : {0}")]
    Signing(#[from] SignError),
    #[error("configuration error : {0}")]
    Config(#[from] ConfigError),
    #[error("verifier must not be empty")]
    EmptyVerifier,
    #[error("flow is in state {actual}, expected {expected}")]
    UnexpectedState {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("I/O error : {0}")]
    Io(#[from] std::io::Error),
}

/// Payload-free mirror of [`Error`], recorded by the flow when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingConfiguration,
    TemporaryCredentialRejected,
    AccessTokenRejected,
    Network,
    HttpClient,
    Signing,
    Config,
    EmptyVerifier,
    UnexpectedState,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            Error::TemporaryCredentialRejected(_) => ErrorKind::TemporaryCredentialRejected,
            Error::AccessTokenRejected(_) => ErrorKind::AccessTokenRejected,
            Error::Network { .. } => ErrorKind::Network,
            Error::HttpClient(_) => ErrorKind::HttpClient,
            Error::Signing(_) => ErrorKind::Signing,
            Error::Config(_) => ErrorKind::Config,
            Error::EmptyVerifier => ErrorKind::EmptyVerifier,
            Error::UnexpectedState { .. } => ErrorKind::UnexpectedState,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn rejected(step: Step, rejection: Rejection) -> Self {
        match step {
            Step::TemporaryCredential => Error::TemporaryCredentialRejected(rejection),
            Step::AccessToken => Error::AccessTokenRejected(rejection),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("endpoint {0} is not an absolute http(s) URL")]
    InvalidUrl(String),
    #[error("{0} cannot be supplied as an oauth protocol parameter")]
    ReservedParameter(String),
    #[error("unsupported signature method : {0}")]
    UnsupportedMethod(String),
    #[error("signing key was rejected by the HMAC implementation")]
    InvalidKey,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("response is not form-urlencoded: {0}")]
    Undecodable(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path} : {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: invalid value for {key}: {value}")]
    InvalidValue {
        path: String,
        line: usize,
        key: String,
        value: String,
    },
    #[error("invalid extra parameters {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_step() {
        let err = Error::rejected(
            Step::TemporaryCredential,
            Rejection::Status {
                status: 401,
                body: "nope".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::TemporaryCredentialRejected);
        assert_eq!(
            err.to_string(),
            "temporary credential request rejected : server answered HTTP 401: nope"
        );

        let err = Error::rejected(
            Step::AccessToken,
            TokenReaderError::TokenKeyNotFound("oauth_token", "x=y".to_string()).into(),
        );
        assert_eq!(err.kind(), ErrorKind::AccessTokenRejected);
        assert!(err.to_string().starts_with("access token exchange rejected"));
    }

    #[test]
    fn client_setup_is_not_a_flow_step() {
        let source = reqwest::blocking::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = Error::HttpClient(source);
        assert_eq!(err.kind(), ErrorKind::HttpClient);
        let message = err.to_string();
        assert!(message.starts_with("cannot set up the HTTP client"));
        assert!(!message.contains(&Step::TemporaryCredential.to_string()));
    }

    #[test]
    fn rejection_status() {
        let by_status = Rejection::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(by_status.status(), Some(500));
        let malformed: Rejection =
            TokenReaderError::Undecodable("%%".to_string()).into();
        assert_eq!(malformed.status(), None);
    }
}

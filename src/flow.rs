//! The three-legged flow as an explicit state machine.
//!
//! ```text
//! Start -> RequestingTemporaryCredential -> AwaitingUserAuthorization
//!       -> ExchangingAccessToken -> Done
//! ```
//!
//! Any error other than a wrong-state call or an empty verifier moves the
//! flow to `Failed`. There are no retries; a failed flow stays failed.

use std::mem;

use tracing::{debug, info};

use crate::transport::Transport;
use crate::{AccessCredential, Client, Error, ErrorKind, Result, TemporaryCredential};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Start,
    RequestingTemporaryCredential,
    AwaitingUserAuthorization {
        temporary: TemporaryCredential,
        authorize_url: String,
    },
    ExchangingAccessToken,
    Done(AccessCredential),
    Failed(ErrorKind),
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Start => "START",
            FlowState::RequestingTemporaryCredential => "REQUESTING_TEMP_CREDENTIAL",
            FlowState::AwaitingUserAuthorization { .. } => "AWAITING_USER_AUTHORIZATION",
            FlowState::ExchangingAccessToken => "EXCHANGING_ACCESS_TOKEN",
            FlowState::Done(_) => "DONE",
            FlowState::Failed(_) => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Done(_) | FlowState::Failed(_))
    }
}

/// Supplies the verifier once the user has visited the authorize URL.
///
/// This is the one point where the flow waits on a human. It blocks for as
/// long as the implementation does; put a deadline in the implementation if
/// one is needed.
pub trait VerifierSource {
    fn verifier(&mut self, authorize_url: &str) -> Result<String>;
}

impl<F> VerifierSource for F
where
    F: FnMut(&str) -> Result<String>,
{
    fn verifier(&mut self, authorize_url: &str) -> Result<String> {
        self(authorize_url)
    }
}

pub struct Flow<T> {
    client: Client<T>,
    state: FlowState,
}

impl<T> Flow<T>
where
    T: Transport,
{
    pub fn new(client: Client<T>) -> Self {
        Flow {
            client,
            state: FlowState::Start,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    /// Run the first leg and return the URL the user has to visit.
    ///
    /// Configuration is checked before anything goes on the wire.
    pub fn request_authorization<K, V>(&mut self, params: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.expect_state(matches!(self.state, FlowState::Start), "START")?;
        if let Err(err) = self.client.ensure_configured() {
            return Err(self.fail(err));
        }

        self.state = FlowState::RequestingTemporaryCredential;
        info!("requesting temporary credential");
        let temporary = match self.client.get_request_token(params) {
            Ok(temporary) => temporary,
            Err(err) => return Err(self.fail(err)),
        };

        let authorize_url = self.client.get_authorize_url(&temporary);
        debug!(%authorize_url, "awaiting user authorization");
        self.state = FlowState::AwaitingUserAuthorization {
            temporary,
            authorize_url: authorize_url.clone(),
        };
        Ok(authorize_url)
    }

    /// Run the last leg with the verifier the user obtained.
    ///
    /// An empty verifier is refused and the flow keeps waiting.
    pub fn exchange_verifier(&mut self, verifier: &str) -> Result<AccessCredential> {
        self.expect_state(
            matches!(self.state, FlowState::AwaitingUserAuthorization { .. }),
            "AWAITING_USER_AUTHORIZATION",
        )?;
        let verifier = verifier.trim();
        if verifier.is_empty() {
            return Err(Error::EmptyVerifier);
        }

        let temporary = match mem::replace(&mut self.state, FlowState::ExchangingAccessToken) {
            FlowState::AwaitingUserAuthorization { temporary, .. } => temporary,
            // checked above
            other => {
                let actual = other.name();
                self.state = other;
                return Err(Error::UnexpectedState {
                    expected: "AWAITING_USER_AUTHORIZATION",
                    actual,
                });
            }
        };
        info!("exchanging verifier for access token");
        match self.client.get_access_token(&temporary, verifier) {
            Ok(access) => {
                self.state = FlowState::Done(access.clone());
                info!("access token obtained");
                Ok(access)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Drive the whole flow, asking `source` for the verifier in between.
    pub fn run<K, V, S>(&mut self, params: &[(K, V)], source: &mut S) -> Result<AccessCredential>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        S: VerifierSource + ?Sized,
    {
        let authorize_url = self.request_authorization(params)?;
        let verifier = match source.verifier(&authorize_url) {
            Ok(verifier) => verifier,
            Err(err) => return Err(self.fail(err)),
        };
        self.exchange_verifier(&verifier).map_err(|err| {
            if self.state.is_terminal() {
                err
            } else {
                self.fail(err)
            }
        })
    }

    fn expect_state(&self, ok: bool, expected: &'static str) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Error::UnexpectedState {
                expected,
                actual: self.state.name(),
            })
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        debug!(state = self.state.name(), error = %err, "flow failed");
        self.state = FlowState::Failed(err.kind());
        err
    }
}

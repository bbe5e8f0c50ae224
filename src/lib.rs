/*!
oauth1-credential: get an OAuth 1.0a token credential from a server.

# Overview

This crate runs the three-legged OAuth 1.0a flow (RFC 5849) against any
server: it obtains a temporary credential, sends the user to the authorize
endpoint, and exchanges the verifier the user brings back for a token
credential. Requests are signed here, with HMAC-SHA1 or PLAINTEXT, and sent
over a blocking [reqwest](https://crates.io/crates/reqwest) client.

The `oauth1-credential` binary wraps the flow with command-line options, a
key=value configuration file and interactive prompts.

# How to use

## Running the whole flow

```no_run
use std::io;

use oauth1_credential::{Client, ClientCredential, Endpoints, Flow, ReqwestTransport, DEFAULT_TIMEOUT};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let endpoints = Endpoints {
    request_token_url: "https://api.example.com/oauth/request_token".into(),
    authorize_url: "https://api.example.com/oauth/authorize".into(),
    access_token_url: "https://api.example.com/oauth/access_token".into(),
};
let credential = ClientCredential::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");
let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)?;

let mut flow = Flow::new(Client::new(endpoints, credential, transport));
let access = flow.run(
    &[("oauth_callback", "oob")],
    &mut |url: &str| -> oauth1_credential::Result<String> {
        println!("please access to: {}", url);
        let mut pin = String::new();
        io::stdin().read_line(&mut pin)?;
        Ok(pin)
    },
)?;

// oauth_token=...
// oauth_token_secret=...
println!("{}", access);
# Ok(())
# }
```

## Signing a single request

```
use http::Method;
use oauth1_credential::{OAuthParameters, Secrets, Signer};
use url::Url;

let secrets = Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
    .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
let params = OAuthParameters::new().nonce("chapoH").timestamp(137_131_202u64).version(false);
let url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original").unwrap();

let header = Signer::new(&secrets, params)
    .generate_signature(&Method::GET, &url, &[])
    .unwrap();
assert!(header.contains("oauth_signature=\"MdpQcU8iPSUjWoN%2FUDMsK2sui9I%3D\""));
```
*/
mod base_string;
mod client;
mod config;
mod encode;
mod error;
mod flow;
mod request;
mod secrets;
mod signer;
mod token_reader;
mod transport;

#[cfg(feature = "browser")]
mod browser;
#[cfg(test)]
mod test_support;

// exposed to external program
pub use base_string::{normalize_base_url, normalize_parameters, signature_base_string};
pub use client::{Client, Endpoints};
pub use config::{prompt, Config};
pub use encode::{percent_decode, percent_encode};
pub use error::{
    ConfigError, Error, ErrorKind, Rejection, Result, SignError, SignResult, Step,
    TokenReaderError, TokenReaderResult,
};
pub use flow::{Flow, FlowState, VerifierSource};
pub use request::{RequestBuilder, SignedRequest};
pub use secrets::{
    AccessCredential, ClientCredential, Secrets, SecretsProvider, TemporaryCredential,
};
pub use signer::{
    generate_nonce, generate_timestamp, sign, signing_key, OAuthParameters, SignatureMethod,
    Signer,
};
pub use token_reader::{TokenReader, TokenResponse};
pub use transport::{HttpResponse, ReqwestTransport, Transport, DEFAULT_TIMEOUT};

#[cfg(feature = "browser")]
pub use browser::open_browser;

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";

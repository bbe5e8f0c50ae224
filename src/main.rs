//! oauth1-credential CLI.
//!
//! Gets an OAuth 1.0/1.0a token credential from a server, e.g. to test code
//! that uses OAuth 1.0a authentication. On success prints
//!
//! ```text
//! oauth_token=...
//! oauth_token_secret=...
//! ```
//!
//! on stdout; prompts, logs and errors go to stderr.

use std::error::Error as _;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use oauth1_credential::{
    prompt, AccessCredential, Client, Config, Error, Flow, ReqwestTransport, Result,
    SignatureMethod, VerifierSource,
};

/// Get an OAuth 1.0/1.0a token credential from a server.
#[derive(Parser)]
#[command(name = "oauth1-credential", version, about)]
struct Cli {
    /// Temporary credential endpoint.
    #[arg(short = 'r', long)]
    request_token_url: Option<String>,

    /// Authorize endpoint.
    #[arg(short = 'a', long)]
    authorize_url: Option<String>,

    /// Token credential endpoint.
    #[arg(short = 't', long)]
    access_token_url: Option<String>,

    /// Client credential key.
    #[arg(short = 'k', long, env = "OAUTH_CONSUMER_KEY")]
    consumer_key: Option<String>,

    /// Client credential secret.
    #[arg(short = 's', long, env = "OAUTH_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,

    /// Extra parameters to pass with the temporary credential request.
    #[arg(short = 'p', long, value_name = "KEY1=VALUE1&KEY2=VALUE2...")]
    params: Option<String>,

    /// Configuration file with one NAME="VALUE" per line; its values
    /// override the options above.
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Signature method: HMAC-SHA1 or PLAINTEXT.
    #[arg(long, value_name = "METHOD")]
    signature_method: Option<SignatureMethod>,

    /// Timeout for each HTTP exchange, in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not open the authorize URL in a browser.
    #[arg(long)]
    no_browser: bool,

    /// Fail instead of prompting for missing endpoints or credentials.
    #[arg(long)]
    no_input: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        let strings = [
            (&self.request_token_url, &mut config.request_token_url),
            (&self.authorize_url, &mut config.authorize_url),
            (&self.access_token_url, &mut config.access_token_url),
            (&self.consumer_key, &mut config.consumer_key),
            (&self.consumer_secret, &mut config.consumer_secret),
            (&self.params, &mut config.params),
        ];
        for (from, to) in strings {
            if let Some(value) = from {
                *to = value.clone();
            }
        }
        if let Some(signature_method) = self.signature_method {
            config.signature_method = signature_method;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Duration::from_secs(timeout);
        }
        config.verbose = self.verbose;
        config
    }
}

/// Shows the authorize URL, opens it when allowed, and reads the code the
/// user pastes back.
struct BrowserPrompt {
    open_browser: bool,
}

impl VerifierSource for BrowserPrompt {
    fn verifier(&mut self, authorize_url: &str) -> Result<String> {
        eprintln!("Authorize the application at:\n\n  {}\n", authorize_url);
        if self.open_browser {
            launch(authorize_url);
        }
        let stdin = io::stdin();
        let verifier = prompt(
            &mut stdin.lock(),
            &mut io::stderr(),
            "Enter code from your browser: ",
        )?;
        Ok(verifier)
    }
}

#[cfg(feature = "browser")]
fn launch(url: &str) {
    if let Err(err) = oauth1_credential::open_browser(url) {
        tracing::warn!(error = %err, "could not open a browser");
    }
}

#[cfg(not(feature = "browser"))]
fn launch(_url: &str) {
    debug!("built without browser support");
}

type LogHandle = reload::Handle<EnvFilter, Registry>;

fn verbosity(verbose: bool) -> EnvFilter {
    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install the stderr subscriber; the handle lets a config file turn on
/// verbose output after the fact.
fn init_logging(verbose: bool) -> LogHandle {
    let (filter, handle) = reload::Layer::new(verbosity(verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
    handle
}

fn run(cli: Cli) -> Result<AccessCredential> {
    let log = init_logging(cli.verbose);

    let mut config = cli.config();
    if let Some(path) = &cli.config_file {
        config.apply_file(path)?;
        if config.verbose && !cli.verbose {
            if let Err(err) = log.reload(verbosity(true)) {
                tracing::warn!(error = %err, "could not enable verbose output");
            }
        }
    }
    debug!(?config, "configuration loaded");

    if !cli.no_input {
        let stdin = io::stdin();
        config.fill_interactively(&mut stdin.lock(), &mut io::stderr())?;
    }
    let params = config.extra_params()?;

    let transport = ReqwestTransport::new(config.timeout).map_err(Error::HttpClient)?;
    let client = Client::new(config.endpoints(), config.client_credential(), transport)
        .signature_method(config.signature_method);

    let mut flow = Flow::new(client);
    flow.run(
        &params,
        &mut BrowserPrompt {
            open_browser: !cli.no_browser,
        },
    )
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(access) => println!("{}", access),
        Err(err) => {
            eprintln!("Error: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn options_fill_config() {
        let cli = Cli::try_parse_from([
            "oauth1-credential",
            "-r",
            "http://example.com/rt",
            "-a",
            "http://example.com/auth",
            "-t",
            "http://example.com/at",
            "-k",
            "key",
            "-s",
            "secret",
            "-p",
            "oauth_callback=oob",
            "--signature-method",
            "plaintext",
            "--timeout",
            "7",
            "-v",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.request_token_url, "http://example.com/rt");
        assert_eq!(config.authorize_url, "http://example.com/auth");
        assert_eq!(config.access_token_url, "http://example.com/at");
        assert_eq!(config.consumer_key, "key");
        assert_eq!(config.consumer_secret, "secret");
        assert_eq!(config.params, "oauth_callback=oob");
        assert_eq!(config.signature_method, SignatureMethod::Plaintext);
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert!(config.verbose);
    }

    #[test]
    fn unknown_signature_method_is_refused() {
        assert!(Cli::try_parse_from(["oauth1-credential", "--signature-method", "RSA-SHA1"]).is_err());
    }
}

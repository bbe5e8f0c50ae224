//! Run configuration and the three ways it is filled in.
//!
//! Values start from the command line, a key=value file then overrides the
//! fields it names, and whatever required field is still empty is asked for
//! interactively.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::transport::DEFAULT_TIMEOUT;
use crate::{ClientCredential, ConfigError, Endpoints, SignatureMethod};

const NOT_EMPTY: &str = "Something not empty is required";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Extra parameters for the temporary credential request, `k=v&k2=v2`.
    pub params: String,
    pub signature_method: SignatureMethod,
    pub verbose: bool,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            request_token_url: String::new(),
            authorize_url: String::new(),
            access_token_url: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            params: String::new(),
            signature_method: SignatureMethod::HmacSha1,
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("request_token_url", &self.request_token_url)
            .field("authorize_url", &self.authorize_url)
            .field("access_token_url", &self.access_token_url)
            .field("consumer_key", &self.consumer_key)
            .field("params", &self.params)
            .field("signature_method", &self.signature_method)
            .field("verbose", &self.verbose)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Override fields from a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let origin = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;
        debug!(path = %origin, "loading configuration file");
        self.apply_str(&contents, &origin)
    }

    /// Override fields from `NAME=VALUE` lines.
    ///
    /// Names are case-insensitive and `-` may stand for `_`. Values may be
    /// wrapped in quotes and keep any `=` after the first one. Blank lines,
    /// `#` comments and lines without `=` are skipped.
    pub fn apply_str(&mut self, contents: &str, origin: &str) -> Result<(), ConfigError> {
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase().replace('-', "_");
            let value = unquote(value.trim());
            let invalid = || ConfigError::InvalidValue {
                path: origin.to_string(),
                line: index + 1,
                key: name.clone(),
                value: value.to_string(),
            };
            match name.as_str() {
                "request_token_url" => self.request_token_url = value.to_string(),
                "authorize_url" => self.authorize_url = value.to_string(),
                "access_token_url" => self.access_token_url = value.to_string(),
                "consumer_key" => self.consumer_key = value.to_string(),
                "consumer_secret" => self.consumer_secret = value.to_string(),
                "params" => self.params = value.to_string(),
                "signature_method" => {
                    self.signature_method = value.parse().map_err(|_| invalid())?
                }
                "verbose" => self.verbose = value.parse().map_err(|_| invalid())?,
                "timeout" => {
                    self.timeout = Duration::from_secs(value.parse().map_err(|_| invalid())?)
                }
                _ => warn!(path = %origin, line = index + 1, key = %name, "unknown configuration key ignored"),
            }
        }
        Ok(())
    }

    /// Ask for every required field that is still empty.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` if input ends before a value is given.
    pub fn fill_interactively<R, W>(&mut self, input: &mut R, output: &mut W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let fields = [
            ("Temporary credential endpoint: ", &mut self.request_token_url),
            ("Authorize endpoint: ", &mut self.authorize_url),
            ("Token credential endpoint: ", &mut self.access_token_url),
            ("Client credential key: ", &mut self.consumer_key),
            ("Client credential secret: ", &mut self.consumer_secret),
        ];
        for (label, field) in fields {
            if field.trim().is_empty() {
                *field = prompt(input, output, label)?;
            }
        }
        Ok(())
    }

    /// Parse [`Config::params`] with form-urlencoded rules, repeats kept.
    pub fn extra_params(&self) -> Result<Vec<(String, String)>, ConfigError> {
        serde_urlencoded::from_str(self.params.trim())
            .map_err(|e| ConfigError::InvalidParams(format!("{}: {}", self.params, e)))
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            request_token_url: self.request_token_url.trim().to_string(),
            authorize_url: self.authorize_url.trim().to_string(),
            access_token_url: self.access_token_url.trim().to_string(),
        }
    }

    pub fn client_credential(&self) -> ClientCredential {
        ClientCredential::new(self.consumer_key.trim(), self.consumer_secret.trim())
    }
}

/// Print `label` and read one trimmed, non-empty line, asking again on
/// empty input.
pub fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> io::Result<String>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{}", label)?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no input for {}", label.trim_end_matches([':', ' '])),
            ));
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
        writeln!(output, "{}", NOT_EMPTY)?;
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

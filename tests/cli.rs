mod common;

use std::io::Write;
use std::process::{Command, Output, Stdio};

use common::serve;
use tempfile::NamedTempFile;

fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_oauth1-credential"));
    command
        .env_remove("OAUTH_CONSUMER_KEY")
        .env_remove("OAUTH_CONSUMER_SECRET")
        .env_remove("RUST_LOG")
        .arg("--no-browser");
    command
}

fn endpoints(command: &mut Command, base: &str) {
    command
        .arg("-r")
        .arg(format!("{}/request_token", base))
        .arg("-a")
        .arg(format!("{}/authorize", base))
        .arg("-t")
        .arg(format!("{}/access_token", base))
        .args(["-k", "key", "-s", "secret"]);
}

/// Run to completion with `input` on stdin.
fn run(command: &mut Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    // the process may exit before reading anything
    let _ = stdin.write_all(input.as_bytes());
    drop(stdin);
    child.wait_with_output().unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn prints_credential_on_stdout() {
    let (base, server) = serve(vec![
        (200, "oauth_token=tok1&oauth_token_secret=sec1"),
        (200, "oauth_token=tok2&oauth_token_secret=sec2"),
    ]);
    let mut command = command();
    endpoints(&mut command, &base);
    command.args(["-p", "oauth_callback=oob", "--no-input"]);

    let output = run(&mut command, "verify123\n");

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "oauth_token=tok2\noauth_token_secret=sec2\n"
    );
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(&format!("{}/authorize?oauth_token=tok1", base)));
    assert!(stderr.contains("Enter code from your browser: "));

    let seen = server.join().unwrap();
    assert!(seen[1].authorization.contains("oauth_verifier=\"verify123\""));
}

#[test]
fn missing_configuration_exits_with_failure() {
    let output = run(command().arg("--no-input"), "");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = stderr(&output);
    assert!(stderr.contains("Error: missing configuration : request token URL is required"));
    assert_eq!(stderr.matches("missing configuration").count(), 1);
}

#[test]
fn rejected_temporary_credential_exits_with_failure() {
    let (base, server) = serve(vec![(401, "Invalid consumer key")]);
    let mut command = command();
    endpoints(&mut command, &base);
    command.arg("--no-input");

    let output = run(&mut command, "");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = stderr(&output);
    assert!(stderr.contains("Error: temporary credential request rejected"));
    assert!(stderr.contains("HTTP 401"));
    assert!(!stderr.contains("Enter code"));
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn unknown_config_keys_are_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "favourite_colour=blue").unwrap();

    let output = run(command().arg("--no-input").arg("-f").arg(file.path()), "");

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("unknown configuration key ignored"));
    assert!(stderr.contains("favourite_colour"));
}

#[test]
fn verbose_from_config_file_enables_debug_output() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "verbose=true").unwrap();
    writeln!(file, "consumer_secret=hush").unwrap();

    let output = run(command().arg("--no-input").arg("-f").arg(file.path()), "");

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("configuration loaded"));
    assert!(!stderr.contains("hush"));
}

mod common;

use std::net::TcpListener;
use std::time::Duration;

use oauth1_credential::{
    Client, ClientCredential, Endpoints, ErrorKind, Flow, FlowState, ReqwestTransport,
    SignatureMethod,
};
use common::serve;

fn flow(base: &str) -> Flow<ReqwestTransport> {
    let endpoints = Endpoints {
        request_token_url: format!("{}/request_token", base),
        authorize_url: format!("{}/authorize", base),
        access_token_url: format!("{}/access_token", base),
    };
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    Flow::new(Client::new(
        endpoints,
        ClientCredential::new("key", "secret"),
        transport,
    ))
}

#[test]
fn full_flow_against_server() {
    let (base, server) = serve(vec![
        (200, "oauth_token=tok1&oauth_token_secret=sec1&oauth_callback_confirmed=true"),
        (200, "oauth_token=tok2&oauth_token_secret=sec2&user_id=42"),
    ]);
    let mut flow = flow(&base);

    let mut shown = None;
    let access = flow
        .run(
            &[("oauth_callback", "oob"), ("scope", "read")],
            &mut |url: &str| -> oauth1_credential::Result<String> {
                shown = Some(url.to_string());
                Ok("verify123\n".to_string())
            },
        )
        .unwrap();

    assert_eq!(shown.unwrap(), format!("{}/authorize?oauth_token=tok1", base));
    assert_eq!(
        access.to_string(),
        "oauth_token=tok2\noauth_token_secret=sec2"
    );
    assert_eq!(flow.state(), &FlowState::Done(access));

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);

    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "/request_token?scope=read");
    assert!(seen[0].authorization.starts_with("OAuth "));
    assert!(seen[0].authorization.contains("oauth_consumer_key=\"key\""));
    assert!(seen[0].authorization.contains("oauth_callback=\"oob\""));
    assert!(seen[0].authorization.contains("oauth_signature_method=\"HMAC-SHA1\""));
    assert!(!seen[0].authorization.contains("oauth_token="));

    assert_eq!(seen[1].url, "/access_token");
    assert!(seen[1].authorization.contains("oauth_token=\"tok1\""));
    assert!(seen[1].authorization.contains("oauth_verifier=\"verify123\""));
    assert!(!seen[1].authorization.contains("oauth_callback="));
}

#[test]
fn plaintext_signature_is_sent_in_clear() {
    let (base, server) = serve(vec![(200, "oauth_token=t&oauth_token_secret=s")]);
    let endpoints = Endpoints {
        request_token_url: format!("{}/request_token", base),
        authorize_url: format!("{}/authorize", base),
        access_token_url: format!("{}/access_token", base),
    };
    let client = Client::new(
        endpoints,
        ClientCredential::new("key", "se cret"),
        ReqwestTransport::new(Duration::from_secs(5)).unwrap(),
    )
    .signature_method(SignatureMethod::Plaintext);

    let temporary = client.get_request_token(&[("oauth_callback", "oob")]).unwrap();
    assert_eq!(temporary.token, "t");

    let seen = server.join().unwrap();
    assert!(seen[0].authorization.contains("oauth_signature_method=\"PLAINTEXT\""));
    // "se%20cret&" encoded once more for the header
    assert!(seen[0].authorization.contains("oauth_signature=\"se%2520cret%26\""));
}

#[test]
fn unauthorized_temporary_credential_fails_flow() {
    let (base, server) = serve(vec![(401, "Invalid consumer key")]);
    let mut flow = flow(&base);

    let err = flow
        .run(
            &[("oauth_callback", "oob")],
            &mut |_: &str| -> oauth1_credential::Result<String> {
                panic!("no verifier should be asked for")
            },
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TemporaryCredentialRejected);
    assert!(err.to_string().contains("401"));
    assert_eq!(
        flow.state(),
        &FlowState::Failed(ErrorKind::TemporaryCredentialRejected)
    );
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn malformed_access_token_response_fails_flow() {
    let (base, server) = serve(vec![
        (200, "oauth_token=tok1&oauth_token_secret=sec1"),
        (200, "{\"oauth_token\":\"tok2\"}"),
    ]);
    let mut flow = flow(&base);

    let err = flow
        .run(
            &[("oauth_callback", "oob")],
            &mut |_: &str| -> oauth1_credential::Result<String> { Ok("v".to_string()) },
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AccessTokenRejected);
    assert_eq!(flow.state(), &FlowState::Failed(ErrorKind::AccessTokenRejected));
    server.join().unwrap();
}

#[test]
fn unreachable_server_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut flow = flow(&format!("http://127.0.0.1:{}", port));

    let err = flow
        .request_authorization(&[("oauth_callback", "oob")])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(flow.state(), &FlowState::Failed(ErrorKind::Network));
}

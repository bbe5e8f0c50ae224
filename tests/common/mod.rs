//! Local OAuth server shared by the integration tests.
#![allow(dead_code)]

use std::thread::{self, JoinHandle};

use tiny_http::{Response, Server};

pub struct Seen {
    pub method: String,
    pub url: String,
    pub authorization: String,
}

/// Answer one request per reply, in order, and hand back what was received.
pub fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Seen>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in replies {
            let request = server.recv().unwrap();
            let authorization = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Authorization"))
                .map(|header| header.value.as_str().to_string())
                .unwrap_or_default();
            seen.push(Seen {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization,
            });
            request
                .respond(Response::from_string(body).with_status_code(status))
                .unwrap();
        }
        seen
    });
    (format!("http://{}", addr), handle)
}

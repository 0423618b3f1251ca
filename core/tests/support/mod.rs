//! Scripted transport shared by the core integration tests.
//!
//! Replies are served in order; once the script runs out the last reply is
//! repeated. Every call is recorded with the paused-clock instant it was
//! made at so tests can check the backoff between attempts.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use yourform_core::{ClientConfig, HttpRequest, HttpResponse, Transport, TransportError, YourForm};

#[derive(Clone, Debug)]
pub enum Reply {
    Response(HttpResponse),
    NetworkError(String),
}

pub fn reply(status: u16, headers: &[(&str, &str)], body: &str) -> Reply {
    Reply::Response(HttpResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: body.to_string(),
    })
}

#[derive(Clone, Debug)]
pub struct Call {
    pub request: HttpRequest,
    pub at: Instant,
}

pub struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn repeating(reply: Reply) -> Arc<Self> {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            request,
            at: Instant::now(),
        });

        let next = self.script.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .expect("scripted transport has no replies"),
        };

        match reply {
            Reply::Response(response) => Ok(response),
            Reply::NetworkError(message) => Err(TransportError(message)),
        }
    }
}

pub const API_KEY: &str = "test_api_key";

pub fn client(transport: Arc<ScriptedTransport>, max_retries: u32) -> YourForm {
    let config = ClientConfig::new(API_KEY)
        .unwrap()
        .with_base_url("https://api.test/v1/")
        .with_max_retries(max_retries);
    YourForm::with_transport(config, transport)
}

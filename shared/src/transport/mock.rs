//! A scripted JSON-RPC transport for unit tests. Responses are queued ahead
//! of time and every issued request is recorded so tests can assert on the
//! exact calls a component makes.

use jsonrpc_core::{Call, Value};
use std::sync::{Arc, Mutex};
use web3::{error, helpers, RequestId, Transport};

#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    responses: Vec<Result<Value, jsonrpc_core::Error>>,
    requests: Vec<(String, Vec<Value>)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn web3(&self) -> web3::Web3<Self> {
        web3::Web3::new(self.clone())
    }

    /// Queues a successful response. Responses are served in FIFO order.
    pub fn respond(&self, response: Value) {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push(Ok(response));
    }

    /// Queues an RPC error response.
    pub fn fail(&self, error: jsonrpc_core::Error) {
        self.inner.lock().unwrap().responses.push(Err(error));
    }

    /// All requests issued so far as `(method, params)` pairs.
    pub fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.inner.lock().unwrap().requests.clone()
    }
}

impl Transport for MockTransport {
    type Out = futures::future::Ready<error::Result<Value>>;

    fn prepare(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push((method.to_string(), params.clone()));
        let id = inner.requests.len();
        (id, helpers::build_request(id, method, params))
    }

    fn send(&self, _id: RequestId, _request: Call) -> Self::Out {
        let mut inner = self.inner.lock().unwrap();
        let response = if inner.responses.is_empty() {
            Err(jsonrpc_core::Error {
                code: jsonrpc_core::ErrorCode::InternalError,
                message: "mock transport has no queued response".to_string(),
                data: None,
            })
        } else {
            inner.responses.remove(0)
        };
        futures::future::ready(response.map_err(error::Error::Rpc))
    }
}

//! Test doubles for tool transports

use crate::error::TransportError;
use crate::tools::http::{HttpResponse, HttpTransport, OutboundRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Records every request and answers with a canned response
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    response: Result<HttpResponse, TransportError>,
}

impl RecordingTransport {
    pub(crate) fn responding(response: HttpResponse) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response: Ok(response),
        })
    }

    pub(crate) fn json(status: u16, body: Value) -> Arc<Self> {
        Self::responding(HttpResponse::new(
            status,
            Some("application/json"),
            body.to_string(),
        ))
    }

    pub(crate) fn text(status: u16, body: &str) -> Arc<Self> {
        Self::responding(HttpResponse::new(status, Some("text/plain"), body))
    }

    pub(crate) fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response: Err(error),
        })
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.response.clone()
    }
}

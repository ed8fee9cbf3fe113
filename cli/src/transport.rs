//! Blocking HTTP transport backed by ureq.

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Statuses are returned as data so the core client can interpret them;
    /// only connection-level failures become errors.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn send(builder: ureq::RequestBuilder<ureq::typestate::WithBody>, body: Option<&str>) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(b) => builder.send(b.as_bytes()),
        None => builder.send_empty(),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = req.method.as_str(), path = %req.path, "sending request");
        let path = req.path.as_str();
        let headers = req.headers.as_slice();
        let body = req.body.as_deref();
        let result = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(path), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(path), headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(path), headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(path), headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(path), headers), body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, "received response");
        Ok(HttpResponse::new(status, body))
    }
}

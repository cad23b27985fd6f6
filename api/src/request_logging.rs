use poem::http::StatusCode;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response};
use std::time::Instant;

/// Middleware that logs each HTTP request with method, path, query, status,
/// duration, and client IP
pub struct RequestLogging;

impl<E: Endpoint> Middleware<E> for RequestLogging {
    type Output = RequestLoggingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLoggingEndpoint { inner: ep }
    }
}

pub struct RequestLoggingEndpoint<E> {
    inner: E,
}

struct RequestSummary {
    method: String,
    path: String,
    query: String,
    client_ip: String,
    started: Instant,
}

impl RequestSummary {
    fn new(req: &Request) -> Self {
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().unwrap_or_default().to_string(),
            client_ip: req
                .remote_addr()
                .as_socket_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        }
    }

    fn log(&self, status: StatusCode, error: Option<&poem::Error>) {
        let duration_ms = self.started.elapsed().as_millis();
        let status = status.as_u16();

        if let Some(err) = error {
            tracing::error!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status,
                duration_ms = %duration_ms,
                client_ip = %self.client_ip,
                error = %err,
                "request error"
            );
        } else if status >= 400 {
            tracing::warn!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status,
                duration_ms = %duration_ms,
                client_ip = %self.client_ip,
                "request failed"
            );
        } else {
            tracing::info!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status,
                duration_ms = %duration_ms,
                client_ip = %self.client_ip,
                "request completed"
            );
        }
    }
}

impl<E: Endpoint> Endpoint for RequestLoggingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let summary = RequestSummary::new(&req);

        match self.inner.call(req).await {
            Ok(resp) => {
                let resp = resp.into_response();
                summary.log(resp.status(), None);
                Ok(resp)
            }
            Err(err) => {
                summary.log(err.status(), Some(&err));
                Err(err)
            }
        }
    }
}

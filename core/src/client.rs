//! The request/decode pipeline.
//!
//! # Design
//! `RequestExecutor` holds a transport and its settings and carries no
//! mutable state between calls. `execute` runs one sequential pipeline:
//! parse the URL, dispatch under a timeout, decode the complete body into the
//! caller's type. Every failure is folded into exactly one `ErrorKind` at the
//! step where it happens.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ExecutorConfig;
use crate::error::{classify_decode, ErrorKind};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::{ReqwestTransport, Transport};

/// Issues one request per call and decodes the JSON body into `T`.
///
/// Calls are independent; the executor can be shared behind an `Arc` or
/// cloned (clones share the transport's connection pool).
#[derive(Debug, Clone)]
pub struct RequestExecutor<X = ReqwestTransport> {
    transport: X,
    config: ExecutorConfig,
}

impl RequestExecutor<ReqwestTransport> {
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self::with_transport(ReqwestTransport::new(), config)
    }
}

impl Default for RequestExecutor<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Transport> RequestExecutor<X> {
    pub fn with_transport(transport: X, config: ExecutorConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Send `method` to `url` and decode the response body as `T`.
    ///
    /// The status code is not inspected: any body that decodes into `T` is a
    /// success.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if `url` does not parse; nothing is sent.
    /// - `Timeout` if the exchange does not finish within the configured
    ///   timeout, or the transport reports its own timeout.
    /// - `RequestFailed` for network failures.
    /// - `DecodingFailed` if the body is not valid JSON for `T`.
    /// - `Unknown` for anything else.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        method: HttpMethod,
    ) -> Result<T, ErrorKind> {
        let url = Url::parse(url).map_err(|e| {
            debug!(%url, error = %e, "rejecting unparsable url");
            ErrorKind::InvalidUrl
        })?;

        let request = HttpRequest { method, url };
        debug!(%request.method, %request.url, "dispatching request");

        let response = tokio::time::timeout(self.config.timeout, self.transport.send(&request))
            .await
            .map_err(|_| {
                warn!(
                    %request.method,
                    %request.url,
                    timeout = ?self.config.timeout,
                    "request timed out"
                );
                ErrorKind::Timeout
            })?
            .map_err(|e| {
                let kind = ErrorKind::from(e.clone());
                warn!(%request.method, %request.url, error = %e, ?kind, "transport error");
                kind
            })?;

        debug!(
            %request.url,
            status = response.status,
            bytes = response.body.len(),
            "response received"
        );

        serde_json::from_slice(&response.body).map_err(|e| {
            let kind = classify_decode(&e);
            warn!(%request.url, status = response.status, error = %e, ?kind, "decode error");
            kind
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    #[derive(Debug, PartialEq, Eq, Deserialize)]
    struct Widget {
        id: i64,
        name: String,
    }

    #[derive(Clone)]
    enum Reply {
        Body(&'static str),
        Fail(TransportError),
        After(Duration, &'static str),
        Never,
    }

    /// Replies with a fixed script and records every request it sees.
    #[derive(Clone)]
    struct Scripted {
        reply: Reply,
        seen: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl Scripted {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            let body = match &self.reply {
                Reply::Body(body) => body,
                Reply::Fail(err) => return Err(err.clone()),
                Reply::After(delay, body) => {
                    tokio::time::sleep(*delay).await;
                    body
                }
                Reply::Never => std::future::pending().await,
            };
            Ok(HttpResponse {
                status: 200,
                body: body.as_bytes().to_vec(),
            })
        }
    }

    fn executor(transport: &Scripted) -> RequestExecutor<Scripted> {
        RequestExecutor::with_transport(transport.clone(), ExecutorConfig::default())
    }

    const WIDGET: &str = r#"{"id": 7, "name": "widget"}"#;

    #[tokio::test]
    async fn decodes_matching_body() {
        let transport = Scripted::new(Reply::Body(WIDGET));
        let widget: Widget = executor(&transport)
            .execute("http://localhost/widgets/7", HttpMethod::Get)
            .await
            .unwrap();
        assert_eq!(
            widget,
            Widget {
                id: 7,
                name: "widget".to_string()
            }
        );
    }

    #[tokio::test]
    async fn invalid_urls_never_reach_transport() {
        let transport = Scripted::new(Reply::Body(WIDGET));
        let exec = executor(&transport);
        for url in ["", "   ", "http://exa mple.com/", "not a url", "//no-scheme.example"] {
            let err = exec.execute::<Widget>(url, HttpMethod::Get).await.unwrap_err();
            assert_eq!(err, ErrorKind::InvalidUrl, "url {url:?}");
        }
        assert!(transport.seen().is_empty());
    }

    #[tokio::test]
    async fn every_method_reaches_transport_unchanged() {
        let transport = Scripted::new(Reply::Body(WIDGET));
        let exec = executor(&transport);
        for method in HttpMethod::ALL {
            exec.execute::<Widget>("http://localhost/echo", method)
                .await
                .unwrap();
        }
        let methods: Vec<HttpMethod> = transport.seen().iter().map(|r| r.method).collect();
        assert_eq!(methods, HttpMethod::ALL);
    }

    #[tokio::test]
    async fn one_request_per_call() {
        let transport = Scripted::new(Reply::Body(WIDGET));
        executor(&transport)
            .execute::<Widget>("http://localhost/widgets/7?x=1", HttpMethod::Post)
            .await
            .unwrap();
        let seen = transport.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url.as_str(), "http://localhost/widgets/7?x=1");
        assert_eq!(seen[0].method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn missing_field_is_decoding_failure() {
        let transport = Scripted::new(Reply::Body(r#"{"id": 7}"#));
        let err = executor(&transport)
            .execute::<Widget>("http://localhost/widgets/7", HttpMethod::Get)
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::DecodingFailed);
    }

    #[tokio::test]
    async fn non_json_is_decoding_failure() {
        let transport = Scripted::new(Reply::Body("<html>oops</html>"));
        let err = executor(&transport)
            .execute::<Widget>("http://localhost/", HttpMethod::Get)
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::DecodingFailed);
    }

    #[tokio::test]
    async fn transport_failures_are_classified() {
        let cases = [
            (TransportError::Failed("dns".into()), ErrorKind::RequestFailed),
            (TransportError::Timeout, ErrorKind::Timeout),
            (TransportError::Other("protocol upgrade".into()), ErrorKind::Unknown),
        ];
        for (failure, expected) in cases {
            let transport = Scripted::new(Reply::Fail(failure.clone()));
            let err = executor(&transport)
                .execute::<Widget>("http://localhost/", HttpMethod::Get)
                .await
                .unwrap_err();
            assert_eq!(err, expected, "{failure:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn silent_transport_times_out_at_twelve_seconds() {
        let transport = Scripted::new(Reply::Never);
        let started = tokio::time::Instant::now();
        let err = executor(&transport)
            .execute::<Widget>("http://localhost/slow", HttpMethod::Get)
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::Timeout);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(12), "fired early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(12_010), "fired late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn reply_just_under_timeout_succeeds() {
        let transport = Scripted::new(Reply::After(Duration::from_millis(11_999), WIDGET));
        let widget: Widget = executor(&transport)
            .execute("http://localhost/slow", HttpMethod::Get)
            .await
            .unwrap();
        assert_eq!(widget.id, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_timeout_is_honored() {
        let transport = Scripted::new(Reply::After(Duration::from_secs(2), WIDGET));
        let exec = RequestExecutor::with_transport(
            transport.clone(),
            ExecutorConfig::default().with_timeout(Duration::from_secs(1)),
        );
        let err = exec
            .execute::<Widget>("http://localhost/slow", HttpMethod::Get)
            .await
            .unwrap_err();
        assert_eq!(err, ErrorKind::Timeout);
        assert_eq!(exec.config().timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let transport = Scripted::new(Reply::Body(WIDGET));
        let exec = Arc::new(executor(&transport));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let exec = Arc::clone(&exec);
                tokio::spawn(async move {
                    let url = format!("http://localhost/widgets/{i}");
                    exec.execute::<Widget>(&url, HttpMethod::Get).await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(transport.seen().len(), 8);
    }
}

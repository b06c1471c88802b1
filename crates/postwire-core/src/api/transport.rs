//! HTTP transport seam.
//!
//! Services talk to the network through the `Transport` trait so the
//! reqwest-backed implementation can be swapped for a scripted one in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::FetchError;

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// POST with a JSON body and JSON content negotiation headers.
    pub fn post_json<B: serde::Serialize>(url: impl Into<String>, body: &B) -> Result<Self, FetchError> {
        let body = serde_json::to_vec(body)
            .map_err(|e| FetchError::Transport(format!("Failed to encode request body: {}", e)))?;
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            headers: vec![
                (header::CONTENT_TYPE.to_string(), "application/json".to_string()),
                (header::ACCEPT.to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check the status, then parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        if !self.is_success() {
            return Err(FetchError::from_status(
                self.status,
                &String::from_utf8_lossy(&self.body),
            ));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request. Only failures to complete the exchange are
    /// errors here; non-2xx responses come back as `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Transport backed by a shared `reqwest::Client`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status = status, bytes = body.len(), "Received response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_json_sets_headers_and_body() {
        let request =
            HttpRequest::post_json("http://x/login", &json!({"email": "a@b.com"})).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "a@b.com"}));
    }

    #[test]
    fn test_get_has_no_headers_or_body() {
        let request = HttpRequest::get("http://x/posts");
        assert_eq!(request.method, Method::GET);
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_rejects_non_success_status() {
        let response = HttpResponse::new(500, "oops");
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert_eq!(
            err,
            FetchError::Protocol {
                status: 500,
                body: "oops".to_string()
            }
        );
    }

    #[test]
    fn test_json_reports_malformed_body() {
        let response = HttpResponse::new(200, "<html>");
        let err = response.json::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_json_parses_success() {
        let response = HttpResponse::new(204, "[1,2]");
        assert_eq!(response.json::<Vec<u32>>().unwrap(), vec![1, 2]);
    }

    mod wire {
        use super::*;
        use std::time::Duration;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::sync::oneshot;

        /// Serve one connection: capture the raw request, wait `delay`,
        /// then reply with `status` and `body`.
        async fn serve_once(
            status_line: &'static str,
            body: &'static str,
            delay: Duration,
        ) -> (String, oneshot::Receiver<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = oneshot::channel();

            tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                let _ = tx.send(request);

                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });

            (format!("http://{}/api/auth/login", addr), rx)
        }

        async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            String::from_utf8_lossy(&buf).to_string()
        }

        #[tokio::test]
        async fn test_post_json_headers_reach_the_server() {
            let (url, captured) = serve_once("200 OK", r#"{"token":"T1"}"#, Duration::ZERO).await;
            let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
            let request =
                HttpRequest::post_json(url, &json!({"email": "a@b.com", "password": "pw"})).unwrap();

            let response = transport.send(request).await.unwrap();

            assert_eq!(response.status, 200);
            assert_eq!(response.body, br#"{"token":"T1"}"#.to_vec());

            let raw = captured.await.unwrap();
            let lower = raw.to_ascii_lowercase();
            assert!(raw.starts_with("POST /api/auth/login HTTP/1.1"));
            assert!(lower.contains("content-type: application/json\r\n"));
            assert!(lower.contains("accept: application/json\r\n"));
            assert!(raw.ends_with(r#"{"email":"a@b.com","password":"pw"}"#));
        }

        #[tokio::test]
        async fn test_non_success_status_is_a_response() {
            let (url, _captured) =
                serve_once("401 Unauthorized", r#"{"message":"bad"}"#, Duration::ZERO).await;
            let transport = ReqwestTransport::new(None).unwrap();

            let response = transport.send(HttpRequest::get(url)).await.unwrap();

            assert_eq!(response.status, 401);
            let err = response.json::<serde_json::Value>().unwrap_err();
            assert!(err.is_unauthorized());
        }

        #[tokio::test]
        async fn test_timeout_is_transport_error() {
            let (url, _captured) = serve_once("200 OK", "[]", Duration::from_secs(3)).await;
            let transport = ReqwestTransport::new(Some(Duration::from_secs(1))).unwrap();

            let err = transport.send(HttpRequest::get(url)).await.unwrap_err();

            assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {:?}", err);
        }

        #[tokio::test]
        async fn test_connection_refused_is_transport_error() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();

            let err = transport
                .send(HttpRequest::get(format!("http://{}/posts", addr)))
                .await
                .unwrap_err();

            assert_eq!(err.kind(), crate::api::FetchErrorKind::Transport);
        }
    }
}

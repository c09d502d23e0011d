use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::config::NotificationConfig;
use crate::domain::ports::notifier::{NotificationError, Notifier};

/// Delivers alert text to a push-notification service.
///
/// The message is POSTed as the `message` form field, authenticated with a
/// bearer token. Any non-2xx status is a delivery failure. One attempt per
/// call, no retry.
pub struct PushNotifier {
    endpoint: String,
    token: Option<String>,
    token_env: String,
    client: reqwest::Client,
}

impl PushNotifier {
    /// Creates a notifier for `endpoint`.
    ///
    /// `token_env` only names the variable in error messages; `token` is the
    /// value already read from it.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::SendFailed` if the HTTP client cannot be
    /// initialized (e.g. TLS backend failure).
    pub fn new(
        endpoint: String,
        token: Option<String>,
        token_env: String,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NotificationError::SendFailed(format!("cannot build HTTP client: {e}"))
            })?;
        Ok(Self::with_client(endpoint, token, token_env, client))
    }

    /// Builds the notifier from config, reading the token from the configured
    /// environment variable. A missing token is reported on each delivery.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::SendFailed` if the HTTP client cannot be initialized.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            warn!(
                "{} is not set, alert notifications will fail",
                config.token_env
            );
        }
        Self::new(
            config.endpoint.clone(),
            token,
            config.token_env.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn with_client(
        endpoint: String,
        token: Option<String>,
        token_env: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            endpoint,
            token,
            token_env,
            client,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for PushNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotificationError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| NotificationError::MissingToken(self.token_env.clone()))?;

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .form(&[("message", text)])
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        debug!("notification delivered ({status})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const ALERT: &str = "web01: CPU usage too high: 95%";

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("build client")
    }

    fn notifier(endpoint: String, token: Option<&str>) -> PushNotifier {
        PushNotifier::with_client(
            endpoint,
            token.map(str::to_string),
            "LINE_NOTIFY_TOKEN".to_string(),
            local_client(),
        )
    }

    /// Reads one HTTP request (headers plus `content-length` body).
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serves a single request with the given status, returning the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}/api/notify"), handle)
    }

    #[tokio::test]
    async fn delivers_form_message_with_bearer_token() {
        let (url, server) = serve_once("200 OK", r#"{"status":200}"#).await;
        let n = notifier(url, Some("secret-token"));

        n.notify(ALERT).await.expect("delivered");

        let request = server.await.expect("server task");
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /api/notify "));
        assert!(lower.contains("authorization: bearer secret-token"));
        assert!(lower.contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with("message=web01%3A+CPU+usage+too+high%3A+95%25"));
    }

    #[tokio::test]
    async fn multi_line_message_is_sent_once() {
        let (url, server) = serve_once("200 OK", "ok").await;
        let n = notifier(url, Some("t"));

        n.notify("web01: CPU usage too high: 95%\nweb01: Disk usage too high: 97%")
            .await
            .expect("delivered");

        let request = server.await.expect("server task");
        assert!(request.contains("95%25%0Aweb01"));
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let (url, server) = serve_once("401 Unauthorized", "invalid access token").await;
        let n = notifier(url, Some("bad-token"));

        let err = n.notify(ALERT).await.expect_err("should be rejected");
        match err {
            NotificationError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid access token");
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn missing_token_fails_without_sending() {
        // Nothing listens here; the call must not get that far
        let n = notifier("http://127.0.0.1:9/api/notify".to_string(), None);
        let err = n.notify(ALERT).await.expect_err("missing token");
        assert!(matches!(err, NotificationError::MissingToken(ref v) if v == "LINE_NOTIFY_TOKEN"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_send_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let n = notifier(format!("http://{addr}/api/notify"), Some("t"));
        let err = n.notify(ALERT).await.expect_err("connection refused");
        assert!(matches!(err, NotificationError::SendFailed(_)));
    }

    #[test]
    fn from_config_keeps_endpoint() {
        let config = NotificationConfig {
            endpoint: "https://push.example.com/notify".to_string(),
            token_env: "HOSTPULSE_TEST_UNSET_TOKEN_VAR".to_string(),
            timeout_secs: 1,
        };
        let n = PushNotifier::from_config(&config).expect("build notifier");
        assert_eq!(n.endpoint(), "https://push.example.com/notify");
        assert!(n.token.is_none());
    }
}

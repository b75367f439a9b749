//! One-shot loopback listener for the OAuth redirect.
//!
//! The listener accepts at most one matching callback request and is torn
//! down immediately afterwards. Dropping the socket refuses any later
//! connection attempt outright instead of leaving the browser's keep-alive
//! connection waiting on a graceful shutdown that would never finish.
//!
//! Each accepted connection is served on its own task, so a speculative
//! browser preconnect that sends no bytes (or resets before sending a
//! request) neither blocks nor aborts the wait for the real redirect;
//! per-connection read failures are logged and ignored.
//!
//! There is deliberately no timeout: if the user abandons the browser flow,
//! the wait hangs until the process is killed.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use super::error::AuthError;

/// HTML body shown in the browser once the code has been captured.
const SUCCESS_BODY: &str = "Authentication successful! Please return to the console.";

/// Listener bound to the loopback redirect port.
#[derive(Debug)]
pub struct CallbackListener {
    listener: TcpListener,
    port: u16,
}

impl CallbackListener {
    /// Binds to `127.0.0.1:port`. Port 0 picks an ephemeral port, which the
    /// integration tests rely on; the production flow passes the port from
    /// the registered redirect URI.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Listener` if the bind fails (typically because
    /// the port is already taken).
    pub async fn bind(port: u16) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|source| AuthError::listener(port, source))?;
        let port = listener
            .local_addr()
            .map_err(|source| AuthError::listener(port, source))?
            .port();
        debug!(port, "callback listener bound");
        Ok(Self { listener, port })
    }

    /// The bound address, for building the redirect URI in tests.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Listener` if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, AuthError> {
        self.listener
            .local_addr()
            .map_err(|source| AuthError::listener(self.port, source))
    }

    /// Waits for exactly one request on `callback_path` and returns its
    /// `code` query parameter.
    ///
    /// Requests to other paths get a 404 and the listener keeps listening,
    /// as do connections that fail or close before sending a request. A
    /// matching request without a `code`, or carrying an `error` parameter
    /// (consent denied), fails the flow. Either way the listener is
    /// consumed: once this method returns, the port is closed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Listener` when the accept loop itself fails and
    /// `AuthError::CallbackRejected` when the redirect did not carry a
    /// usable code.
    pub async fn wait_for_code(self, callback_path: &str) -> Result<String, AuthError> {
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<CallbackOutcome>(1);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted
                        .map_err(|source| AuthError::listener(self.port, source))?;
                    debug!(%peer, "callback connection accepted");
                    let tx = outcome_tx.clone();
                    let path = callback_path.to_string();
                    tokio::spawn(async move {
                        if let Some(outcome) = handle_connection(stream, &path).await {
                            let _ = tx.send(outcome).await;
                        }
                    });
                }
                Some(outcome) = outcome_rx.recv() => {
                    return outcome.into_result();
                }
            }
        }
    }
}

/// What a matching callback request resolved to.
enum CallbackOutcome {
    Code(String),
    Rejected(String),
}

impl CallbackOutcome {
    fn into_result(self) -> Result<String, AuthError> {
        match self {
            Self::Code(code) => Ok(code),
            Self::Rejected(reason) => Err(AuthError::callback_rejected(reason)),
        }
    }
}

/// Serves one connection. Returns `None` when the request did not match the
/// callback route (or the connection failed before sending one) and the
/// listener should keep waiting.
async fn handle_connection(mut stream: TcpStream, callback_path: &str) -> Option<CallbackOutcome> {
    let mut reader = BufReader::new(&mut stream);
    let mut request_line = String::new();
    if let Err(err) = reader.read_line(&mut request_line).await {
        // A reset preconnect socket, not the redirect; keep waiting.
        warn!(%err, "failed to read request on callback port, ignoring connection");
        return None;
    }

    let Some(target) = request_target(&request_line) else {
        warn!(line = %request_line.trim_end(), "unparseable request on callback port");
        respond(&mut stream, "400 Bad Request", "Bad request.").await;
        return None;
    };

    // The redirect target is origin-form; give it a base so Url can parse it.
    let Ok(parsed) = Url::parse(&format!("http://localhost{target}")) else {
        respond(&mut stream, "400 Bad Request", "Bad request.").await;
        return None;
    };

    if parsed.path() != callback_path {
        debug!(path = parsed.path(), "ignoring non-callback request");
        respond(&mut stream, "404 Not Found", "Not found.").await;
        return None;
    }

    let mut code = None;
    let mut denial = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => denial = Some(value.into_owned()),
            _ => {}
        }
    }

    let outcome = if let Some(reason) = denial {
        respond(&mut stream, "200 OK", "Authorization was denied.").await;
        CallbackOutcome::Rejected(reason)
    } else if let Some(code) = code {
        respond(&mut stream, "200 OK", SUCCESS_BODY).await;
        CallbackOutcome::Code(code)
    } else {
        respond(&mut stream, "400 Bad Request", "Missing authorization code.").await;
        CallbackOutcome::Rejected("callback carried no `code` parameter".to_string())
    };
    Some(outcome)
}

/// Extracts the request target from an HTTP/1.1 request line.
fn request_target(request_line: &str) -> Option<&str> {
    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Some(target),
        _ => None,
    }
}

/// Writes a minimal HTTP response and closes the connection. Write errors
/// are ignored: the code (or rejection) has already been decided and the
/// browser side closing early must not fail the flow.
async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_target_parses_get_line() {
        assert_eq!(
            request_target("GET /sso?code=abc HTTP/1.1\r\n"),
            Some("/sso?code=abc")
        );
    }

    #[test]
    fn test_request_target_rejects_other_methods() {
        assert_eq!(request_target("POST /sso HTTP/1.1\r\n"), None);
        assert_eq!(request_target("\r\n"), None);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port_reports_address() {
        let listener = CallbackListener::bind(0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }
}

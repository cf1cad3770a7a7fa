//! Abstraction for network transport mechanisms used by clients.

use std::io::ErrorKind::{TimedOut, WouldBlock};
use std::time::Duration;

use stampede_common::encoding::hexdump_string;
use tracing::{debug, trace};
use ureq::Agent;

use crate::ClientError;
use crate::config::Credentials;

pub const CONTENT_TYPE_QUERY: &str = "application/timestamp-query";
pub const CONTENT_TYPE_REPLY: &str = "application/timestamp-reply";

/// Delivers an encoded request to an authority and returns the raw reply body.
///
/// Implementations perform exactly one exchange per call and never retry.
pub trait TsaTransport: Send + Sync {
    fn post(
        &self,
        url: &str,
        body: &[u8],
        credentials: Option<&Credentials>,
    ) -> Result<Vec<u8>, ClientError>;
}

/// HTTP(S) implementation of [`TsaTransport`].
///
/// The whole exchange, from DNS lookup to the last body byte, is bounded by `timeout`; when it
/// expires the agent abandons the connection and the call returns [`ClientError::Timeout`].
/// Connections are not pooled between calls.
pub struct HttpTransport {
    agent: Agent,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .max_idle_connections(0)
            .build()
            .into();

        Self { agent, timeout }
    }

    fn map_error(&self, err: ureq::Error) -> ClientError {
        match err {
            ureq::Error::Timeout(_) => ClientError::Timeout(self.timeout),
            ureq::Error::Io(e) if matches!(e.kind(), TimedOut | WouldBlock) => {
                ClientError::Timeout(self.timeout)
            }
            other => ClientError::Transport(other.to_string()),
        }
    }
}

impl TsaTransport for HttpTransport {
    fn post(
        &self,
        url: &str,
        body: &[u8],
        credentials: Option<&Credentials>,
    ) -> Result<Vec<u8>, ClientError> {
        debug!("sending {} bytes to {}", body.len(), url);
        trace_dump(body);

        let mut request = self
            .agent
            .post(url)
            .header("Content-Type", CONTENT_TYPE_QUERY)
            .header("Accept", CONTENT_TYPE_REPLY)
            .header("User-Agent", concat!("stampede/", env!("CARGO_PKG_VERSION")));

        if let Some(credentials) = credentials {
            debug!("using basic authentication as '{}'", credentials.username());
            let header = credentials.basic_auth_header();
            request = request.header("Authorization", header.as_str());
        }

        let mut response = request.send(body).map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("{} answered HTTP {}", url, status);
            return Err(ClientError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let reply = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| self.map_error(e))?;

        debug!("received {} bytes from {}", reply.len(), url);
        trace_dump(&reply);

        Ok(reply)
    }
}

fn trace_dump(data: &[u8]) {
    if tracing::enabled!(tracing::Level::TRACE) {
        trace!("\n{}", hexdump_string(data));
    }
}

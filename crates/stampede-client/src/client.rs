//! Client to request time-stamps from an RFC 3161 authority.
//!
//! # Quick Start
//!
//! Use the [`get_timestamp`] function, which resolves the authority from the environment (see
//! [`TsaConfig::from_lookup`] for the rules):
//!
//! ```no_run
//! let response = stampede_client::get_timestamp(b"test-document").unwrap();
//! println!("generated at {:?} by {}", response.gen_time, response.authority);
//! ```
//!
//! # Advanced Usage
//!
//! A customized [Client] can be configured using [ClientBuilder]:
//!
//! ```no_run
//! use std::time::Duration;
//! use stampede_client::Client;
//! use stampede_protocol::HashAlgorithm;
//!
//! let client = Client::builder("https://timestamp.sectigo.com")
//!     .hash_algorithm(HashAlgorithm::Sha384)
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! let response = client.timestamp(b"test-document").unwrap();
//! ```
//!
//! # Transport Layer
//!
//! Requests are sent with HTTP POST. Custom transport implementations can be provided through the
//! [`TsaTransport`] trait for testing or specialized network configurations.

use std::time::Duration;

use stampede_common::crypto::{calculate_imprint, random_nonce};
use stampede_protocol::{
    FromDer, HashAlgorithm, MessageImprint, Nonce, PkiStatus, TimeStampResp, TimestampRequest,
    ToDer,
};
use tracing::{debug, info, warn};

use crate::config::{Credentials, TsaConfig, authority_from_url};
use crate::response::TimestampResponse;
use crate::transport::{HttpTransport, TsaTransport};

/// Time-stamp `content` using the authority configured in the environment.
///
/// Configuration is re-read on every call. Outside production mode a public test authority is
/// used when nothing is configured; in production mode a missing authority is a
/// [`ClientError::Configuration`] error.
pub fn get_timestamp(content: &[u8]) -> Result<TimestampResponse, ClientError> {
    let config = TsaConfig::from_env()?;
    Client::from_config(&config).timestamp(content)
}

/// Things that can go wrong when requesting a time-stamp
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("configuration required: {0}")]
    Configuration(String),

    #[error("no response from the time-stamp authority within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authority returned HTTP {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("malformed response: {0}")]
    Malformed(stampede_protocol::error::Error),

    #[error(
        "authority rejected request with status {status}{}",
        .text.as_deref().map(|t| format!(": {t}")).unwrap_or_default()
    )]
    Rejected {
        status: PkiStatus,
        text: Option<String>,
    },
}

/// Broad classes of [`ClientError`], for callers deciding whether to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Timeout,
    Transport,
    Structural,
    Rejected,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::Malformed(_) => ErrorKind::Structural,
            Self::Rejected { .. } => ErrorKind::Rejected,
        }
    }

    /// True when a fresh attempt could succeed without any change by the caller. This crate
    /// never retries on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Timeout | ErrorKind::Transport)
    }
}

impl From<stampede_protocol::error::Error> for ClientError {
    fn from(err: stampede_protocol::error::Error) -> Self {
        match err {
            stampede_protocol::error::Error::Rejected { status, text } => {
                Self::Rejected { status, text }
            }
            other => Self::Malformed(other),
        }
    }
}

pub struct ClientBuilder {
    url: String,
    authority: Option<String>,
    hash_algorithm: HashAlgorithm,
    timeout: Option<Duration>,
    credentials: Option<Credentials>,
    transport: Option<Box<dyn TsaTransport>>,
}

impl ClientBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            authority: None,
            hash_algorithm: HashAlgorithm::default(),
            timeout: None,
            credentials: None,
            transport: None,
        }
    }

    /// Display name reported in [`TimestampResponse::authority`]
    pub fn authority(mut self, authority: &str) -> Self {
        self.authority = Some(authority.to_string());
        self
    }

    pub fn hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn transport(mut self, transport: Box<dyn TsaTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Client {
        let timeout = self.timeout.unwrap_or(TsaConfig::DEFAULT_TIMEOUT);

        let transport = self
            .transport
            .unwrap_or_else(|| Box::new(HttpTransport::new(timeout)));

        let authority = self
            .authority
            .unwrap_or_else(|| authority_from_url(&self.url));

        Client {
            url: self.url,
            authority,
            hash_algorithm: self.hash_algorithm,
            timeout,
            credentials: self.credentials,
            transport,
        }
    }
}

/// Requests time-stamps from one authority. Holds no per-request state, so a single `Client` can
/// be shared between threads.
pub struct Client {
    url: String,
    authority: String,
    hash_algorithm: HashAlgorithm,
    timeout: Duration,
    credentials: Option<Credentials>,
    transport: Box<dyn TsaTransport>,
}

impl Client {
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    pub fn from_config(config: &TsaConfig) -> Self {
        let mut builder = Self::builder(config.url.as_str())
            .authority(&config.authority)
            .hash_algorithm(config.hash_algorithm)
            .timeout(config.timeout);

        if let Some(credentials) = &config.credentials {
            builder = builder.credentials(credentials.clone());
        }

        builder.build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Hash `content` with the configured algorithm and time-stamp the digest.
    pub fn timestamp(&self, content: &[u8]) -> Result<TimestampResponse, ClientError> {
        let imprint = calculate_imprint(self.hash_algorithm, content);
        debug!("hashed {} bytes with {}", content.len(), self.hash_algorithm);
        self.timestamp_imprint(&imprint)
    }

    /// Time-stamp a digest the caller has already computed. The digest's own algorithm is used,
    /// whatever this client is configured with.
    pub fn timestamp_imprint(
        &self,
        imprint: &MessageImprint,
    ) -> Result<TimestampResponse, ClientError> {
        let request = self.create_request(imprint, None);
        let request_bytes = request.to_der();

        debug!(
            "requesting time-stamp from {} ({} byte request, nonce {:?})",
            self.url,
            request_bytes.len(),
            request.nonce()
        );

        let response_bytes =
            self.transport
                .post(&self.url, &request_bytes, self.credentials.as_ref())?;

        let resp = TimeStampResp::from_der(&response_bytes).inspect_err(|e| {
            warn!("unusable response from {}: {e}", self.url);
        })?;

        if !imprint.is_contained_in(resp.token()) {
            warn!("token from {} does not contain the requested digest", self.url);
        }

        match resp.gen_time() {
            Some(gen_time) => info!("time-stamp from {} generated at {gen_time}", self.authority),
            None => info!("time-stamp from {}, generation time not found", self.authority),
        }

        Ok(TimestampResponse::new(resp, &self.authority, imprint.algorithm()))
    }

    /// Create a new [TimestampRequest] for `imprint` using the provided [Nonce], or a fresh
    /// random one if none was provided.
    fn create_request(&self, imprint: &MessageImprint, nonce: Option<Nonce>) -> TimestampRequest {
        let nonce = nonce.unwrap_or_else(random_nonce);
        TimestampRequest::new(imprint.clone(), nonce)
    }
}

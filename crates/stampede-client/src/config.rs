//! Authority configuration, resolved from the environment on every call.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use data_encoding::BASE64;
use stampede_protocol::HashAlgorithm;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::ClientError;
use crate::presets::{AuthorityPreset, TEST_AUTHORITY, find_preset, preset_for_url};

pub const MODE_ENV: &str = "STAMPEDE_MODE";
pub const URL_ENV: &str = "STAMPEDE_TSA_URL";
pub const USERNAME_ENV: &str = "STAMPEDE_TSA_USERNAME";
pub const PASSWORD_ENV: &str = "STAMPEDE_TSA_PASSWORD";
pub const HASH_ENV: &str = "STAMPEDE_TSA_HASH";
pub const TIMEOUT_ENV: &str = "STAMPEDE_TSA_TIMEOUT";
pub const PRESET_ENV: &str = "STAMPEDE_TSA_PRESET";

/// HTTP Basic credentials for an authority. The password is wiped from memory on drop and never
/// printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value for the `Authorization` header
    pub fn basic_auth_header(&self) -> Zeroizing<String> {
        let plain = Zeroizing::new(format!("{}:{}", self.username, self.password.as_str()));
        Zeroizing::new(format!("Basic {}", BASE64.encode(plain.as_bytes())))
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Production fails closed when no authority is configured; the other modes fall back to
/// [`TEST_AUTHORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    Production,
    #[default]
    Development,
    Test,
}

impl OperatingMode {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for OperatingMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            other => Err(ClientError::Configuration(format!(
                "unknown {MODE_ENV} '{other}', expected production, development or test"
            ))),
        }
    }
}

impl Display for OperatingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// Where and how to request time-stamps. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsaConfig {
    pub url: String,
    pub credentials: Option<Credentials>,
    pub hash_algorithm: HashAlgorithm,
    pub timeout: Duration,
    /// Human readable name of the authority
    pub authority: String,
}

impl TsaConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Configuration for an arbitrary endpoint, with defaults taken from a matching preset
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();

        match preset_for_url(&url) {
            Some(preset) => Self::from(preset),
            None => Self {
                authority: authority_from_url(&url),
                url,
                credentials: None,
                hash_algorithm: HashAlgorithm::default(),
                timeout: Self::DEFAULT_TIMEOUT,
            },
        }
    }

    /// Resolve configuration from the process environment. Nothing is cached, so a changed
    /// variable takes effect on the next call.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from `lookup`, which maps the `STAMPEDE_*` variable names to values.
    ///
    /// The endpoint is the explicit URL if set, else the named preset, else (outside production)
    /// the test authority. Hash algorithm and timeout come from their variables, then from the
    /// preset, then from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode = match get(MODE_ENV) {
            Some(mode) => mode.parse()?,
            None => OperatingMode::default(),
        };

        let named = match get(PRESET_ENV) {
            Some(id) => Some(find_preset(&id).ok_or_else(|| {
                ClientError::Configuration(format!("unknown {PRESET_ENV} '{id}'"))
            })?),
            None => None,
        };

        let (url, preset) = match (get(URL_ENV), named) {
            (Some(url), named) => {
                let preset = named.or_else(|| preset_for_url(&url));
                (url, preset)
            }
            (None, Some(preset)) => (preset.url.to_string(), Some(preset)),
            (None, None) if !mode.is_production() => {
                warn!(
                    "no time-stamp authority configured, using test authority {} ({mode} mode)",
                    TEST_AUTHORITY.url
                );
                (TEST_AUTHORITY.url.to_string(), Some(&TEST_AUTHORITY))
            }
            (None, None) => {
                return Err(ClientError::Configuration(format!(
                    "no time-stamp authority configured; set {URL_ENV} or {PRESET_ENV}"
                )));
            }
        };

        if mode.is_production() && preset.is_some_and(|p| p.test_only) {
            return Err(ClientError::Configuration(format!(
                "{url} is a test-only authority and cannot be used in production mode"
            )));
        }

        let hash_algorithm = match get(HASH_ENV) {
            Some(name) => name.parse().map_err(|e| {
                ClientError::Configuration(format!("invalid {HASH_ENV}: {e}"))
            })?,
            None => preset.map(|p| p.hash_algorithm).unwrap_or_default(),
        };

        let timeout = match get(TIMEOUT_ENV) {
            Some(secs) => parse_timeout(&secs)?,
            None => preset.map_or(Self::DEFAULT_TIMEOUT, |p| p.timeout),
        };

        let credentials = get(USERNAME_ENV)
            .map(|username| Credentials::new(username, get(PASSWORD_ENV).unwrap_or_default()));

        let authority = preset.map_or_else(|| authority_from_url(&url), |p| p.display_name.to_string());

        debug!(
            "resolved authority {authority} at {url} ({mode} mode, {hash_algorithm}, timeout {timeout:?}, credentials: {})",
            credentials.is_some()
        );

        Ok(Self {
            url,
            credentials,
            hash_algorithm,
            timeout,
            authority,
        })
    }
}

impl From<&AuthorityPreset> for TsaConfig {
    fn from(preset: &AuthorityPreset) -> Self {
        Self {
            url: preset.url.to_string(),
            credentials: None,
            hash_algorithm: preset.hash_algorithm,
            timeout: preset.timeout,
            authority: preset.display_name.to_string(),
        }
    }
}

fn parse_timeout(secs: &str) -> Result<Duration, ClientError> {
    match secs.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ClientError::Configuration(format!(
            "invalid {TIMEOUT_ENV} '{secs}', expected a positive number of seconds"
        ))),
    }
}

/// `host[:port]` of `url`, or the url itself if it has no scheme
pub(crate) fn authority_from_url(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    // drop any userinfo
    let host = host.rsplit_once('@').map_or(host, |(_, host)| host);

    if host.is_empty() {
        url.to_string()
    } else {
        host.to_string()
    }
}

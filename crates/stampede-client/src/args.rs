#![doc(hidden)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    HASH_ENV, MODE_ENV, PASSWORD_ENV, PRESET_ENV, TIMEOUT_ENV, URL_ENV, USERNAME_ENV,
};

/// Arguments for the client CLI
#[derive(Parser, Debug)]
#[command(version, about = "Stampede RFC 3161 time-stamp client")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Don't print any messages except for errors",
        default_value_t = false
    )]
    pub quiet: bool,

    #[clap(
        short = 'v',
        long,
        global = true,
        conflicts_with = "quiet",
        action = clap::ArgAction::Count,
        help = "Output details about requests and responses; specify multiple times for more detail"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Obtain a time-stamp token for a file
    Request(RequestArgs),

    /// Check that a token covers a file's digest (containment check, not a signature check)
    Verify(VerifyArgs),

    /// List the known time-stamp authorities
    Presets {
        #[clap(long, help = "Print the list as JSON")]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    #[clap(value_name = "FILE", help = "File to time-stamp")]
    pub file: PathBuf,

    #[clap(
        short = 'u',
        long,
        value_name = "URL",
        env = URL_ENV,
        help = "Time-stamp authority endpoint"
    )]
    pub url: Option<String>,

    #[clap(
        short = 'p',
        long,
        value_name = "PRESET",
        env = PRESET_ENV,
        help = "Known authority to use, see the 'presets' command"
    )]
    pub preset: Option<String>,

    #[clap(
        short = 'H',
        long,
        value_name = "ALGORITHM",
        env = HASH_ENV,
        help = "Digest algorithm: sha256, sha384 or sha512"
    )]
    pub hash: Option<String>,

    #[clap(
        short = 't',
        long,
        value_name = "SECONDS",
        env = TIMEOUT_ENV,
        help = "Seconds to wait for the authority's response"
    )]
    pub timeout: Option<String>,

    #[clap(long, value_name = "USER", env = USERNAME_ENV, help = "HTTP Basic username")]
    pub user: Option<String>,

    #[clap(
        long,
        value_name = "PASSWORD",
        env = PASSWORD_ENV,
        hide_env_values = true,
        help = "HTTP Basic password"
    )]
    pub password: Option<String>,

    #[clap(
        long,
        value_name = "MODE",
        env = MODE_ENV,
        help = "Operating mode: production, development or test [default: development]"
    )]
    pub mode: Option<String>,

    #[clap(
        short = 'o',
        long,
        value_name = "PATH",
        help = "Where to write the token [default: FILE.tsr]"
    )]
    pub out: Option<PathBuf>,

    #[clap(long, help = "Print the response as JSON on stdout")]
    pub json: bool,
}

impl RequestArgs {
    /// Values keyed by their environment variable names, for `TsaConfig::from_lookup`
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            URL_ENV => self.url.clone(),
            PRESET_ENV => self.preset.clone(),
            HASH_ENV => self.hash.clone(),
            TIMEOUT_ENV => self.timeout.clone(),
            USERNAME_ENV => self.user.clone(),
            PASSWORD_ENV => self.password.clone(),
            MODE_ENV => self.mode.clone(),
            _ => None,
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| {
            let mut name = self.file.clone().into_os_string();
            name.push(".tsr");
            PathBuf::from(name)
        })
    }
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    #[clap(value_name = "FILE", help = "File the token should cover")]
    pub file: PathBuf,

    #[clap(
        value_name = "TOKEN",
        help = "Token file: raw DER, or hex/base64 text"
    )]
    pub token: PathBuf,

    #[clap(
        short = 'H',
        long,
        value_name = "ALGORITHM",
        help = "Digest algorithm the token was requested with",
        default_value = "sha256"
    )]
    pub hash: String,
}

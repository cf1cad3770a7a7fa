//! The main client CLI

use std::fs;
use std::path::Path;

use clap::Parser;
use stampede_client::args::{Args, Command, RequestArgs, VerifyArgs};
use stampede_client::presets::PRESETS;
use stampede_client::{Client, TsaConfig, verify_with};
use stampede_common::encoding::try_decode_token;
use stampede_protocol::HashAlgorithm;
use tracing::{debug, error, info};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Client(#[from] stampede_client::ClientError),

    #[error("{0}")]
    Verification(#[from] stampede_client::VerificationError),

    #[error("{0}")]
    Protocol(#[from] stampede_protocol::error::Error),

    #[error("token is neither DER nor hex/base64 text: {0}")]
    Decode(#[from] data_encoding::DecodeError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let args = Args::parse();

    enable_logging(&args);

    let result = match &args.command {
        Command::Request(request) => request_timestamp(request),
        Command::Verify(verify) => verify_token(verify),
        Command::Presets { json } => list_presets(*json),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(-1);
    }
}

fn request_timestamp(args: &RequestArgs) -> Result<(), CliError> {
    let config = TsaConfig::from_lookup(|key| args.lookup(key))?;
    debug!("request config: {:?}", config);

    let content = fs::read(&args.file).map_err(|e| with_path(e, &args.file))?;
    let response = Client::from_config(&config).timestamp(&content)?;

    let token_path = args.token_path();
    fs::write(&token_path, &response.token).map_err(|e| with_path(e, &token_path))?;

    match response.gen_time {
        Some(gen_time) => info!("Generated: {gen_time}"),
        None => info!("Generated: (not found in token)"),
    }
    info!("Authority: {} ({})", response.authority, config.url);
    info!("Algorithm: {}", response.hash_algorithm);
    info!("Token:     {} ({} bytes)", token_path.display(), response.token.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

fn verify_token(args: &VerifyArgs) -> Result<(), CliError> {
    let algorithm: HashAlgorithm = args.hash.parse()?;

    let content = fs::read(&args.file).map_err(|e| with_path(e, &args.file))?;
    let raw = fs::read(&args.token).map_err(|e| with_path(e, &args.token))?;

    let token = if raw.first() == Some(&0x30) {
        raw
    } else {
        try_decode_token(&String::from_utf8_lossy(&raw))?
    };

    verify_with(algorithm, &content, &token)?;

    info!(
        "{} digest of {} found in {} (signature not checked)",
        algorithm,
        args.file.display(),
        args.token.display()
    );

    Ok(())
}

fn list_presets(json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(PRESETS)?);
        return Ok(());
    }

    for preset in PRESETS {
        let note = if preset.test_only { " (test only)" } else { "" };
        println!(
            "{:<10} {:<32} {} {}{note}",
            preset.id, preset.url, preset.hash_algorithm, preset.display_name
        );
    }

    Ok(())
}

fn with_path(err: std::io::Error, path: &Path) -> std::io::Error {
    std::io::Error::new(err.kind(), format!("{}: {err}", path.display()))
}

fn enable_logging(args: &Args) {
    let mut builder = tracing_subscriber::fmt().compact();

    if args.quiet {
        builder = builder.with_max_level(tracing::Level::ERROR);
    } else {
        match args.verbose {
            2.. => builder = builder.with_max_level(tracing::Level::TRACE),
            1 => builder = builder.with_max_level(tracing::Level::DEBUG),
            _ => builder = builder.with_max_level(tracing::Level::INFO),
        }
    }

    builder.init();
}

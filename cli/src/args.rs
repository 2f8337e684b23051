//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use vx_cipher::KeyFingerprint;

#[derive(Debug, Parser)]
#[command(
    name = "vx-cipher",
    version,
    about = "Encode, decode and inspect cipher envelopes"
)]
pub struct Cli {
    /// YAML config file (default: vx-cipher.yaml in the working directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build an envelope from base64-encoded fields and print it.
    Encode(FieldArgs),
    /// Print an envelope's four fields as base64 in JSON.
    Decode(EnvelopeArgs),
    /// Print wire version, field lengths and sender fingerprint as JSON.
    Inspect(EnvelopeArgs),
}

/// Envelope input shared by `decode` and `inspect`.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvelopeArgs {
    /// Envelope text. Read from stdin when omitted.
    pub envelope: Option<String>,

    /// Fail unless the envelope's public key has this fingerprint.
    #[arg(long, value_name = "FINGERPRINT")]
    pub expect_sender: Option<KeyFingerprint>,
}

/// Envelope fields, each in standard base64. Omitted fields are empty.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    #[arg(long, default_value = "")]
    pub ciphertext: String,
    #[arg(long, default_value = "")]
    pub public_key: String,
    #[arg(long, default_value = "")]
    pub mac: String,
    #[arg(long, default_value = "")]
    pub tag: String,
}

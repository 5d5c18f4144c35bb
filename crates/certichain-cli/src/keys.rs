//! # Keypairs
//!
//! A caller is identified by its Ed25519 verifying key. Keypairs live on
//! disk as two hex files: `<prefix>.key` (32-byte secret) and `<prefix>.pub`
//! (32-byte public key).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use certichain_core::PublicKey;

/// Paths and identity of a freshly generated keypair.
#[derive(Debug)]
pub struct GeneratedKeypair {
    pub secret_path: PathBuf,
    pub public_path: PathBuf,
    pub public_key: PublicKey,
}

/// Generate a keypair into `output_dir`. Refuses to overwrite an existing
/// secret key.
pub fn generate(output_dir: &Path, prefix: &str) -> Result<GeneratedKeypair> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;

    let secret_path = output_dir.join(format!("{prefix}.key"));
    let public_path = output_dir.join(format!("{prefix}.pub"));
    if secret_path.exists() {
        bail!("refusing to overwrite existing key: {}", secret_path.display());
    }

    let sk = SigningKey::generate(&mut OsRng);
    let public_key = PublicKey::from_bytes(sk.verifying_key().to_bytes());

    std::fs::write(&secret_path, bytes_to_hex(&sk.to_bytes()))
        .with_context(|| format!("failed to write private key: {}", secret_path.display()))?;
    std::fs::write(&public_path, public_key.to_hex())
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    tracing::info!(public_key = %public_key, path = %secret_path.display(), "generated keypair");
    Ok(GeneratedKeypair {
        secret_path,
        public_path,
        public_key,
    })
}

/// Load the caller identity from a secret key file.
pub fn load_identity(secret_path: &Path) -> Result<PublicKey> {
    let sk_hex = std::fs::read_to_string(secret_path).with_context(|| {
        format!(
            "failed to read private key: {} (run `certichain keygen` first)",
            secret_path.display()
        )
    })?;
    let sk_bytes = hex_to_bytes(sk_hex.trim()).context("invalid private key hex")?;
    let sk_arr: [u8; 32] = sk_bytes.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "private key must be 32 bytes (64 hex chars), got {} bytes",
            sk_bytes.len()
        )
    })?;
    let sk = SigningKey::from_bytes(&sk_arr);
    Ok(PublicKey::from_bytes(sk.verifying_key().to_bytes()))
}

/// Parse a public key given either as 64 hex chars or as a path to a
/// `.pub` file.
pub fn parse_public_key(arg: &str) -> Result<PublicKey> {
    if let Ok(key) = arg.parse::<PublicKey>() {
        return Ok(key);
    }
    let path = Path::new(arg);
    if path.is_file() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read public key: {}", path.display()))?;
        return content
            .trim()
            .parse::<PublicKey>()
            .map_err(|e| anyhow::anyhow!("invalid public key in {}: {e}", path.display()));
    }
    bail!("not a 64-char hex public key or a readable key file: {arg}")
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("hex string has odd length: {}", hex.len());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .with_context(|| format!("invalid hex at position {i}"))
        })
        .collect()
}

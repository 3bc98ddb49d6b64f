//! Read a key-pair document the way a consumer of `dhgen` does
//!
//! Run with:
//! ```bash
//! cargo run --example read_keypair -- path/to/keypair.json
//! ```
//!
//! Generates a fresh document first when no path is given.

use dhgen_core::csidh::{Csidh512, CsidhPublicKey};
use dhgen_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use dhgen_core::primitive::IsogenyDh;
use dhgen_core::{pipeline, Config, KeyPairDocument};
use rand::rngs::OsRng;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_with_config(LogConfig::new(LogLevel::Debug).with_target(true))?;

    let path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let config = Config::with_output_path(std::env::temp_dir().join("dhgen-demo.json"));
            pipeline::run(&config, Csidh512::new(), &mut OsRng)?;
            config.output.path
        }
    };

    let doc = KeyPairDocument::load(&path)?;
    info!(path = %path.display(), public = doc.dh_public(), "document loaded");

    // Loading never re-validates; a consumer that cares can do it explicitly.
    let csidh = Csidh512::new();
    let public = CsidhPublicKey::from_bytes(doc.public_bytes()?);
    let valid = csidh.validate_public_key(&public, &mut OsRng);
    info!(valid, "public key checked");

    Ok(())
}

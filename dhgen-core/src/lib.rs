//! One-shot CSIDH key-pair generation.
//!
//! A run samples a private key, derives and validates the public key, encodes
//! both as lowercase hex and commits them to a JSON document:
//!
//! ```no_run
//! use dhgen_core::{config::Config, csidh::Csidh512, pipeline};
//!
//! let config = Config::with_output_path("keypair.json");
//! let doc = pipeline::run(&config, Csidh512::new(), &mut rand::rngs::OsRng)?;
//! assert_eq!(doc.dh_public().len(), 128);
//! # Ok::<(), dhgen_core::Error>(())
//! ```
//!
//! The bundled CSIDH-512 arithmetic is variable-time research code. Anything
//! implementing [`primitive::IsogenyDh`] can replace it.

pub mod config;
pub mod csidh;
pub mod document;
pub mod error;
pub mod keygen;
pub mod logging;
pub mod pipeline;
pub mod primitive;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod writer;

pub use config::Config;
pub use document::KeyPairDocument;
pub use error::{Error, ErrorKind, Result};
pub use keygen::{GeneratedKeyPair, KeyPairGenerator, KeygenError, KeygenStep};
pub use logging::{init_logging, LogLevel};
pub use primitive::{IsogenyDh, PrimitiveError, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use writer::{KeyPairWriter, PersistenceError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        assert_eq!(PRIVATE_KEY_SIZE, 37);
        assert_eq!(PUBLIC_KEY_SIZE, 64);
    }
}

//! The one-shot run: generate, encode, persist.

use rand::TryCryptoRng;
use tracing::info;

use crate::config::{Config, OutputConfig};
use crate::document::KeyPairDocument;
use crate::error::Result;
use crate::keygen::KeyPairGenerator;
use crate::primitive::IsogenyDh;
use crate::writer::KeyPairWriter;

pub struct KeyPairPipeline<P> {
    generator: KeyPairGenerator<P>,
    writer: KeyPairWriter,
}

impl<P: IsogenyDh> KeyPairPipeline<P> {
    pub fn new(primitive: P, output: &OutputConfig) -> Self {
        Self {
            generator: KeyPairGenerator::new(primitive),
            writer: KeyPairWriter::from_config(output),
        }
    }

    pub fn generator(&self) -> &KeyPairGenerator<P> {
        &self.generator
    }

    pub fn writer(&self) -> &KeyPairWriter {
        &self.writer
    }

    /// Generate one validated pair and commit it. Nothing is written unless
    /// generation succeeds.
    pub fn run<R>(&self, rng: &mut R) -> Result<KeyPairDocument>
    where
        R: TryCryptoRng + ?Sized,
    {
        info!(
            primitive = self.generator.primitive().name(),
            output = %self.writer.path().display(),
            "generating key pair"
        );

        let doc = {
            let pair = self.generator.generate(rng)?;
            KeyPairDocument::from_pair(&pair)
        };

        self.writer.write(&doc)?;
        Ok(doc)
    }
}

/// Validate `config`, then run the pipeline once with `primitive`.
pub fn run<P, R>(config: &Config, primitive: P, rng: &mut R) -> Result<KeyPairDocument>
where
    P: IsogenyDh,
    R: TryCryptoRng + ?Sized,
{
    config.validate()?;
    KeyPairPipeline::new(primitive, &config.output).run(rng)
}

use anyhow::{Context, Result};
use clap::Parser;
use dhgen_core::config::{Config, DEFAULT_OUTPUT_FILE};
use dhgen_core::csidh::Csidh512;
use dhgen_core::error::FAILURE_EXIT_CODE;
use dhgen_core::logging::init_logging_with_config;
use dhgen_core::pipeline;
use rand::rngs::OsRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dhgen")]
#[command(author, version, about = "Generate a CSIDH-512 key pair and write it as JSON", long_about = None)]
struct Args {
    /// Where to write the key-pair document
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::with_output_path(args.output);

    init_logging_with_config(config.logging.to_log_config().with_target(false))?;

    let doc = pipeline::run(&config, Csidh512::new(), &mut OsRng)
        .with_context(|| format!("key generation into {} failed", config.output.path.display()))?;

    info!(
        output = %config.output.path.display(),
        public_prefix = &doc.dh_public()[..16],
        "done"
    );
    Ok(())
}

/// Status for a failed run, taken from the library error when there is one.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<dhgen_core::Error>()
        .map(dhgen_core::Error::exit_code)
        .unwrap_or(FAILURE_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhgen_core::config::ConfigError;

    #[test]
    fn test_exit_code_comes_from_library_error() {
        let err = anyhow::Error::new(dhgen_core::Error::from(ConfigError::EmptyOutputPath))
            .context("key generation failed");
        assert!(err.downcast_ref::<dhgen_core::Error>().is_some());
        assert_eq!(exit_code(&err), FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        assert_eq!(exit_code(&anyhow::anyhow!("logging already initialized")), FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_args_default_output() {
        let args = Args::try_parse_from(["dhgen"]).unwrap();
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert!(Args::try_parse_from(["dhgen", "a.json", "b.json"]).is_err());
    }
}

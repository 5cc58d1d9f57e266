//! balance CLI - local contrast enhancement
//!
//! Balance filter an image and save it as PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use imageops_balance::{
    BalanceError, BalanceFilter, BalanceParams, DEFAULT_MIX, DEFAULT_SIGMA, ImageIoError,
    NOMINAL_MIN_SIGMA, SampleImage,
};
use log::{info, warn};
use thiserror::Error;

const EXIT_USAGE: u8 = 1;
const EXIT_DECODE: u8 = 2;
const EXIT_ALLOCATION: u8 = 3;
const EXIT_ENCODE: u8 = 4;

/// Balance filter an image and save it as PNG
///
/// The image is blurred twice (sigma and 2 * sigma). The two blurred layers
/// are overlaid onto each other and onto the original, and the result is
/// mixed back into the original image.
#[derive(Parser, Debug)]
#[command(name = "balance")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Default strength:
        balance photo.jpg photo.balanced.png

    Wider neighbourhood, half-strength result:
        balance -s 25 -m 0.5 scan.png scan.balanced.png

Set RUST_LOG=debug to trace the individual filter stages.

EXIT CODES:
    0 - Success (or help displayed)
    1 - Bad usage
    2 - Input image could not be loaded
    3 - Not enough memory for the blur layers
    4 - Output image could not be saved

Help and version text are printed to stdout; errors go to stderr.")]
struct Cli {
    /// Input image (any format the decoder understands)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PNG file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// The sigma of the gauss normal distribution (number >= 0.5)
    ///
    /// Larger values result in a stronger blur.
    #[arg(short, long, default_value_t = DEFAULT_SIGMA, value_name = "SIGMA", allow_negative_numbers = true)]
    sigma: f32,

    /// The mixed coefficient (1.0 = fully processed, 0.0 = original)
    #[arg(short, long, default_value_t = DEFAULT_MIX, value_name = "MIX", allow_negative_numbers = true)]
    mix: f32,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid parameters: {0}")]
    Params(#[source] BalanceError),

    #[error(transparent)]
    Image(#[from] ImageIoError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Params(_) => EXIT_USAGE,
            Self::Image(
                ImageIoError::Decode { .. }
                | ImageIoError::UnsupportedLayout { .. }
                | ImageIoError::ChannelMismatch { .. }
                | ImageIoError::Balance(
                    BalanceError::EmptyImage { .. } | BalanceError::DimensionMismatch { .. },
                ),
            ) => EXIT_DECODE,
            Self::Image(ImageIoError::Balance(
                BalanceError::InvalidSigma { .. } | BalanceError::InvalidMix { .. },
            )) => EXIT_USAGE,
            Self::Image(ImageIoError::Balance(
                BalanceError::AllocationFailed { .. } | BalanceError::BufferCreationFailed,
            )) => EXIT_ALLOCATION,
            Self::Image(ImageIoError::Encode { .. }) => EXIT_ENCODE,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            err.print().ok();
            return ExitCode::from(code);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let params = BalanceParams::new(cli.sigma, cli.mix);
    let filter = BalanceFilter::from_params(params).map_err(CliError::Params)?;
    if params.is_below_nominal_sigma() {
        warn!(
            "sigma {} is below the nominal minimum of {NOMINAL_MIN_SIGMA}",
            params.sigma
        );
    }

    let mut image = SampleImage::open(&cli.input)?;
    let (width, height) = image.dimensions();
    info!(
        "{}: {width}x{height}, {} components, sigma={}, mix={}",
        cli.input.display(),
        image.components(),
        params.sigma,
        params.mix
    );

    image.balance_filter_mut(&filter)?;
    image.save_png(&cli.output)?;

    info!("saved {}", cli.output.display());
    Ok(())
}

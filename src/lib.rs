//! Rawfetch: stage the GTSDB and LISA traffic-sign datasets locally.
//!
//! Rawfetch downloads the German Traffic Sign Detection Benchmark from its
//! static archive URL and the LISA traffic light dataset through a dataset
//! hub client, unpacking both under a raw-data root next to a generated
//! README. Each dataset is skipped when its directory already exists.
//!
//! # Modules
//!
//! - [`downloader`]: The orchestrator tying every step together
//! - [`fetch`]: Blocking HTTP download and SHA-256 verification
//! - [`archive`]: Zip and tar extraction with member path validation
//! - [`hub`]: Dataset hub clients and their provisioning
//! - [`report`]: Per-run outcome report
//! - [`error`]: Error types for rawfetch operations

pub mod archive;
pub mod dataset;
pub mod downloader;
pub mod error;
pub mod fetch;
pub mod hub;
pub mod readme;
pub mod report;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub use downloader::Downloader;
pub use error::RawfetchError;

use dataset::{DirectDataset, HubDataset, GTSDB_URL, LISA_HUB_ID};
use fetch::Fetcher;
use hub::{DatasetHub, HubKind, KaggleHub, Provisioner};

/// The rawfetch CLI application.
#[derive(Parser)]
#[command(name = "rawfetch")]
#[command(version, about)]
struct Cli {
    /// Raw-data root that receives README.md and the dataset directories.
    #[arg(long, env = "RAWFETCH_ROOT", default_value = "data/raw")]
    root: PathBuf,

    /// Archive URL for GTSDB (e.g. a local mirror).
    #[arg(long, env = "RAWFETCH_GTSDB_URL", default_value = GTSDB_URL)]
    gtsdb_url: String,

    /// Expected SHA-256 of the GTSDB archive; unset skips verification.
    #[arg(long, value_name = "HEX")]
    gtsdb_sha256: Option<String>,

    /// Hub used for the LISA dataset.
    #[arg(long, value_enum, default_value_t = HubKind::Kaggle)]
    hub: HubKind,

    /// Dataset identifier passed to the hub.
    #[arg(long, default_value = LISA_HUB_ID)]
    hub_dataset: String,

    /// Python interpreter used to run kagglehub.
    #[arg(long, env = "RAWFETCH_PYTHON", default_value = "python3")]
    python: PathBuf,

    /// Cache directory for the Hugging Face hub (default: the hf-hub cache).
    #[arg(long, value_name = "DIR", env = "RAWFETCH_HF_CACHE")]
    hf_cache_dir: Option<PathBuf>,

    /// Hugging Face access token for gated or private datasets.
    #[arg(long, value_name = "TOKEN", env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,

    /// Do not try to install a missing hub client.
    #[arg(long)]
    no_provision: bool,

    /// Per-request network timeout in seconds (default: none).
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run the rawfetch CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RawfetchError> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!();
        eprintln!("Download interrupted by user.");
        std::process::exit(1);
    }) {
        warn!("could not install interrupt handler: {err}");
    }

    let downloader = build_downloader(&cli)?;
    let report = downloader.run()?;

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{report}"),
    }

    Ok(())
}

fn build_downloader(cli: &Cli) -> Result<Downloader, RawfetchError> {
    let fetcher = Fetcher::new(cli.timeout.map(Duration::from_secs));
    let direct = DirectDataset::new("GTSDB", cli.gtsdb_url.clone())
        .with_expected_sha256(cli.gtsdb_sha256.clone());
    let direct = if cli.gtsdb_url == GTSDB_URL {
        direct.with_manual_url(dataset::GTSDB_MANUAL_URL)
    } else {
        direct
    };

    let (hub, provisioners, manual_url): (Box<dyn DatasetHub>, Vec<Box<dyn Provisioner>>, String) =
        match cli.hub {
            HubKind::Kaggle => {
                let kaggle = KaggleHub::new(cli.python.clone());
                let provisioners = kaggle.default_provisioners();
                let manual_url = format!("https://www.kaggle.com/datasets/{}", cli.hub_dataset);
                (Box::new(kaggle), provisioners, manual_url)
            }
            #[cfg(feature = "hf")]
            HubKind::HuggingFace => {
                let manual_url = format!("https://huggingface.co/datasets/{}", cli.hub_dataset);
                let hf = hub::HuggingFaceHub::new()
                    .with_cache_dir(cli.hf_cache_dir.clone())
                    .with_token(cli.hf_token.clone());
                (Box::new(hf), Vec::new(), manual_url)
            }
            #[cfg(not(feature = "hf"))]
            HubKind::HuggingFace => {
                return Err(RawfetchError::Provisioning {
                    hub: "huggingface".to_string(),
                    message: "rawfetch was built without the 'hf' feature".to_string(),
                });
            }
        };

    let provisioners = if cli.no_provision {
        Vec::new()
    } else {
        provisioners
    };

    Ok(Downloader::new(cli.root.clone(), fetcher, hub)
        .with_provisioners(provisioners)
        .with_direct_dataset(direct)
        .with_hub_dataset(HubDataset::new("LISA", cli.hub_dataset.clone(), manual_url)))
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rawfetch={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

//! Command-line interface for the sodgen mock passport generator.
//!
//! Writes one JSON record per requested signature algorithm, using the
//! built-in sample MRZ and data group hashes unless overridden.

use clap::Parser;
use sodgen::{FixtureBuilder, SignatureAlgorithm, SigningKey};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sodgen")]
#[command(about = "Generate mock passport security object test vectors")]
struct Cli {
    /// Signature algorithm label (repeatable). Defaults to all supported algorithms:
    /// sha256WithRSAEncryption, sha1WithRSAEncryption, ecdsa-with-SHA256
    #[arg(short, long = "algorithm")]
    algorithms: Vec<String>,

    /// MRZ string (defaults to the built-in TD3 sample)
    #[arg(long)]
    mrz: Option<String>,

    /// Signing time as UTCTime, YYMMDDHHMMSSZ
    #[arg(long)]
    signing_time: Option<String>,

    /// Derive signing keys not given by --rsa-key/--ec-key from this seed
    #[arg(long)]
    seed: Option<u64>,

    /// RSA private key (PKCS#8 PEM) for the RSA algorithms
    #[arg(long)]
    rsa_key: Option<PathBuf>,

    /// secp256k1 private key (PKCS#8 PEM) for ecdsa-with-SHA256
    #[arg(long)]
    ec_key: Option<PathBuf>,

    /// Modulus size of generated RSA keys
    #[arg(long, default_value = "2048")]
    rsa_bits: usize,

    /// Include the contentType attribute in the signed attributes
    #[arg(long)]
    content_type_attr: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let algorithms = parse_algorithms(&cli.algorithms)?;
    let builder = configure(&cli)?;

    let records = builder.generate_all(&algorithms)?;
    let json = serde_json::to_string_pretty(&records)?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("Wrote {} record(s) to {}", records.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_algorithms(labels: &[String]) -> Result<Vec<SignatureAlgorithm>, sodgen::Error> {
    if labels.is_empty() {
        return Ok(SignatureAlgorithm::ALL.to_vec());
    }
    labels.iter().map(|label| label.parse()).collect()
}

fn configure(cli: &Cli) -> Result<FixtureBuilder, Box<dyn std::error::Error>> {
    let mut builder = FixtureBuilder::new()
        .rsa_bits(cli.rsa_bits)
        .content_type_attribute(cli.content_type_attr);

    if let Some(ref mrz) = cli.mrz {
        builder = builder.mrz(mrz.clone());
    }
    if let Some(ref time) = cli.signing_time {
        builder = builder.signing_time(time.clone());
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    if let Some(ref path) = cli.rsa_key {
        builder = builder.key(load_key(path, "rsa")?);
    }
    if let Some(ref path) = cli.ec_key {
        builder = builder.key(load_key(path, "secp256k1")?);
    }

    builder.validate()?;
    Ok(builder)
}

fn load_key(path: &Path, kind: &str) -> Result<SigningKey, Box<dyn std::error::Error>> {
    let pem = std::fs::read_to_string(path)?;
    SigningKey::from_pkcs8_pem(&pem)
        .and_then(|key| key.ensure_kind(kind))
        .map_err(|e| format!("{}: {}", path.display(), e).into())
}

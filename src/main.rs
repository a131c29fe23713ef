use clap::{Parser, ValueEnum};
use hashchain::chain::Chain;
use hashchain::logging::{init_logging, LogFormat};

const SAMPLE_PAYLOADS: [&str; 2] = ["Send 1 BTC to Ivan", "Send 2 more BTC to Ivan"];

#[derive(Parser)]
#[command(
    name = "hashchain",
    version,
    about = "Build a hash-linked chain of blocks and print it"
)]
struct Cli {
    /// Payloads to append after the genesis block (default: two sample transfers)
    payloads: Vec<String>,

    /// Output format for the block dump
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut chain = Chain::new();
    if cli.payloads.is_empty() {
        for payload in SAMPLE_PAYLOADS {
            chain.append(payload);
        }
    } else {
        for payload in &cli.payloads {
            chain.append(payload.as_str());
        }
    }
    chain.verify()?;
    tracing::info!(blocks = chain.len(), "chain built and verified");

    match cli.format {
        OutputFormat::Text => chain.write_text(&mut std::io::stdout().lock())?,
        OutputFormat::Json => println!("{}", chain.to_json()?),
    }
    Ok(())
}

use chrono::Utc;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use voi_round_analyzer::client::IndexerClient;
use voi_round_analyzer::pipeline::{analyze_with_deadline, fatal_message};
use voi_round_analyzer::report::Rendered;
use voi_round_analyzer::{Config, OutputMode, RoundRange};

#[derive(Parser, Debug)]
#[command(name = "voi-round-analyzer", version, about = "Voi Mainnet transaction analyzer")]
struct Cli {
    /// Start round (block)
    min_round: Option<String>,
    /// End round (block)
    max_round: Option<String>,
    #[arg(long, short, default_value = "summary", help = "summary (count) or detail (csv)")]
    output: String,
    #[arg(long, help = "Print the summary as JSON")]
    json: bool,
    #[arg(long, default_value = ".", help = "Directory for downloaded documents")]
    out: PathBuf,
    #[arg(long, help = "Indexer base URL (overrides VOI_INDEXER_URL)")]
    indexer: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.indexer {
        config.indexer_url = url.trim_end_matches('/').to_string();
    }
    let mode = OutputMode::from_param(Some(&cli.output));

    let range = match RoundRange::parse(cli.min_round.as_deref(), cli.max_round.as_deref()) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("Error: {}", fatal_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let client = IndexerClient::new(&config)?;
    let analysis = match analyze_with_deadline(&client, range, &config).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Analysis of rounds {} failed: {}", range, e);
            eprintln!("Error: {}", fatal_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    match analysis.render(mode, Utc::now())? {
        Rendered::Summary(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }
        Rendered::Export(doc) => {
            let path = doc.save_into(&cli.out)?;
            info!("Wrote {} ({})", path.display(), doc.content_type);
            println!("{}", path.display());
        }
        Rendered::FetchError(doc) => {
            let path = doc.save_into(&cli.out)?;
            eprintln!("Transaction fetch failed; details in {}", path.display());
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

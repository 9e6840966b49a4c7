use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::pipelines::{docs, reports, review};
use common::{logging, CiConfig};
use console::style;
use llm::{HfClient, TextGenerator};
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "windci")]
#[command(about = "CI automation for the wind load calculation project")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// AI code review over the source tree
    Review {
        /// Source root to review
        #[arg(long, default_value = "src")]
        source: PathBuf,
        /// Directory for the review artifacts
        #[arg(long, default_value = "code_reviews")]
        out: PathBuf,
    },
    /// Generate AI documentation for every source file
    Docs {
        /// Source root to document
        #[arg(long, default_value = "src")]
        source: PathBuf,
        /// Directory for the documentation artifacts
        #[arg(long, default_value = "docs")]
        out: PathBuf,
    },
    /// Generate the wind load calculation example reports
    Reports {
        /// Directory for the report artifacts
        #[arg(long, default_value = "reports")]
        out: PathBuf,
        /// Ask the inference service to write the report prose
        #[arg(long)]
        ai: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Review { source, out } => {
            let config = CiConfig::from_env()?;
            let client = HfClient::new(&config)?;
            println!("{}", style("AI code review - wind load project").bold());

            let mut opts = review::ReviewOptions::new(source, out);
            opts.ci_platform = config.ci_platform;
            let outcome = review::run(&client, &opts).await?;

            println!(
                "✅ Review complete: {} files reviewed, {} flagged",
                outcome.reviewed, outcome.flagged
            );
            for (path, reason) in &outcome.skipped {
                println!("❌ Skipped {}: {reason}", path.display());
            }
        }
        Commands::Docs { source, out } => {
            let config = CiConfig::from_env()?;
            let client = HfClient::new(&config)?;
            println!("{}", style("AI documentation - wind load project").bold());

            let opts = docs::DocsOptions::new(source, out);
            let outcome = docs::run(&client, &opts).await?;

            println!("✅ Documented {} files", outcome.documented);
            for (path, reason) in &outcome.skipped {
                println!("❌ Skipped {}: {reason}", path.display());
            }
        }
        Commands::Reports { out, ai } => {
            println!(
                "{}",
                style("Wind load calculation example generator").bold()
            );

            // This step must never block the workflow, so AI setup
            // failures fall back to the fixed template.
            let client = if ai {
                match CiConfig::from_env().map_err(anyhow::Error::from).and_then(|c| HfClient::new(&c)) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        warn!("AI reports unavailable, using templates: {e}");
                        None
                    }
                }
            } else {
                None
            };

            let opts = reports::ReportsOptions::new(out);
            let generator = client.as_ref().map(|c| c as &dyn TextGenerator);
            match reports::run(generator, &opts).await {
                Ok(outcome) => {
                    println!(
                        "✅ Generated {}/{} reports",
                        outcome.generated.len(),
                        outcome.generated.len() + outcome.failed
                    );
                }
                Err(e) => {
                    // Explicitly still exit zero.
                    error!("report generation failed: {e:#}");
                }
            }
        }
    }

    Ok(())
}

//! Diagnose command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::pipeline::Termination;
use crate::infrastructure::observability;

#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Assessment text (subjective + objective) to diagnose
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,

    /// Read the assessment from a file instead
    #[arg(short = 'f', long)]
    pub query_file: Option<PathBuf>,

    /// Override the configured retry budget
    #[arg(long)]
    pub retry_budget: Option<u32>,
}

/// Run one diagnosis and print the report
pub async fn run(args: DiagnoseArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    observability::init_logging(&config.logging);

    let main_query = read_query(&args)?;
    let retry_budget = args.retry_budget.unwrap_or(config.pipeline.retry_budget);

    let pipeline = crate::create_pipeline(&config)?;
    let outcome = pipeline.run_with_budget(&main_query, retry_budget).await?;

    println!("{}", outcome.report);

    match outcome.termination {
        Termination::Grounded => {
            info!(run_id = %outcome.run_id, "diagnosis verified against retrieved evidence");
        }
        Termination::RetryExhausted => {
            println!("Note: this report is not fully verified against the retrieved evidence.");
            if let Some(verification) = &outcome.verification {
                if !verification.summary.is_empty() {
                    println!("Verification summary: {}", verification.summary);
                }
                for hallucination in &verification.hallucinations {
                    println!("Unsupported statement: {}", hallucination.statement);
                }
            }
        }
    }

    Ok(())
}

fn read_query(args: &DiagnoseArgs) -> anyhow::Result<String> {
    if let Some(query) = &args.query {
        return Ok(query.clone());
    }

    if let Some(path) = &args.query_file {
        return std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e));
    }

    Err(anyhow::anyhow!(
        "provide the assessment with --query or --query-file"
    ))
}

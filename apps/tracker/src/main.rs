use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_tracker::config::Config;
use ats_tracker::models::requirement::RequirementDraft;
use ats_tracker::models::{CandidateId, RequirementId, StageId, StageStatus};
use ats_tracker::render::{render_capabilities, render_screening, render_tracker};
use ats_tracker::{TrackerController, TrackerError, TrackerSyncClient};

#[derive(Parser)]
#[command(name = "ats-tracker")]
#[command(about = "Candidate stage tracker for the ATS backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a candidate's progress across every tracked requirement
    Show { candidate: CandidateId },
    /// Set one stage's status and decision, then resync
    Update {
        candidate: CandidateId,
        requirement: RequirementId,
        stage: StageId,
        status: StageStatus,
        #[arg(long)]
        decision: Option<String>,
    },
    /// Run AI screening of a candidate against a requirement
    Screen {
        candidate: CandidateId,
        requirement: RequirementId,
    },
    /// Draft requirement fields from a job description file
    Autofill {
        #[arg(long)]
        jd_file: PathBuf,
    },
    /// List the screens and actions available to the configured role
    Capabilities,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_tracker={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let session = config.session();
    info!(
        "ats-tracker v{} as {} ({}) against {}",
        env!("CARGO_PKG_VERSION"),
        session.user().name,
        session.role(),
        config.api_base_url
    );

    let client = TrackerSyncClient::from_config(&config)?;
    let controller = TrackerController::new(Arc::new(client), session);

    match cli.command {
        Commands::Show { candidate } => {
            report(controller.open(candidate).await);
            print!("{}", render_tracker(&*controller.store().await));
        }
        Commands::Update {
            candidate,
            requirement,
            stage,
            status,
            decision,
        } => {
            controller.open(candidate).await?;
            match controller
                .update_stage(requirement, stage, status, decision)
                .await
            {
                Ok(receipt) => {
                    println!(
                        "{}",
                        receipt.ack.message.as_deref().unwrap_or("Stage update accepted")
                    );
                    if !receipt.resynced {
                        println!("Tracker could not be resynced; showing last known state.");
                    }
                }
                Err(e) => report::<()>(Err(e)),
            }
            print!("{}", render_tracker(&*controller.store().await));
        }
        Commands::Screen {
            candidate,
            requirement,
        } => {
            let result = controller.screen(candidate, requirement).await?;
            print!("{}", render_screening(&result));
        }
        Commands::Autofill { jd_file } => {
            let jd_text = std::fs::read_to_string(&jd_file)
                .with_context(|| format!("failed to read {}", jd_file.display()))?;
            let suggestion = controller.autofill_requirement(&jd_text).await?;
            let mut draft = RequirementDraft::default();
            draft.merge_suggestion(&suggestion);
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Commands::Capabilities => {
            let session = controller.session();
            println!("{} ({})", session.user().name, session.role().label());
            print!("{}", render_capabilities(session.capabilities()));
        }
    }

    Ok(())
}

/// Prints a failed operation's notice; the view printed afterwards still
/// reflects whatever state the store was left in.
fn report<T>(result: Result<T, TrackerError>) {
    if let Err(e) = result {
        let notice = e.notice();
        let hint = if notice.retryable { " (retry may help)" } else { "" };
        eprintln!("{}: {}{}", notice.code, notice.message, hint);
    }
}

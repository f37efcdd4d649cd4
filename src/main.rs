//! Prospect pipeline CLI - Move fund prospects from KYC invitation to investor

use clap::Parser;
use prospect_pipeline::cli::commands;
use prospect_pipeline::cli::{Cli, Commands};
use prospect_pipeline::errors::to_exit_code;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> prospect_pipeline::Result<()> {
    let cwd = cli.cwd.as_deref();
    let json = cli.json;
    match cli.command {
        Some(Commands::Init {
            force,
            fund_id,
            fund_name,
        }) => commands::init::run(cwd, force, fund_id, fund_name).await,
        Some(Commands::Invite(args)) => commands::invite::run(cwd, &args, json).await,
        Some(Commands::Register {
            prospect,
            kyc,
            submit,
        }) => commands::invite::run_register(cwd, &prospect, &kyc, submit, json).await,
        Some(Commands::List { status, fund }) => {
            commands::list::run(cwd, status, fund.as_deref(), json).await
        }
        Some(Commands::Show { id }) => commands::show::run(cwd, &id, json).await,
        Some(Commands::Advance { id }) => commands::advance::run(cwd, &id, json).await,
        Some(Commands::SubmitKyc { id, kyc }) => commands::kyc::run(cwd, &id, &kyc, json).await,
        Some(Commands::PreQualify { id, basis }) => {
            commands::kyc::run_pre_qualify(cwd, &id, basis, json).await
        }
        Some(Commands::Upload { id, files }) => {
            commands::documents::run_upload(cwd, &id, files, json).await
        }
        Some(Commands::ApproveDocs { id }) => commands::documents::run_approve(cwd, &id, json).await,
        Some(Commands::RejectDocs { id, reason }) => {
            commands::documents::run_reject(cwd, &id, &reason, json).await
        }
        Some(Commands::Convert { id, commitment }) => {
            commands::convert::run(cwd, &id, commitment, json).await
        }
        Some(Commands::Remind { id, kind }) => commands::remind::run(cwd, &id, kind, json).await,
        Some(Commands::Disqualify { id, notes }) => {
            commands::advance::run_disqualify(cwd, &id, notes, json).await
        }
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

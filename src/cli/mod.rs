//! CLI module for the prospect pipeline
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::email::ReminderKind;
use crate::schemas::ProspectStatus;

/// Prospect pipeline - Move fund prospects from KYC invitation to investor
#[derive(Parser, Debug)]
#[command(name = "prospect-pipeline")]
#[command(version)]
#[command(about = "Move fund prospects from KYC invitation to investor")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Who is being invited or registering
#[derive(Args, Debug, Clone)]
pub struct ProspectArgs {
    /// Contact email
    pub email: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Legal name; makes the prospect an entity
    #[arg(long)]
    pub entity: Option<String>,

    /// Person signing for the entity
    #[arg(long, requires = "entity")]
    pub signatory: Option<String>,

    /// Fund to add the prospect to (defaults to the configured fund)
    #[arg(long)]
    pub fund: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

/// Questionnaire answers
#[derive(Args, Debug, Clone, Default)]
pub struct KycArgs {
    /// Read the answers from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["basis", "investor_type"])]
    pub answers: Option<PathBuf>,

    /// Accreditation basis (repeatable)
    #[arg(long = "basis")]
    pub basis: Vec<String>,

    #[arg(long)]
    pub investor_type: Option<String>,

    /// Indicative commitment
    #[arg(long)]
    pub commitment: Option<Decimal>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the .prospects data directory in the current directory
    Init {
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,

        /// Fund id written to config.json
        #[arg(long)]
        fund_id: Option<String>,

        /// Fund display name written to config.json
        #[arg(long)]
        fund_name: Option<String>,
    },

    /// Invite a prospect and send the KYC invitation
    Invite(ProspectArgs),

    /// Register a prospect from the public form
    Register {
        #[command(flatten)]
        prospect: ProspectArgs,

        #[command(flatten)]
        kyc: KycArgs,

        /// Submit the questionnaire answers right away
        #[arg(long)]
        submit: bool,
    },

    /// List prospects
    List {
        /// Filter by status (kyc_sent, pre_qualified, documents_pending, ...)
        #[arg(long)]
        status: Option<ProspectStatus>,

        /// Filter by fund
        #[arg(long)]
        fund: Option<String>,
    },

    /// Show one prospect
    Show {
        /// Prospect ID
        id: String,
    },

    /// Move a prospect one step forward
    Advance {
        /// Prospect ID
        id: String,
    },

    /// Record the prospect's questionnaire answers
    SubmitKyc {
        /// Prospect ID
        id: String,

        #[command(flatten)]
        kyc: KycArgs,
    },

    /// Pre-qualify after reviewing the answers
    PreQualify {
        /// Prospect ID
        id: String,

        /// Extra accreditation basis (repeatable)
        #[arg(long = "basis")]
        basis: Vec<String>,
    },

    /// Upload documents (kind=file, e.g. identity=passport.pdf)
    Upload {
        /// Prospect ID
        id: String,

        #[arg(required = true, value_parser = commands::documents::parse_upload)]
        files: Vec<crate::schemas::DocumentUpload>,
    },

    /// Approve the pending documents
    ApproveDocs {
        /// Prospect ID
        id: String,
    },

    /// Reject the pending documents
    RejectDocs {
        /// Prospect ID
        id: String,

        /// Reason shown to the prospect
        #[arg(long)]
        reason: String,
    },

    /// Convert a signed prospect into an investor
    Convert {
        /// Prospect ID
        id: String,

        /// Committed capital
        #[arg(long)]
        commitment: Decimal,
    },

    /// Send a reminder (kyc or onboarding)
    Remind {
        /// Prospect ID
        id: String,

        kind: ReminderKind,
    },

    /// Mark a prospect not eligible
    Disqualify {
        /// Prospect ID
        id: String,

        #[arg(long)]
        notes: Option<String>,
    },
}

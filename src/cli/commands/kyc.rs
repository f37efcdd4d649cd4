//! Submit-kyc and pre-qualify commands

use std::path::Path;

use crate::cli::KycArgs;
use crate::errors::Result;
use crate::fs::read_json;
use crate::schemas::{CommercialIntent, KycSubmission};

use super::{open_pipeline, print_outcome};

/// Build the questionnaire answers from an answers file or from flags
pub fn kyc_from_args(args: &KycArgs) -> Result<KycSubmission> {
    if let Some(path) = &args.answers {
        return read_json(path);
    }
    Ok(KycSubmission {
        accreditation_bases: args.basis.iter().cloned().collect(),
        investor_type: args.investor_type.clone(),
        intent: CommercialIntent {
            indicative_commitment: args.commitment,
            ..Default::default()
        },
        ..Default::default()
    })
}

pub async fn run(cwd: Option<&Path>, id: &str, args: &KycArgs, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let kyc = kyc_from_args(args)?;
    let outcome = pipeline.submit_kyc(id, kyc).await?;
    print_outcome(&outcome, json)
}

pub async fn run_pre_qualify(
    cwd: Option<&Path>,
    id: &str,
    bases: Vec<String>,
    json: bool,
) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.pre_qualify(id, bases).await?;
    print_outcome(&outcome, json)
}

//! Invite and register commands - Bring a prospect into the pipeline

use std::path::Path;

use crate::cli::{KycArgs, ProspectArgs};
use crate::errors::Result;
use crate::pipeline::NewProspect;
use crate::schemas::Identity;

use super::kyc::kyc_from_args;
use super::{open_pipeline, print_outcome};

/// An entity when a legal name is given, otherwise an individual
pub fn new_prospect_from_args(args: &ProspectArgs) -> NewProspect {
    let identity = match &args.entity {
        Some(legal_name) => Identity::Entity {
            legal_name: Some(legal_name.clone()),
            signatory_name: args.signatory.clone(),
        },
        None => Identity::Individual {
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
        },
    };
    NewProspect {
        email: args.email.clone(),
        identity,
        fund_id: args.fund.clone(),
        investor_type: None,
        phone: args.phone.clone(),
        notes: args.notes.clone(),
    }
}

pub async fn run(cwd: Option<&Path>, args: &ProspectArgs, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.invite(new_prospect_from_args(args)).await?;
    print_outcome(&outcome, json)
}

pub async fn run_register(
    cwd: Option<&Path>,
    args: &ProspectArgs,
    kyc: &KycArgs,
    submit: bool,
    json: bool,
) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let answers = if submit { Some(kyc_from_args(kyc)?) } else { None };
    let outcome = pipeline
        .register(new_prospect_from_args(args), answers)
        .await?;
    print_outcome(&outcome, json)
}

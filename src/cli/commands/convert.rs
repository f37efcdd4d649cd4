//! Convert command - Turn a signed prospect into an investor

use std::path::Path;

use rust_decimal::Decimal;
use serde_json::json;

use crate::errors::Result;
use crate::pipeline::EmailDelivery;
use crate::schemas::ConversionInput;

use super::{open_pipeline, print_json};

pub async fn run(cwd: Option<&Path>, id: &str, commitment: Decimal, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline
        .convert_to_investor(
            id,
            ConversionInput {
                commitment_amount: commitment,
            },
        )
        .await?;

    if json {
        return print_json(&json!({
            "prospect": outcome.prospect,
            "investor": outcome.investor,
        }));
    }

    println!(
        "{} converted to investor {} (commitment {})",
        outcome.prospect.id, outcome.investor.id, outcome.investor.commitment_amount
    );
    if let EmailDelivery::Failed { intent, error } = &outcome.email {
        eprintln!("  warning: {} email not delivered: {}", intent.template, error);
    }
    Ok(())
}

//! Document commands - Upload, approve and reject validation documents

use std::path::Path;

use crate::errors::Result;
use crate::schemas::{DocumentKind, DocumentUpload};

use super::{open_pipeline, print_outcome};

/// Parse `kind=file_name`, e.g. `identity=passport.pdf`
pub fn parse_upload(arg: &str) -> std::result::Result<DocumentUpload, String> {
    let (kind, file_name) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected kind=file, got {:?}", arg))?;
    let kind: DocumentKind = kind.trim().parse()?;
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(format!("missing file name in {:?}", arg));
    }
    Ok(DocumentUpload::new(kind, file_name))
}

pub async fn run_upload(
    cwd: Option<&Path>,
    id: &str,
    files: Vec<DocumentUpload>,
    json: bool,
) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.upload_documents(id, files).await?;
    print_outcome(&outcome, json)
}

pub async fn run_approve(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.approve_documents(id).await?;
    print_outcome(&outcome, json)
}

pub async fn run_reject(cwd: Option<&Path>, id: &str, reason: &str, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.reject_documents(id, reason).await?;
    print_outcome(&outcome, json)
}

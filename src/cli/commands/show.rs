//! Show command - Show details of one prospect

use std::path::Path;

use crate::domain::get_allowed_next_states;
use crate::errors::Result;
use crate::schemas::Prospect;

use super::{open_pipeline, print_json};

/// Human-readable summary of a prospect
pub fn describe(prospect: &Prospect) -> String {
    let mut lines = vec![
        format!("ID:       {}", prospect.id),
        format!("Fund:     {}", prospect.fund_id),
        format!("Email:    {}", prospect.email),
        format!("Category: {}", prospect.category()),
    ];
    if let Some(name) = prospect.identity.display_name() {
        lines.push(format!("Name:     {}", name));
    }
    lines.push(format!("Status:   {}", prospect.status));

    let next: Vec<String> = get_allowed_next_states(prospect.status)
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !next.is_empty() {
        lines.push(format!("Next:     {}", next.join(", ")));
    }
    if !prospect.accreditation_bases.is_empty() {
        let bases: Vec<&str> = prospect.accreditation_bases.iter().map(String::as_str).collect();
        lines.push(format!("Bases:    {}", bases.join(", ")));
    }
    if let Some(reason) = &prospect.document_rejection_reason {
        lines.push(format!("Last rejection: {}", reason));
    }
    if let Some(investor_id) = &prospect.investor_id {
        lines.push(format!("Investor: {}", investor_id));
    }

    if !prospect.documents.is_empty() {
        lines.push("Documents:".to_string());
        for doc in &prospect.documents {
            lines.push(format!(
                "  [cycle {}] {} ({:?}) {}",
                doc.cycle, doc.file_name, doc.kind, doc.status
            ));
        }
    }
    if !prospect.email_log.is_empty() {
        lines.push("Emails:".to_string());
        for entry in &prospect.email_log {
            lines.push(format!("  {} {}", entry.sent_at.to_rfc3339(), entry.template));
        }
    }
    lines.join("\n")
}

pub async fn run(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let prospect = pipeline.get(id).await?;
    if json {
        return print_json(&prospect);
    }
    println!("{}", describe(&prospect));
    Ok(())
}

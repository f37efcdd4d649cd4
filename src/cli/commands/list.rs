//! List command - List prospects with optional filtering

use std::path::Path;

use crate::errors::Result;
use crate::schemas::{Prospect, ProspectStatus};

use super::{open_pipeline, print_json};

/// Keep prospects in `status`, or all of them
pub fn filter_by_status(prospects: Vec<Prospect>, status: Option<ProspectStatus>) -> Vec<Prospect> {
    match status {
        Some(status) => prospects.into_iter().filter(|p| p.status == status).collect(),
        None => prospects,
    }
}

pub async fn run(
    cwd: Option<&Path>,
    status: Option<ProspectStatus>,
    fund: Option<&str>,
    json: bool,
) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let prospects = filter_by_status(pipeline.list(fund).await?, status);

    if json {
        return print_json(&prospects);
    }
    if prospects.is_empty() {
        println!("No prospects");
        return Ok(());
    }
    for prospect in &prospects {
        println!(
            "{:<38} {:<22} {:<32} {}",
            prospect.id,
            prospect.status,
            prospect.email,
            prospect.identity.display_name().unwrap_or_default()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Identity, ProspectSource};
    use chrono::Utc;

    fn make(id: &str, status: ProspectStatus) -> Prospect {
        let mut prospect = Prospect::new(
            id.to_string(),
            "fund-a".to_string(),
            format!("{}@example.com", id),
            Identity::Individual {
                first_name: None,
                last_name: None,
            },
            ProspectSource::SelfRegistration,
            Utc::now(),
        );
        prospect.status = status;
        prospect
    }

    #[test]
    fn test_filter_by_status() {
        let prospects = vec![
            make("a", ProspectStatus::KycSent),
            make("b", ProspectStatus::DocumentsPending),
            make("c", ProspectStatus::KycSent),
        ];

        let pending = filter_by_status(prospects.clone(), Some(ProspectStatus::DocumentsPending));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "b");

        assert_eq!(filter_by_status(prospects, None).len(), 3);
    }
}

//! Validation rules for status transitions

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{PipelineError, Result, TransitionError};
use crate::schemas::{Prospect, ProspectStatus};

use super::states::{is_terminal_state, TRANSITIONS};

/// Decide whether `requested` is one legal step away from `current`.
///
/// Pure: the answer depends only on the two statuses.
pub fn validate_transition(
    current: ProspectStatus,
    requested: ProspectStatus,
) -> std::result::Result<(), TransitionError> {
    if is_terminal_state(current) {
        return Err(TransitionError::IllegalTransition { current, requested });
    }
    if requested == ProspectStatus::NotEligible {
        return Ok(());
    }
    if TRANSITIONS.contains(&(current, requested)) {
        Ok(())
    } else {
        Err(TransitionError::IllegalTransition { current, requested })
    }
}

/// Fail with InvalidState unless the prospect is in `required`.
pub fn require_status(
    prospect: &Prospect,
    required: ProspectStatus,
    operation: &'static str,
) -> Result<()> {
    if prospect.status != required {
        return Err(PipelineError::InvalidState {
            operation,
            required,
            actual: prospect.status,
        });
    }
    Ok(())
}

/// Validate entering the "pre_qualified" status
pub fn can_enter_pre_qualified(prospect: &Prospect) -> Result<()> {
    let has_basis = prospect
        .accreditation_bases
        .iter()
        .any(|basis| !basis.trim().is_empty());
    if !has_basis {
        return Err(PipelineError::Validation(
            "at least one accreditation basis is required to pre-qualify".to_string(),
        ));
    }
    Ok(())
}

/// Trim a free-text reason, rejecting blank input
pub fn normalize_reason(reason: &str) -> Result<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Lower-case and validate an email address
pub fn normalize_email(email: &str) -> Result<String> {
    let normalized = email.trim().to_lowercase();
    if !email_regex().is_match(&normalized) {
        return Err(PipelineError::Validation(format!(
            "invalid email address: {}",
            email
        )));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PROSPECT_STATUSES;
    use crate::schemas::{Identity, ProspectSource};
    use chrono::Utc;

    fn make_prospect(status: ProspectStatus) -> Prospect {
        let mut prospect = Prospect::new(
            "p-1".to_string(),
            "fund-a".to_string(),
            "ada@example.com".to_string(),
            Identity::Individual {
                first_name: Some("Ada".to_string()),
                last_name: None,
            },
            ProspectSource::ManagerInvite,
            Utc::now(),
        );
        prospect.status = status;
        prospect
    }

    #[test]
    fn test_validate_transition_forward_edges() {
        assert!(validate_transition(ProspectStatus::KycSent, ProspectStatus::KycSubmitted).is_ok());
        assert!(
            validate_transition(ProspectStatus::KycSubmitted, ProspectStatus::PreQualified).is_ok()
        );
        assert!(validate_transition(
            ProspectStatus::DocumentsRejected,
            ProspectStatus::DocumentsPending
        )
        .is_ok());
        assert!(
            validate_transition(ProspectStatus::DocusignSigned, ProspectStatus::Converted).is_ok()
        );
    }

    #[test]
    fn test_validate_transition_skip_is_illegal() {
        let result = validate_transition(ProspectStatus::KycSent, ProspectStatus::PreQualified);
        assert_eq!(
            result,
            Err(TransitionError::IllegalTransition {
                current: ProspectStatus::KycSent,
                requested: ProspectStatus::PreQualified,
            })
        );
    }

    #[test]
    fn test_validate_transition_backward_is_illegal() {
        assert!(
            validate_transition(ProspectStatus::MeetingComplete, ProspectStatus::PreQualified)
                .is_err()
        );
        assert!(
            validate_transition(ProspectStatus::DocumentsApproved, ProspectStatus::DocumentsPending)
                .is_err()
        );
    }

    #[test]
    fn test_validate_transition_self_loop_is_illegal() {
        for status in PROSPECT_STATUSES {
            if *status == ProspectStatus::NotEligible {
                continue;
            }
            assert!(
                validate_transition(*status, *status).is_err(),
                "{status} -> {status} should be illegal"
            );
        }
    }

    #[test]
    fn test_not_eligible_escape_from_every_non_terminal() {
        for status in PROSPECT_STATUSES {
            let result = validate_transition(*status, ProspectStatus::NotEligible);
            if is_terminal_state(*status) {
                assert!(result.is_err(), "{status} is terminal");
            } else {
                assert!(result.is_ok(), "{status} should allow not_eligible");
            }
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [ProspectStatus::Converted, ProspectStatus::NotEligible] {
            for requested in PROSPECT_STATUSES {
                assert!(validate_transition(terminal, *requested).is_err());
            }
        }
    }

    #[test]
    fn test_require_status() {
        let prospect = make_prospect(ProspectStatus::DocumentsApproved);
        assert!(require_status(&prospect, ProspectStatus::DocumentsApproved, "x").is_ok());

        let err = require_status(&prospect, ProspectStatus::DocumentsPending, "reject documents")
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidState {
                operation: "reject documents",
                required: ProspectStatus::DocumentsPending,
                actual: ProspectStatus::DocumentsApproved,
            }
        ));
    }

    #[test]
    fn test_can_enter_pre_qualified() {
        let mut prospect = make_prospect(ProspectStatus::KycSubmitted);
        assert!(matches!(
            can_enter_pre_qualified(&prospect),
            Err(PipelineError::Validation(_))
        ));

        prospect.accreditation_bases.insert("   ".to_string());
        assert!(can_enter_pre_qualified(&prospect).is_err());

        prospect.accreditation_bases.insert("income_200k".to_string());
        assert!(can_enter_pre_qualified(&prospect).is_ok());
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason("  blurry scan ").unwrap(), "blurry scan");
        assert!(matches!(normalize_reason(""), Err(PipelineError::Validation(_))));
        assert!(matches!(normalize_reason(" \t\n"), Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(" Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("two@@example.com").is_err());
        assert!(normalize_email("").is_err());
    }
}

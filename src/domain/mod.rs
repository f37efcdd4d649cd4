//! Domain logic for the prospect status machine, document review and conversion

mod conversion;
mod documents;
mod states;
mod transitions;
mod validation;


pub use conversion::{can_convert_to_investor, complete_conversion, prepare_investor_conversion};
pub use documents::{approve_documents, can_approve_documents, reject_documents, submit_documents};
pub use states::{
    get_allowed_next_states, get_next_state, is_terminal_state, PROSPECT_STATUSES, TRANSITIONS,
};
pub use transitions::{apply_transition, TransitionFields};
pub use validation::{
    can_enter_pre_qualified, normalize_email, normalize_reason, require_status,
    validate_transition,
};

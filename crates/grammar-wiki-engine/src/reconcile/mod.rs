//! The two reconciliation passes: forward links, then backlinks.
//!
//! A full run is [`reconcile_forward`] followed by [`reconcile_backlinks`] on
//! the same corpus, so the backlink pass sees any links the first pass fixed.

pub mod backlinks;
pub mod forward;
pub mod reverse_index;

pub use backlinks::{BacklinkReconciler, BacklinkReport, BacklinkSummary, reconcile_backlinks};
pub use forward::{
    ForwardIssue, ForwardReconciler, ForwardReport, ForwardSummary, apply_replacements,
    reconcile_forward,
};
pub use reverse_index::{DanglingLink, ReverseIndex};

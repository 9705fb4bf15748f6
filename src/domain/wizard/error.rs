//! Wizard engine error types.

use thiserror::Error;

use crate::domain::foundation::UserId;

/// Terminal outcomes of a pending dialog, other than an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The dialog was cancelled explicitly or expired without an answer.
    ///
    /// The two are deliberately indistinguishable to the caller: both mean
    /// no more input is coming.
    #[error("dialog was cancelled before an answer arrived")]
    Cancelled,

    /// A dialog was requested for a user who already has one pending.
    ///
    /// Callers serialize command invocations per user, so hitting this is a
    /// programming error, not a runtime condition to recover from.
    #[error("user `{user_id}` already has an active dialog")]
    AlreadyActive { user_id: UserId },
}

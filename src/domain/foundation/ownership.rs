//! Ownership trait for user-owned records.
//!
//! Ownership is checked at the data layer on every access. A record owned by
//! someone else is reported exactly like a missing one, so the check returns
//! a plain `bool` and callers turn a mismatch into their own not-found error.

use super::UserId;

/// Records that have exactly one, immutable owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this record.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }
}

//! Message sequence manager.
//!
//! Pure functions over the embedded message list. They never mutate their
//! input: each returns the complete sequence to be written back, so the
//! caller can persist it in one replace call.
//!
//! # Invariants
//!
//! - Existing entries keep their relative order
//! - Appended entries go last
//! - Message ids are unique within a sequence

use crate::domain::foundation::{MessageId, Timestamp};

use super::message::{Message, MessageDraft};

/// Appends a new message built from `draft`.
///
/// Returns the new message and the full resulting sequence.
pub fn append(current: &[Message], draft: MessageDraft, at: Timestamp) -> (Message, Vec<Message>) {
    let id = fresh_id(current);
    let message = draft.into_message(id, at);

    let mut next = Vec::with_capacity(current.len() + 1);
    next.extend_from_slice(current);
    next.push(message.clone());

    (message, next)
}

/// Removes the message with the given id.
///
/// Returns `None` when no message matches, leaving the caller free to report
/// a not-found error without writing anything.
pub fn remove(current: &[Message], id: &MessageId) -> Option<Vec<Message>> {
    let position = current.iter().position(|m| &m.id == id)?;

    let mut next = current.to_vec();
    next.remove(position);
    Some(next)
}

fn fresh_id(current: &[Message]) -> MessageId {
    loop {
        let id = MessageId::generate();
        if !current.iter().any(|m| m.id == id) {
            return id;
        }
    }
}

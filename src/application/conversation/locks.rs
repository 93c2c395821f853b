//! Per-conversation write serialization.
//!
//! Mutations read the current record, compute the new one, then write it
//! back. Two writers interleaving on the same conversation would lose one
//! update, so every mutation holds the conversation's lock for the whole
//! read-modify-write. Different conversations never contend.
//!
//! The guarantee is process-local. Writers in other processes sharing the
//! same backend are still last-write-wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationId;

/// Keyed async mutexes, one per conversation currently being written.
///
/// Slots are held weakly and pruned once no task holds or awaits them.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    slots: Mutex<HashMap<ConversationId, Weak<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access to one conversation.
    pub async fn acquire(&self, id: &ConversationId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.retain(|_, slot| slot.strong_count() > 0);

            match slots.get(id).and_then(Weak::upgrade) {
                Some(slot) => slot,
                None => {
                    let slot = Arc::new(AsyncMutex::new(()));
                    slots.insert(id.clone(), Arc::downgrade(&slot));
                    slot
                }
            }
        };

        slot.lock_owned().await
    }

    /// Number of conversations with a live lock slot.
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }
}

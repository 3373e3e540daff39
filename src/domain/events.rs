//! State-change events and the subscription contract.
//!
//! Consumers that need to react to session or conversation changes register
//! a callback instead of polling; emitters call `Subscribers::emit` after
//! the state transition is complete.

use crate::domain::message::ChannelRef;

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An identity became live. `degraded` marks an unverified offline
    /// session, never a confirmed login.
    Established { degraded: bool },
    /// The user ended the session.
    LoggedOut,
    /// The backend rejected the credential; the session was torn down.
    Expired,
}

/// Conversation state notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A full history load replaced the conversation.
    Loaded { channel: ChannelRef },
    /// A completed load arrived for a channel that is no longer current.
    LoadDiscarded { channel: ChannelRef },
    /// A sent message was appended at the tail.
    Appended { message_id: i64 },
}

/// A plain subscriber registry. Emission order is registration order.
pub struct Subscribers<E> {
    listeners: Vec<Box<dyn Fn(&E)>>,
}

impl<E> Subscribers<E> {
    pub fn subscribe(&mut self, listener: impl Fn(&E) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

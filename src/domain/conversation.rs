use crate::domain::{
    events::{ConversationEvent, Subscribers},
    group::Group,
    message::{ChannelRef, Message},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationPhase {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed,
}

/// Proof that a load was started for a specific channel at a specific
/// generation. A completion carrying a stale ticket is discarded: switching
/// channels mid-load must never splice the abandoned channel's history into
/// the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    channel: ChannelRef,
    generation: u64,
}

/// Ordered message history for exactly one channel.
///
/// Messages keep the order they were loaded in, followed by the order they
/// were appended in; no re-sort by timestamp happens at any point.
#[derive(Debug, Default)]
pub struct Conversation {
    channel: Option<ChannelRef>,
    group: Option<Group>,
    messages: Vec<Message>,
    phase: ConversationPhase,
    generation: u64,
    subscribers: Subscribers<ConversationEvent>,
}

impl Conversation {
    pub fn channel(&self) -> Option<ChannelRef> {
        self.channel
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_ready(&self) -> bool {
        self.phase == ConversationPhase::Ready
    }

    pub fn subscribe(&mut self, listener: impl Fn(&ConversationEvent) + 'static) {
        self.subscribers.subscribe(listener);
    }

    /// Starts a load for `channel`, discarding whatever was held before.
    /// The returned ticket must accompany the completion.
    pub fn begin_load(&mut self, channel: ChannelRef) -> LoadTicket {
        self.generation += 1;
        self.channel = Some(channel);
        self.group = None;
        self.messages.clear();
        self.phase = ConversationPhase::Loading;

        LoadTicket {
            channel,
            generation: self.generation,
        }
    }

    /// Applies a completed load. Returns false (and changes nothing) when
    /// the ticket is stale, i.e. another `begin_load` happened in between.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        group: Option<Group>,
        messages: Vec<Message>,
    ) -> bool {
        if ticket.generation != self.generation {
            self.subscribers.emit(&ConversationEvent::LoadDiscarded {
                channel: ticket.channel,
            });
            return false;
        }

        self.group = group;
        self.messages = messages;
        self.phase = ConversationPhase::Ready;
        self.subscribers.emit(&ConversationEvent::Loaded {
            channel: ticket.channel,
        });
        true
    }

    /// Marks the current load as failed. Stale tickets are ignored here too.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.phase = ConversationPhase::Failed;
        true
    }

    /// Appends an acknowledged message at the tail.
    pub fn append(&mut self, message: Message) {
        let message_id = message.id;
        self.messages.push(message);
        self.subscribers
            .emit(&ConversationEvent::Appended { message_id });
    }
}

//! Conversation workflows: loading a channel's history and composing
//! messages, shared by group chat and direct messaging.

use chrono::Utc;
use thiserror::Error;

use crate::{
    domain::{
        conversation::Conversation,
        group::Group,
        identity::Identity,
        message::{ChannelRef, Message},
    },
    usecases::upload::{upload_attachment, ResourceUploader, UploadError, UploadRequest},
};

/// Errors reported by the history endpoints, as seen at the source level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySourceError {
    Unauthorized,
    Unavailable { message: String },
    ChannelNotFound,
    InvalidData { message: String },
}

pub trait ChannelHistorySource {
    fn fetch_group(&self, group_id: i64) -> Result<Group, HistorySourceError>;
    fn list_group_messages(&self, group_id: i64) -> Result<Vec<Message>, HistorySourceError>;
    fn list_direct_messages(
        &self,
        viewer_id: i64,
        peer_id: i64,
    ) -> Result<Vec<Message>, HistorySourceError>;
}

impl<T: ChannelHistorySource + ?Sized> ChannelHistorySource for &T {
    fn fetch_group(&self, group_id: i64) -> Result<Group, HistorySourceError> {
        (*self).fetch_group(group_id)
    }

    fn list_group_messages(&self, group_id: i64) -> Result<Vec<Message>, HistorySourceError> {
        (*self).list_group_messages(group_id)
    }

    fn list_direct_messages(
        &self,
        viewer_id: i64,
        peer_id: i64,
    ) -> Result<Vec<Message>, HistorySourceError> {
        (*self).list_direct_messages(viewer_id, peer_id)
    }
}

/// Errors reported by the message-creation endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitSourceError {
    Unauthorized,
    Unavailable { message: String },
    Rejected { detail: String },
}

pub trait MessageSubmitter {
    /// Submits a group message and returns the acknowledged message id.
    fn submit_group_message(
        &self,
        group_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError>;

    /// Submits a direct message and returns the acknowledged message id.
    fn submit_direct_message(
        &self,
        receiver_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError>;
}

impl<T: MessageSubmitter + ?Sized> MessageSubmitter for &T {
    fn submit_group_message(
        &self,
        group_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError> {
        (*self).submit_group_message(group_id, content, resource_id)
    }

    fn submit_direct_message(
        &self,
        receiver_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError> {
        (*self).submit_direct_message(receiver_id, content, resource_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("not authorized to read this channel")]
    Unauthorized,
    #[error("channel history is unavailable: {message}")]
    TemporarilyUnavailable { message: String },
    #[error("channel does not exist")]
    ChannelNotFound,
    #[error("channel history is malformed: {message}")]
    DataContract { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("no conversation is open")]
    NoActiveConversation,
    #[error("message has no text and no file")]
    EmptyDraft,
    #[error(transparent)]
    Upload(UploadError),
    #[error("not authorized to send to this channel")]
    Unauthorized,
    #[error("message service is unavailable: {message}")]
    TemporarilyUnavailable { message: String },
    #[error("message rejected: {detail}")]
    Rejected { detail: String },
}

/// What the user composed. The caller owns the draft: it is never cleared
/// here, so a failed send can be retried as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: String,
    pub file: Option<UploadRequest>,
}

/// Fetches channel metadata (groups only) and full history, replacing
/// whatever the conversation held before. A completion that lost the race
/// against a newer load is discarded by the conversation itself.
pub fn load_conversation(
    source: &dyn ChannelHistorySource,
    viewer: &Identity,
    conversation: &mut Conversation,
    channel: ChannelRef,
) -> Result<(), LoadError> {
    let ticket = conversation.begin_load(channel);

    let fetched = match channel {
        ChannelRef::Group { group_id } => source.fetch_group(group_id).and_then(|group| {
            source
                .list_group_messages(group_id)
                .map(|messages| (Some(group), messages))
        }),
        ChannelRef::Direct { peer_id } => source
            .list_direct_messages(viewer.id, peer_id)
            .map(|messages| (None, messages)),
    };

    match fetched {
        Ok((group, messages)) => {
            conversation.complete_load(ticket, group, messages);
            Ok(())
        }
        Err(error) => {
            conversation.fail_load(ticket);
            Err(map_history_error(error))
        }
    }
}

/// Composes one message: uploads the attachment first when one is present,
/// then submits, then appends the acknowledged message at the tail. An
/// upload failure aborts the send entirely; a text-only message is never
/// sent as a silent substitute.
pub fn send_message(
    submitter: &dyn MessageSubmitter,
    uploader: &dyn ResourceUploader,
    conversation: &mut Conversation,
    sender: &Identity,
    draft: &MessageDraft,
) -> Result<Message, SendError> {
    let Some(channel) = conversation.channel() else {
        return Err(SendError::NoActiveConversation);
    };

    let text = draft.text.trim();
    if text.is_empty() && draft.file.is_none() {
        return Err(SendError::EmptyDraft);
    }

    let attachment = match &draft.file {
        Some(request) => Some(upload_attachment(uploader, request).map_err(SendError::Upload)?),
        None => None,
    };

    let resource_id = attachment.as_ref().map(|a| a.resource_id);
    let message_id = match channel {
        ChannelRef::Group { group_id } => {
            submitter.submit_group_message(group_id, text, resource_id)
        }
        ChannelRef::Direct { peer_id } => {
            submitter.submit_direct_message(peer_id, text, resource_id)
        }
    }
    .map_err(map_submit_error)?;

    let message = Message {
        id: message_id,
        content: text.to_owned(),
        sender_id: Some(sender.id),
        sender_username: sender.username.clone(),
        attachment,
        created_at: Utc::now(),
        channel,
    };

    conversation.append(message.clone());
    Ok(message)
}

fn map_history_error(error: HistorySourceError) -> LoadError {
    match error {
        HistorySourceError::Unauthorized => LoadError::Unauthorized,
        HistorySourceError::Unavailable { message } => {
            LoadError::TemporarilyUnavailable { message }
        }
        HistorySourceError::ChannelNotFound => LoadError::ChannelNotFound,
        HistorySourceError::InvalidData { message } => LoadError::DataContract { message },
    }
}

fn map_submit_error(error: SubmitSourceError) -> SendError {
    match error {
        SubmitSourceError::Unauthorized => SendError::Unauthorized,
        SubmitSourceError::Unavailable { message } => {
            SendError::TemporarilyUnavailable { message }
        }
        SubmitSourceError::Rejected { detail } => SendError::Rejected { detail },
    }
}

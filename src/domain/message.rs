use chrono::{DateTime, Utc};

/// The channel a conversation is bound to: a study group or a single peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRef {
    Group { group_id: i64 },
    Direct { peer_id: i64 },
}

impl ChannelRef {
    pub fn describe(&self) -> String {
        match self {
            ChannelRef::Group { group_id } => format!("group {group_id}"),
            ChannelRef::Direct { peer_id } => format!("direct({peer_id})"),
        }
    }
}

/// A remote resource attached to a message. Referenced, never owned: the
/// resource itself lives in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub resource_id: i64,
    pub title: String,
}

/// One message in a conversation. Immutable once created; ordering within a
/// conversation is insertion order, never timestamp order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sender_id: Option<i64>,
    pub sender_username: String,
    pub attachment: Option<AttachmentRef>,
    pub created_at: DateTime<Utc>,
    pub channel: ChannelRef,
}

impl Message {
    /// Returns the display content: text plus an attachment marker, or just
    /// the marker for attachment-only messages.
    pub fn display_content(&self) -> String {
        match (&self.attachment, self.content.is_empty()) {
            (Some(attachment), true) => format!("[{}]", attachment.title),
            (Some(attachment), false) => format!("{} [{}]", self.content, attachment.title),
            (None, _) => self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(content: &str, attachment: Option<AttachmentRef>) -> Message {
        Message {
            id: 1,
            content: content.to_owned(),
            sender_id: Some(7),
            sender_username: "ada".to_owned(),
            attachment,
            created_at: DateTime::<Utc>::MIN_UTC,
            channel: ChannelRef::Group { group_id: 3 },
        }
    }

    #[test]
    fn display_content_returns_text_when_no_attachment() {
        assert_eq!(msg("Hello", None).display_content(), "Hello");
    }

    #[test]
    fn display_content_returns_marker_only_when_text_empty() {
        let attachment = AttachmentRef {
            resource_id: 5,
            title: "notes.pdf".to_owned(),
        };

        assert_eq!(msg("", Some(attachment)).display_content(), "[notes.pdf]");
    }

    #[test]
    fn display_content_combines_text_and_attachment_marker() {
        let attachment = AttachmentRef {
            resource_id: 5,
            title: "notes.pdf".to_owned(),
        };

        assert_eq!(
            msg("Check this out", Some(attachment)).display_content(),
            "Check this out [notes.pdf]"
        );
    }

    #[test]
    fn channel_describe_labels_both_variants() {
        assert_eq!(ChannelRef::Group { group_id: 9 }.describe(), "group 9");
        assert_eq!(ChannelRef::Direct { peer_id: 4 }.describe(), "direct(4)");
    }
}

//! Wire shapes of the backend API and their mapping onto domain types.
//!
//! The backend serializes timestamps as naive ISO-8601; `parse_timestamp`
//! accepts both that and proper RFC 3339 with an offset.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    group::Group,
    identity::{Identity, Peer},
    message::{AttachmentRef, ChannelRef, Message},
    resource::Resource,
};

/// Display name used when the wire format carries an attachment id but no
/// title (direct-message history does this).
const UNTITLED_ATTACHMENT: &str = "shared resource";

// --- request bodies ---

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GroupMessageRequest<'a> {
    pub content: &'a str,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DirectMessageRequest<'a> {
    pub content: &'a str,
    pub receiver_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResourcePatchRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
}

// --- response bodies ---

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
}

impl UserDto {
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
        }
    }

    pub fn into_peer(self) -> Peer {
        Peer {
            id: self.id,
            username: self.username,
            full_name: self.full_name,
            field_of_study: self.field_of_study,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct MessageAck {
    pub message_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GroupDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub member_count: usize,
}

impl GroupDto {
    pub fn into_group(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            created_by: self.created_by,
            member_count: self.member_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupAck {
    pub group: CreatedGroupDto,
}

#[derive(Debug, Deserialize)]
pub struct CreatedGroupDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupMessageDto {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    pub sender: String,
    pub resource_id: Option<i64>,
    pub resource_title: Option<String>,
    pub created_at: String,
}

impl GroupMessageDto {
    pub fn into_message(self, group_id: i64) -> Result<Message, String> {
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("unparseable timestamp {:?}", self.created_at))?;

        Ok(Message {
            id: self.id,
            content: self.content,
            sender_id: None,
            sender_username: self.sender,
            attachment: self.resource_id.map(|resource_id| AttachmentRef {
                resource_id,
                title: self
                    .resource_title
                    .unwrap_or_else(|| UNTITLED_ATTACHMENT.to_owned()),
            }),
            created_at,
            channel: ChannelRef::Group { group_id },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectMessageDto {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    pub sender_id: i64,
    pub sender_username: String,
    pub resource_id: Option<i64>,
    pub created_at: String,
}

impl DirectMessageDto {
    pub fn into_message(self, peer_id: i64) -> Result<Message, String> {
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("unparseable timestamp {:?}", self.created_at))?;

        Ok(Message {
            id: self.id,
            content: self.content,
            sender_id: Some(self.sender_id),
            sender_username: self.sender_username,
            attachment: self.resource_id.map(|resource_id| AttachmentRef {
                resource_id,
                title: UNTITLED_ATTACHMENT.to_owned(),
            }),
            created_at,
            channel: ChannelRef::Direct { peer_id },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ResourceDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub uploader: String,
    pub created_at: String,
}

impl ResourceDto {
    pub fn into_resource(self) -> Result<Resource, String> {
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("unparseable timestamp {:?}", self.created_at))?;

        Ok(Resource {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            file_name: self.file_name,
            file_size: self.file_size,
            download_count: self.download_count,
            uploader: self.uploader,
            created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadAck {
    pub resource: UploadedResourceDto,
}

#[derive(Debug, Deserialize)]
pub struct UploadedResourceDto {
    pub id: i64,
    pub title: String,
}

impl UploadAck {
    pub fn into_attachment_ref(self) -> AttachmentRef {
        AttachmentRef {
            resource_id: self.resource.id,
            title: self.resource.title,
        }
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

use crate::{
    api::{
        transport::{error_detail, TransportError},
        wire::{DirectMessageDto, DirectMessageRequest, GroupDto, GroupMessageDto,
               GroupMessageRequest, MessageAck},
        ApiClient,
    },
    domain::{group::Group, message::Message},
    usecases::conversation::{
        ChannelHistorySource, HistorySourceError, MessageSubmitter, SubmitSourceError,
    },
};

impl ChannelHistorySource for ApiClient {
    fn fetch_group(&self, group_id: i64) -> Result<Group, HistorySourceError> {
        let dto: GroupDto = self
            .transport()
            .get_json(&format!("/api/groups/{group_id}"), &[])
            .map_err(map_history_error)?;

        Ok(dto.into_group())
    }

    fn list_group_messages(&self, group_id: i64) -> Result<Vec<Message>, HistorySourceError> {
        let dtos: Vec<GroupMessageDto> = self
            .transport()
            .get_json("/api/messages", &[("group_id", group_id.to_string())])
            .map_err(map_history_error)?;

        dtos.into_iter()
            .map(|dto| {
                dto.into_message(group_id)
                    .map_err(|message| HistorySourceError::InvalidData { message })
            })
            .collect()
    }

    fn list_direct_messages(
        &self,
        viewer_id: i64,
        peer_id: i64,
    ) -> Result<Vec<Message>, HistorySourceError> {
        let dtos: Vec<DirectMessageDto> = self
            .transport()
            .get_json(
                "/api/direct-messages",
                &[
                    ("sender_id", viewer_id.to_string()),
                    ("receiver_id", peer_id.to_string()),
                ],
            )
            .map_err(map_history_error)?;

        dtos.into_iter()
            .map(|dto| {
                dto.into_message(peer_id)
                    .map_err(|message| HistorySourceError::InvalidData { message })
            })
            .collect()
    }
}

impl MessageSubmitter for ApiClient {
    fn submit_group_message(
        &self,
        group_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError> {
        let ack: MessageAck = self
            .transport()
            .post_json(
                "/api/messages",
                &GroupMessageRequest {
                    content,
                    group_id,
                    resource_id,
                },
            )
            .map_err(map_submit_error)?;

        Ok(ack.message_id)
    }

    fn submit_direct_message(
        &self,
        receiver_id: i64,
        content: &str,
        resource_id: Option<i64>,
    ) -> Result<i64, SubmitSourceError> {
        let ack: MessageAck = self
            .transport()
            .post_json(
                "/api/direct-messages",
                &DirectMessageRequest {
                    content,
                    receiver_id,
                    resource_id,
                },
            )
            .map_err(map_submit_error)?;

        Ok(ack.message_id)
    }
}

fn map_history_error(error: TransportError) -> HistorySourceError {
    match error {
        TransportError::Unauthorized => HistorySourceError::Unauthorized,
        TransportError::Network { message } => HistorySourceError::Unavailable { message },
        TransportError::Status { status: 404, .. } => HistorySourceError::ChannelNotFound,
        TransportError::Status { status, body } => HistorySourceError::Unavailable {
            message: format!("status {status}: {}", error_detail(&body)),
        },
        TransportError::Decode { message } => HistorySourceError::InvalidData { message },
    }
}

fn map_submit_error(error: TransportError) -> SubmitSourceError {
    match error {
        TransportError::Unauthorized => SubmitSourceError::Unauthorized,
        TransportError::Network { message } => SubmitSourceError::Unavailable { message },
        TransportError::Status { status, body } if status < 500 => SubmitSourceError::Rejected {
            detail: error_detail(&body),
        },
        TransportError::Status { status, body } => SubmitSourceError::Unavailable {
            message: format!("status {status}: {}", error_detail(&body)),
        },
        TransportError::Decode { message } => SubmitSourceError::Rejected {
            detail: format!("malformed response: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_group_maps_to_channel_not_found() {
        let err = map_history_error(TransportError::Status {
            status: 404,
            body: String::new(),
        });

        assert_eq!(err, HistorySourceError::ChannelNotFound);
    }

    #[test]
    fn submit_client_errors_map_to_rejected_with_detail() {
        let err = map_submit_error(TransportError::Status {
            status: 400,
            body: r#"{"errors": {"content": "Message content or resource is required"}}"#
                .to_owned(),
        });

        assert_eq!(
            err,
            SubmitSourceError::Rejected {
                detail: "content: Message content or resource is required".to_owned()
            }
        );
    }

    #[test]
    fn submit_server_errors_map_to_unavailable() {
        let err = map_submit_error(TransportError::Status {
            status: 502,
            body: String::new(),
        });

        assert!(matches!(err, SubmitSourceError::Unavailable { .. }));
    }
}

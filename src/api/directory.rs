use crate::{
    api::{
        transport::{error_detail, TransportError},
        wire::{CreateGroupAck, CreateGroupRequest, GroupDto, UserDto},
        ApiClient,
    },
    domain::{group::Group, identity::Peer},
    usecases::directory::{
        CreatedGroup, DirectorySourceError, GroupDirectory, PeerDirectory,
    },
};

impl GroupDirectory for ApiClient {
    fn list_groups(&self) -> Result<Vec<Group>, DirectorySourceError> {
        let dtos: Vec<GroupDto> = self
            .transport()
            .get_json("/api/groups", &[])
            .map_err(map_directory_error)?;

        Ok(dtos.into_iter().map(GroupDto::into_group).collect())
    }

    fn create_group(
        &self,
        name: &str,
        description: &str,
        category: &str,
    ) -> Result<CreatedGroup, DirectorySourceError> {
        let ack: CreateGroupAck = self
            .transport()
            .post_json(
                "/api/groups",
                &CreateGroupRequest {
                    name,
                    description,
                    category,
                },
            )
            .map_err(map_directory_error)?;

        Ok(CreatedGroup {
            id: ack.group.id,
            name: ack.group.name,
        })
    }
}

impl PeerDirectory for ApiClient {
    fn list_users(&self) -> Result<Vec<Peer>, DirectorySourceError> {
        let dtos: Vec<UserDto> = self
            .transport()
            .get_json("/api/users", &[])
            .map_err(map_directory_error)?;

        Ok(dtos.into_iter().map(UserDto::into_peer).collect())
    }
}

fn map_directory_error(error: TransportError) -> DirectorySourceError {
    match error {
        TransportError::Unauthorized => DirectorySourceError::Unauthorized,
        TransportError::Network { message } => DirectorySourceError::Unavailable { message },
        TransportError::Status { status, body } if status < 500 => {
            DirectorySourceError::Rejected {
                detail: error_detail(&body),
            }
        }
        TransportError::Status { status, body } => DirectorySourceError::Unavailable {
            message: format!("status {status}: {}", error_detail(&body)),
        },
        TransportError::Decode { message } => DirectorySourceError::InvalidData { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_surfaces_field_detail() {
        let err = map_directory_error(TransportError::Status {
            status: 400,
            body: r#"{"errors": {"category": "Category is required"}}"#.to_owned(),
        });

        assert_eq!(
            err,
            DirectorySourceError::Rejected {
                detail: "category: Category is required".to_owned()
            }
        );
    }
}

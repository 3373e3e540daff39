use std::path::Path;

use crate::{
    api::{
        transport::{error_detail, TransportError},
        wire::{ResourceDto, ResourcePatchRequest, UploadAck},
        ApiClient,
    },
    domain::{message::AttachmentRef, resource::Resource},
    usecases::{
        library::{LibrarySourceError, ResourceDirectory, ResourcePatch},
        upload::{ResourceUploader, UploadSourceError},
    },
};

impl ResourceUploader for ApiClient {
    fn upload_resource(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<AttachmentRef, UploadSourceError> {
        let bytes = std::fs::read(path).map_err(|source| UploadSourceError::FileUnreadable {
            message: source.to_string(),
        })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_owned();

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("title", title.to_owned())
            .text("description", description.to_owned())
            .text("category", category.to_owned());

        match self
            .transport()
            .post_multipart::<UploadAck>("/api/resources", form)
        {
            Ok(ack) => Ok(ack.into_attachment_ref()),
            // The backend deduplicates by content hash; a conflict carries
            // the existing resource, which serves just as well.
            Err(TransportError::Status { status: 409, body }) => {
                serde_json::from_str::<UploadAck>(&body)
                    .map(UploadAck::into_attachment_ref)
                    .map_err(|_| UploadSourceError::Rejected {
                        detail: error_detail(&body),
                    })
            }
            Err(error) => Err(map_upload_error(error)),
        }
    }
}

impl ResourceDirectory for ApiClient {
    fn list_resources(&self) -> Result<Vec<Resource>, LibrarySourceError> {
        let dtos: Vec<ResourceDto> = self
            .transport()
            .get_json("/api/resources", &[])
            .map_err(map_library_error)?;

        dtos.into_iter()
            .map(|dto| {
                dto.into_resource()
                    .map_err(|message| LibrarySourceError::InvalidData { message })
            })
            .collect()
    }

    fn update_resource(&self, id: i64, patch: &ResourcePatch) -> Result<(), LibrarySourceError> {
        let body = ResourcePatchRequest {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            category: patch.category.as_deref(),
        };

        self.transport()
            .patch_json::<serde_json::Value, _>(&format!("/api/resources/{id}"), &body)
            .map(|_| ())
            .map_err(map_library_error)
    }

    fn delete_resource(&self, id: i64) -> Result<(), LibrarySourceError> {
        self.transport()
            .delete(&format!("/api/resources/{id}"))
            .map_err(map_library_error)
    }
}

fn map_upload_error(error: TransportError) -> UploadSourceError {
    match error {
        TransportError::Unauthorized => UploadSourceError::Unauthorized,
        TransportError::Network { message } => UploadSourceError::Unavailable { message },
        TransportError::Status { status, body } if status < 500 => UploadSourceError::Rejected {
            detail: error_detail(&body),
        },
        TransportError::Status { status, body } => UploadSourceError::Unavailable {
            message: format!("status {status}: {}", error_detail(&body)),
        },
        TransportError::Decode { message } => UploadSourceError::Rejected {
            detail: format!("malformed response: {message}"),
        },
    }
}

fn map_library_error(error: TransportError) -> LibrarySourceError {
    match error {
        TransportError::Unauthorized => LibrarySourceError::Unauthorized,
        TransportError::Network { message } => LibrarySourceError::Unavailable { message },
        TransportError::Status { status: 403, .. } => LibrarySourceError::Forbidden,
        TransportError::Status { status: 404, .. } => LibrarySourceError::NotFound,
        TransportError::Status { status, body } if status < 500 => LibrarySourceError::Rejected {
            detail: error_detail(&body),
        },
        TransportError::Status { status, body } => LibrarySourceError::Unavailable {
            message: format!("status {status}: {}", error_detail(&body)),
        },
        TransportError::Decode { message } => LibrarySourceError::InvalidData { message },
    }
}

//! Use case for turning a local file into a shared resource reference.
//!
//! Exactly one upload happens per user-initiated action; retrying is the
//! caller's decision, never this module's.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::message::AttachmentRef;

/// File types the backend accepts; checked here so a doomed upload fails
/// before any bytes leave the machine.
const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "docx", "pptx", "txt", "jpg", "png"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    /// Defaults to the file name when not set.
    pub title: Option<String>,
    pub description: String,
    pub category: String,
}

impl UploadRequest {
    /// Upload metadata used when a file rides along with a chat message.
    pub fn chat_attachment(path: PathBuf) -> Self {
        Self {
            path,
            title: None,
            description: "Shared in group chat".to_owned(),
            category: "Chat Attachment".to_owned(),
        }
    }
}

/// Errors reported by the remote resource endpoint, as seen at the source
/// level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSourceError {
    Unauthorized,
    Unavailable { message: String },
    Rejected { detail: String },
    FileUnreadable { message: String },
}

pub trait ResourceUploader {
    /// Performs a single multipart submission and returns the resulting
    /// resource reference.
    fn upload_resource(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<AttachmentRef, UploadSourceError>;
}

impl<T: ResourceUploader + ?Sized> ResourceUploader for &T {
    fn upload_resource(
        &self,
        path: &Path,
        title: &str,
        description: &str,
        category: &str,
    ) -> Result<AttachmentRef, UploadSourceError> {
        (*self).upload_resource(path, title, description, category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("file has no usable name")]
    MissingFileName,
    #[error("file type {extension:?} is not allowed")]
    UnsupportedFileType { extension: String },
    #[error("file could not be read: {message}")]
    FileUnreadable { message: String },
    #[error("not authorized to upload")]
    Unauthorized,
    #[error("upload service is unavailable: {message}")]
    TemporarilyUnavailable { message: String },
    #[error("upload rejected: {detail}")]
    Rejected { detail: String },
}

/// Uploads one attachment. The failure is always surfaced: message
/// composition needs to know whether a resource exists before deciding to
/// send anything at all.
pub fn upload_attachment(
    uploader: &dyn ResourceUploader,
    request: &UploadRequest,
) -> Result<AttachmentRef, UploadError> {
    let file_name = request
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::MissingFileName)?;

    let extension = request
        .path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedFileType { extension });
    }

    let title = request
        .title
        .clone()
        .unwrap_or_else(|| file_name.to_owned());

    uploader
        .upload_resource(&request.path, &title, &request.description, &request.category)
        .map_err(map_source_error)
}

fn map_source_error(error: UploadSourceError) -> UploadError {
    match error {
        UploadSourceError::Unauthorized => UploadError::Unauthorized,
        UploadSourceError::Unavailable { message } => {
            UploadError::TemporarilyUnavailable { message }
        }
        UploadSourceError::Rejected { detail } => UploadError::Rejected { detail },
        UploadSourceError::FileUnreadable { message } => UploadError::FileUnreadable { message },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct StubUploader {
        result: Result<AttachmentRef, UploadSourceError>,
        calls: RefCell<Vec<(PathBuf, String, String, String)>>,
    }

    impl StubUploader {
        fn with_result(result: Result<AttachmentRef, UploadSourceError>) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ResourceUploader for StubUploader {
        fn upload_resource(
            &self,
            path: &Path,
            title: &str,
            description: &str,
            category: &str,
        ) -> Result<AttachmentRef, UploadSourceError> {
            self.calls.borrow_mut().push((
                path.to_path_buf(),
                title.to_owned(),
                description.to_owned(),
                category.to_owned(),
            ));
            self.result.clone()
        }
    }

    fn attachment() -> AttachmentRef {
        AttachmentRef {
            resource_id: 12,
            title: "notes.pdf".to_owned(),
        }
    }

    fn request(path: &str) -> UploadRequest {
        UploadRequest {
            path: PathBuf::from(path),
            title: None,
            description: "desc".to_owned(),
            category: "General".to_owned(),
        }
    }

    #[test]
    fn rejects_disallowed_extension_before_any_upload() {
        let uploader = StubUploader::with_result(Ok(attachment()));

        let err = upload_attachment(&uploader, &request("/tmp/malware.exe"))
            .expect_err("exe must be rejected");

        assert_eq!(
            err,
            UploadError::UnsupportedFileType {
                extension: "exe".to_owned()
            }
        );
        assert!(uploader.calls.borrow().is_empty());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let uploader = StubUploader::with_result(Ok(attachment()));

        upload_attachment(&uploader, &request("/tmp/Notes.PDF")).expect("upload must succeed");

        assert_eq!(uploader.calls.borrow().len(), 1);
    }

    #[test]
    fn title_defaults_to_file_name() {
        let uploader = StubUploader::with_result(Ok(attachment()));

        upload_attachment(&uploader, &request("/tmp/notes.pdf")).expect("upload must succeed");

        assert_eq!(uploader.calls.borrow()[0].1, "notes.pdf");
    }

    #[test]
    fn explicit_title_wins_over_file_name() {
        let uploader = StubUploader::with_result(Ok(attachment()));
        let mut request = request("/tmp/notes.pdf");
        request.title = Some("Week 3 notes".to_owned());

        upload_attachment(&uploader, &request).expect("upload must succeed");

        assert_eq!(uploader.calls.borrow()[0].1, "Week 3 notes");
    }

    #[test]
    fn chat_attachment_defaults_carry_chat_metadata() {
        let uploader = StubUploader::with_result(Ok(attachment()));
        let request = UploadRequest::chat_attachment(PathBuf::from("/tmp/notes.pdf"));

        upload_attachment(&uploader, &request).expect("upload must succeed");

        let calls = uploader.calls.borrow();
        assert_eq!(calls[0].2, "Shared in group chat");
        assert_eq!(calls[0].3, "Chat Attachment");
    }

    #[test]
    fn source_failure_propagates_and_is_not_retried() {
        let uploader = StubUploader::with_result(Err(UploadSourceError::Unavailable {
            message: "timed out".to_owned(),
        }));

        let err =
            upload_attachment(&uploader, &request("/tmp/notes.pdf")).expect_err("must fail");

        assert_eq!(
            err,
            UploadError::TemporarilyUnavailable {
                message: "timed out".to_owned()
            }
        );
        assert_eq!(uploader.calls.borrow().len(), 1);
    }
}

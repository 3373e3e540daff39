//! Resource library workflows: listing, editing, and deleting shared
//! resources.

use thiserror::Error;

use crate::domain::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySourceError {
    Unauthorized,
    Unavailable { message: String },
    NotFound,
    Forbidden,
    Rejected { detail: String },
    InvalidData { message: String },
}

pub trait ResourceDirectory {
    fn list_resources(&self) -> Result<Vec<Resource>, LibrarySourceError>;
    fn update_resource(&self, id: i64, patch: &ResourcePatch) -> Result<(), LibrarySourceError>;
    fn delete_resource(&self, id: i64) -> Result<(), LibrarySourceError>;
}

impl<T: ResourceDirectory + ?Sized> ResourceDirectory for &T {
    fn list_resources(&self) -> Result<Vec<Resource>, LibrarySourceError> {
        (*self).list_resources()
    }

    fn update_resource(&self, id: i64, patch: &ResourcePatch) -> Result<(), LibrarySourceError> {
        (*self).update_resource(id, patch)
    }

    fn delete_resource(&self, id: i64) -> Result<(), LibrarySourceError> {
        (*self).delete_resource(id)
    }
}

/// Partial update of a resource's metadata. Absent fields stay untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl ResourcePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("not authorized")]
    Unauthorized,
    #[error("only the uploader may change a resource")]
    NotOwner,
    #[error("resource does not exist")]
    NotFound,
    #[error("library is unavailable: {message}")]
    TemporarilyUnavailable { message: String },
    #[error("request rejected: {detail}")]
    Rejected { detail: String },
    #[error("library data is malformed: {message}")]
    DataContract { message: String },
    #[error("nothing to change")]
    EmptyPatch,
    #[error("title must be at least 3 characters")]
    TitleTooShort,
}

pub fn list_resources(directory: &dyn ResourceDirectory) -> Result<Vec<Resource>, LibraryError> {
    directory.list_resources().map_err(map_source_error)
}

/// Applies a metadata patch. The backend's title rule is enforced here so
/// a doomed request fails before any network traffic.
pub fn edit_resource(
    directory: &dyn ResourceDirectory,
    id: i64,
    patch: &ResourcePatch,
) -> Result<(), LibraryError> {
    if patch.is_empty() {
        return Err(LibraryError::EmptyPatch);
    }

    if let Some(title) = &patch.title {
        if title.chars().count() < 3 {
            return Err(LibraryError::TitleTooShort);
        }
    }

    directory.update_resource(id, patch).map_err(map_source_error)
}

pub fn delete_resource(directory: &dyn ResourceDirectory, id: i64) -> Result<(), LibraryError> {
    directory.delete_resource(id).map_err(map_source_error)
}

fn map_source_error(error: LibrarySourceError) -> LibraryError {
    match error {
        LibrarySourceError::Unauthorized => LibraryError::Unauthorized,
        LibrarySourceError::Forbidden => LibraryError::NotOwner,
        LibrarySourceError::NotFound => LibraryError::NotFound,
        LibrarySourceError::Unavailable { message } => {
            LibraryError::TemporarilyUnavailable { message }
        }
        LibrarySourceError::Rejected { detail } => LibraryError::Rejected { detail },
        LibrarySourceError::InvalidData { message } => LibraryError::DataContract { message },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct StubDirectory {
        update_result: Result<(), LibrarySourceError>,
        updates: RefCell<Vec<(i64, ResourcePatch)>>,
    }

    impl StubDirectory {
        fn accepting() -> Self {
            Self {
                update_result: Ok(()),
                updates: RefCell::new(Vec::new()),
            }
        }
    }

    impl ResourceDirectory for StubDirectory {
        fn list_resources(&self) -> Result<Vec<Resource>, LibrarySourceError> {
            Ok(vec![])
        }

        fn update_resource(
            &self,
            id: i64,
            patch: &ResourcePatch,
        ) -> Result<(), LibrarySourceError> {
            self.updates.borrow_mut().push((id, patch.clone()));
            self.update_result.clone()
        }

        fn delete_resource(&self, _id: i64) -> Result<(), LibrarySourceError> {
            Ok(())
        }
    }

    #[test]
    fn empty_patch_is_rejected_locally() {
        let directory = StubDirectory::accepting();

        let err = edit_resource(&directory, 1, &ResourcePatch::default()).expect_err("must fail");

        assert_eq!(err, LibraryError::EmptyPatch);
        assert!(directory.updates.borrow().is_empty());
    }

    #[test]
    fn short_title_is_rejected_locally() {
        let directory = StubDirectory::accepting();
        let patch = ResourcePatch {
            title: Some("ab".to_owned()),
            ..ResourcePatch::default()
        };

        let err = edit_resource(&directory, 1, &patch).expect_err("must fail");

        assert_eq!(err, LibraryError::TitleTooShort);
        assert!(directory.updates.borrow().is_empty());
    }

    #[test]
    fn valid_patch_reaches_the_directory() {
        let directory = StubDirectory::accepting();
        let patch = ResourcePatch {
            description: Some("updated".to_owned()),
            ..ResourcePatch::default()
        };

        edit_resource(&directory, 5, &patch).expect("edit must succeed");

        assert_eq!(*directory.updates.borrow(), vec![(5, patch)]);
    }

    #[test]
    fn foreign_resource_maps_to_not_owner() {
        let mut directory = StubDirectory::accepting();
        directory.update_result = Err(LibrarySourceError::Forbidden);
        let patch = ResourcePatch {
            title: Some("New title".to_owned()),
            ..ResourcePatch::default()
        };

        let err = edit_resource(&directory, 5, &patch).expect_err("must fail");

        assert_eq!(err, LibraryError::NotOwner);
    }
}

//! Directory browsing: study groups and peers.

use thiserror::Error;

use crate::domain::{group::Group, identity::Identity, identity::Peer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySourceError {
    Unauthorized,
    Unavailable { message: String },
    Rejected { detail: String },
    InvalidData { message: String },
}

/// A freshly created group, as acknowledged by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedGroup {
    pub id: i64,
    pub name: String,
}

pub trait GroupDirectory {
    fn list_groups(&self) -> Result<Vec<Group>, DirectorySourceError>;
    fn create_group(
        &self,
        name: &str,
        description: &str,
        category: &str,
    ) -> Result<CreatedGroup, DirectorySourceError>;
}

impl<T: GroupDirectory + ?Sized> GroupDirectory for &T {
    fn list_groups(&self) -> Result<Vec<Group>, DirectorySourceError> {
        (*self).list_groups()
    }

    fn create_group(
        &self,
        name: &str,
        description: &str,
        category: &str,
    ) -> Result<CreatedGroup, DirectorySourceError> {
        (*self).create_group(name, description, category)
    }
}

pub trait PeerDirectory {
    fn list_users(&self) -> Result<Vec<Peer>, DirectorySourceError>;
}

impl<T: PeerDirectory + ?Sized> PeerDirectory for &T {
    fn list_users(&self) -> Result<Vec<Peer>, DirectorySourceError> {
        (*self).list_users()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("not authorized")]
    Unauthorized,
    #[error("directory is unavailable: {message}")]
    TemporarilyUnavailable { message: String },
    #[error("request rejected: {detail}")]
    Rejected { detail: String },
    #[error("directory data is malformed: {message}")]
    DataContract { message: String },
    #[error("group name is required")]
    MissingName,
    #[error("group category is required")]
    MissingCategory,
}

pub fn list_groups(directory: &dyn GroupDirectory) -> Result<Vec<Group>, DirectoryError> {
    directory.list_groups().map_err(map_source_error)
}

pub fn create_group(
    directory: &dyn GroupDirectory,
    name: &str,
    description: &str,
    category: &str,
) -> Result<CreatedGroup, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::MissingName);
    }

    let category = category.trim();
    if category.is_empty() {
        return Err(DirectoryError::MissingCategory);
    }

    directory
        .create_group(name, description, category)
        .map_err(map_source_error)
}

/// Lists message-able peers: everyone in the directory except the viewer.
pub fn list_peers(
    directory: &dyn PeerDirectory,
    viewer: &Identity,
) -> Result<Vec<Peer>, DirectoryError> {
    let peers = directory.list_users().map_err(map_source_error)?;
    Ok(peers.into_iter().filter(|peer| peer.id != viewer.id).collect())
}

fn map_source_error(error: DirectorySourceError) -> DirectoryError {
    match error {
        DirectorySourceError::Unauthorized => DirectoryError::Unauthorized,
        DirectorySourceError::Unavailable { message } => {
            DirectoryError::TemporarilyUnavailable { message }
        }
        DirectorySourceError::Rejected { detail } => DirectoryError::Rejected { detail },
        DirectorySourceError::InvalidData { message } => DirectoryError::DataContract { message },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct StubDirectory {
        peers: Vec<Peer>,
        created: RefCell<Vec<(String, String, String)>>,
    }

    impl StubDirectory {
        fn with_peers(peers: Vec<Peer>) -> Self {
            Self {
                peers,
                created: RefCell::new(Vec::new()),
            }
        }
    }

    impl GroupDirectory for StubDirectory {
        fn list_groups(&self) -> Result<Vec<Group>, DirectorySourceError> {
            Ok(vec![])
        }

        fn create_group(
            &self,
            name: &str,
            description: &str,
            category: &str,
        ) -> Result<CreatedGroup, DirectorySourceError> {
            self.created.borrow_mut().push((
                name.to_owned(),
                description.to_owned(),
                category.to_owned(),
            ));
            Ok(CreatedGroup {
                id: 8,
                name: name.to_owned(),
            })
        }
    }

    impl PeerDirectory for StubDirectory {
        fn list_users(&self) -> Result<Vec<Peer>, DirectorySourceError> {
            Ok(self.peers.clone())
        }
    }

    fn peer(id: i64, username: &str) -> Peer {
        Peer {
            id,
            username: username.to_owned(),
            full_name: username.to_owned(),
            field_of_study: None,
        }
    }

    fn viewer() -> Identity {
        Identity {
            id: 7,
            username: "ada".to_owned(),
            email: "ada@example.edu".to_owned(),
            full_name: "Ada L.".to_owned(),
        }
    }

    #[test]
    fn create_group_requires_a_name() {
        let directory = StubDirectory::with_peers(vec![]);

        let err = create_group(&directory, "  ", "", "Math").expect_err("must fail");

        assert_eq!(err, DirectoryError::MissingName);
        assert!(directory.created.borrow().is_empty());
    }

    #[test]
    fn create_group_requires_a_category() {
        let directory = StubDirectory::with_peers(vec![]);

        let err = create_group(&directory, "Algebra", "", " ").expect_err("must fail");

        assert_eq!(err, DirectoryError::MissingCategory);
    }

    #[test]
    fn create_group_trims_and_forwards_fields() {
        let directory = StubDirectory::with_peers(vec![]);

        let created =
            create_group(&directory, " Algebra ", "weekly", " Math ").expect("must succeed");

        assert_eq!(created.name, "Algebra");
        assert_eq!(
            *directory.created.borrow(),
            vec![("Algebra".to_owned(), "weekly".to_owned(), "Math".to_owned())]
        );
    }

    #[test]
    fn list_peers_excludes_the_viewer() {
        let directory =
            StubDirectory::with_peers(vec![peer(7, "ada"), peer(4, "bob"), peer(5, "eve")]);

        let peers = list_peers(&directory, &viewer()).expect("must succeed");

        let names: Vec<&str> = peers.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "eve"]);
    }
}

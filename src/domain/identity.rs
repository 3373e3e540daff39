/// The authenticated user of this process.
///
/// At most one identity is live at a time; it is created on a successful
/// login, registration, or session restore and destroyed on logout or when
/// the backend revokes the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Another platform user, as listed by the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub field_of_study: Option<String>,
}

impl Peer {
    /// Returns the directory line for this peer: username plus field of
    /// study when one is known.
    pub fn display_line(&self) -> String {
        match &self.field_of_study {
            Some(field) if !field.is_empty() => format!("{} ({})", self.username, field),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_includes_field_of_study_when_present() {
        let peer = Peer {
            id: 1,
            username: "ada".to_owned(),
            full_name: "Ada L.".to_owned(),
            field_of_study: Some("Mathematics".to_owned()),
        };

        assert_eq!(peer.display_line(), "ada (Mathematics)");
    }

    #[test]
    fn display_line_is_username_only_when_field_is_empty() {
        let peer = Peer {
            id: 1,
            username: "ada".to_owned(),
            full_name: "Ada L.".to_owned(),
            field_of_study: Some(String::new()),
        };

        assert_eq!(peer.display_line(), "ada");
    }
}

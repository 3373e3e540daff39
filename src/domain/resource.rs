use chrono::{DateTime, Utc};

/// A shared study resource as listed by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_name: String,
    pub file_size: u64,
    pub download_count: u64,
    pub uploader: String,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Returns a human-readable size, binary units.
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

        let mut size = self.file_size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit + 1 < UNITS.len() {
            size /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", self.file_size, UNITS[unit])
        } else {
            format!("{size:.1} {}", UNITS[unit])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(file_size: u64) -> Resource {
        Resource {
            id: 1,
            title: "Algebra notes".to_owned(),
            description: String::new(),
            category: "Mathematics".to_owned(),
            file_name: "algebra.pdf".to_owned(),
            file_size,
            download_count: 0,
            uploader: "ada".to_owned(),
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn display_size_keeps_bytes_unscaled() {
        assert_eq!(resource(512).display_size(), "512 B");
    }

    #[test]
    fn display_size_scales_to_mebibytes() {
        assert_eq!(resource(3 * 1024 * 1024).display_size(), "3.0 MiB");
    }
}

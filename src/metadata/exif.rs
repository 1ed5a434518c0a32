use std::io::Cursor;

use log::debug;
use serde::Serialize;

const EDITING_SOFTWARE: [&str; 8] = [
    "photoshop",
    "gimp",
    "paint",
    "lightroom",
    "affinity",
    "snapseed",
    "pixlr",
    "canva",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    pub has_exif: bool,
    pub suspicious_editing: bool,
    #[serde(skip)]
    pub software: Option<String>,
}

pub struct ExifProbe;

impl ExifProbe {
    /// Reads EXIF from any container kamadak-exif understands. A missing or
    /// unreadable block is reported as `has_exif: false`.
    pub fn inspect(bytes: &[u8]) -> MetadataSummary {
        let mut reader = Cursor::new(bytes);

        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif_data) => Self::summarize(&exif_data),
            Err(e) => {
                debug!("No EXIF data: {}", e);
                MetadataSummary::default()
            }
        }
    }

    fn summarize(exif: &exif::Exif) -> MetadataSummary {
        let software = exif
            .get_field(exif::Tag::Software, exif::In::PRIMARY)
            .map(|f| f.display_value().to_string().trim_matches('"').to_string());

        let suspicious_editing = software
            .as_deref()
            .is_some_and(Self::is_editing_software);

        MetadataSummary {
            has_exif: true,
            suspicious_editing,
            software,
        }
    }

    pub fn is_editing_software(name: &str) -> bool {
        let lower = name.to_lowercase();
        EDITING_SOFTWARE.iter().any(|editor| lower.contains(editor))
    }
}

pub mod exif;

pub use self::exif::{ExifProbe, MetadataSummary};

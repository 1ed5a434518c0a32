use std::{fs, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::DynamicImage;
use log::debug;

use crate::error::{AuthenticityError, Result};

/// A decoded image together with the compressed bytes it came from.
pub struct DecodedImage {
    pub image: DynamicImage,
    pub bytes: Vec<u8>,
}

/// The argument is either a path to a file holding the encoding, or the
/// encoding itself.
pub fn resolve_input(arg: &str) -> Result<String> {
    let path = Path::new(arg);

    if path.is_file() {
        debug!("Reading encoded image from {}", path.display());
        Ok(fs::read_to_string(path)?)
    } else {
        Ok(arg.to_string())
    }
}

/// Strips a `data:image/...;base64,` prefix when present. Everything after
/// the first comma is the payload.
pub fn payload(encoded: &str) -> Result<&str> {
    let trimmed = encoded.trim();

    if trimmed.starts_with("data:image") {
        trimmed
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| AuthenticityError::MalformedDataUrl("missing ',' separator".into()))
    } else {
        Ok(trimmed)
    }
}

pub fn decode_image(encoded: &str) -> Result<DecodedImage> {
    let compact = payload(encoded)?
        .split_ascii_whitespace()
        .collect::<String>();

    let bytes = STANDARD.decode(compact)?;
    let image = image::load_from_memory(&bytes)?;
    debug!(
        "Decoded {} bytes into a {}x{} image",
        bytes.len(),
        image.width(),
        image.height()
    );

    Ok(DecodedImage { image, bytes })
}

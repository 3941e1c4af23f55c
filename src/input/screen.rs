use std::{fmt, io::Cursor, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::input_error::InputError;

/// An encoded, point-in-time copy of the screen.
///
/// Cloning is cheap; the encoded bytes are shared and never mutated, so a
/// screenshot embedded in a message can't be overwritten by a later capture.
#[derive(Clone, PartialEq, Eq)]
pub struct Screenshot {
    bytes: Arc<[u8]>,
    mime: &'static str,
    width: u32,
    height: u32,
}

impl Screenshot {
    pub fn new(bytes: Vec<u8>, mime: &'static str, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
            width,
            height,
        }
    }

    /// Encodes a raw capture as JPEG. Alpha is dropped.
    pub fn from_rgba(image: RgbaImage) -> Result<Self, InputError> {
        let (width, height) = image.dimensions();
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let mut buffer = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)?;
        Ok(Self::new(buffer, "image/jpeg", width, height))
    }

    /// An empty frame of the given size, e.g. for fakes that never touch a real display.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(Vec::new(), "image/png", width, height)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

impl fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screenshot")
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_mime_and_payload() {
        let shot = Screenshot::new(vec![1, 2, 3], "image/jpeg", 4, 4);
        assert_eq!(shot.data_url(), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn encodes_rgba_capture_as_jpeg() {
        let image = RgbaImage::from_pixel(16, 9, image::Rgba([10, 20, 30, 255]));
        let shot = Screenshot::from_rgba(image).unwrap();
        assert_eq!(shot.dimensions(), (16, 9));
        assert_eq!(shot.mime(), "image/jpeg");
        assert_eq!(&shot.bytes()[..2], &[0xFF, 0xD8]);
    }
}

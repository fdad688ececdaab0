use crate::error::{GenerationError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};

pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

pub fn data_uri(mime_type: &str, data: &str) -> String {
    format!("data:{};base64,{}", mime_type, data)
}

/// The photo the character is taken from. Payload and MIME type only ever change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    data: String, // Base64 encoded
    mime_type: String,
}

impl UploadedImage {
    /// An empty payload is no image at all.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Result<Self> {
        let data = data.into();
        let mime_type = mime_type.into();
        if data.trim().is_empty() {
            return Err(GenerationError::ImageRequired);
        }
        if !ACCEPTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(GenerationError::UnsupportedImage(mime_type));
        }
        Ok(Self { data, mime_type })
    }

    /// Encodes raw file bytes, detecting the format from their signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)
            .map_err(|e| GenerationError::UnsupportedImage(e.to_string()))?;
        Self::new(STANDARD.encode(bytes), format.to_mime_type())
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "file is empty").into());
        }

        match image::guess_format(&bytes) {
            Ok(format) => Self::new(STANDARD.encode(&bytes), format.to_mime_type()),
            Err(_) => {
                let format = ImageFormat::from_path(path).map_err(|_| {
                    GenerationError::UnsupportedImage(path.display().to_string())
                })?;
                Self::new(STANDARD.encode(&bytes), format.to_mime_type())
            }
        }
    }

    /// Accepts `data:{mime};base64,{payload}` as produced by browser file readers.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| GenerationError::InvalidDataUri("missing data: scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| GenerationError::InvalidDataUri("missing payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| GenerationError::InvalidDataUri("payload is not base64".into()))?;
        if payload.trim().is_empty() {
            return Err(GenerationError::InvalidDataUri("empty payload".into()));
        }

        Self::new(payload, mime_type)
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data_uri(&self) -> String {
        data_uri(&self.mime_type, &self.data)
    }
}

/// An image returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub data: String, // Base64 encoded
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        data_uri(&self.mime_type, &self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| GenerationError::SerializationError(e.to_string()))
    }

    pub fn extension(&self) -> &'static str {
        ImageFormat::from_mime_type(&self.mime_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn data_uri_uses_mime_and_payload() {
        let image = UploadedImage::new("QUJD", "image/jpeg").unwrap();
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,QUJD");

        let generated = GeneratedImage {
            data: "eHl6".into(),
            mime_type: "image/png".into(),
        };
        assert_eq!(generated.data_uri(), "data:image/png;base64,eHl6");
    }

    #[test]
    fn rejects_unaccepted_mime_type() {
        let err = UploadedImage::new("QUJD", "image/gif").unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedImage(m) if m == "image/gif"));
    }

    #[test]
    fn parses_browser_data_uri() {
        let image = UploadedImage::from_data_uri("data:image/webp;base64,AAAA").unwrap();
        assert_eq!(image.mime_type(), "image/webp");
        assert_eq!(image.data(), "AAAA");

        assert!(matches!(
            UploadedImage::from_data_uri("image/png;base64,AAAA"),
            Err(GenerationError::InvalidDataUri(_))
        ));
        assert!(matches!(
            UploadedImage::from_data_uri("data:image/png,AAAA"),
            Err(GenerationError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn empty_payload_is_not_an_image() {
        assert!(matches!(
            UploadedImage::new("", "image/png"),
            Err(GenerationError::ImageRequired)
        ));
        assert!(matches!(
            UploadedImage::from_data_uri("data:image/png;base64,"),
            Err(GenerationError::InvalidDataUri(m)) if m == "empty payload"
        ));
    }

    #[tokio::test]
    async fn empty_file_is_a_read_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("empty.png");
        fs::write(&path, b"")?;

        let err = UploadedImage::from_path(&path).await.unwrap_err();
        assert!(matches!(err, GenerationError::FileRead(_)));
        assert_eq!(err.user_message(), "Failed to read the file.");
        Ok(())
    }

    #[test]
    fn sniffs_format_from_bytes() {
        let image = UploadedImage::from_bytes(JPEG_SIGNATURE).unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.data(), STANDARD.encode(JPEG_SIGNATURE));
    }

    #[tokio::test]
    async fn reads_image_file_from_disk() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("portrait.bin");
        fs::write(&path, PNG_SIGNATURE)?;

        let image = UploadedImage::from_path(&path).await?;
        assert_eq!(image.mime_type(), "image/png");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = UploadedImage::from_path("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::FileRead(_)));
    }

    #[test]
    fn generated_image_decodes_and_names_extension() {
        let generated = GeneratedImage {
            data: STANDARD.encode(b"pixels"),
            mime_type: "image/jpeg".into(),
        };
        assert_eq!(generated.decode().unwrap(), b"pixels");
        assert_eq!(generated.extension(), "jpg");
    }
}

//! Evidence files (invoices, receipts) attached to a claim.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64_STD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declared media type of an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Jpeg,
    Png,
    /// Anything else; decoded as PNG when merged.
    Other(String),
}

impl MediaType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => MediaType::Pdf,
            "image/jpeg" | "image/jpg" => MediaType::Jpeg,
            "image/png" => MediaType::Png,
            other => MediaType::Other(other.to_string()),
        }
    }

    /// Guess from a file extension, the way a file picker would.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => MediaType::Pdf,
            "jpg" | "jpeg" => MediaType::Jpeg,
            "png" => MediaType::Png,
            "" => MediaType::Other("application/octet-stream".to_string()),
            other => MediaType::Other(format!("image/{other}")),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MediaType::parse(&raw))
    }
}

/// A named binary blob with its declared media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResource {
    pub name: String,
    pub media_type: MediaType,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl AttachmentResource {
    pub fn new(name: impl Into<String>, media_type: MediaType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

mod base64_bytes {
    use super::BASE64_STD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BASE64_STD
            .decode(raw.trim())
            .map_err(|e| serde::de::Error::custom(format!("Base64 decode error: {e}")))
    }
}

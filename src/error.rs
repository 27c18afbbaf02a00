use thiserror::Error;

/// Fatal failure while assembling or merging a claim document.
///
/// No partial document is ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("attachment '{name}': {reason}")]
    Attachment { name: String, reason: String },

    #[error("attachment '{name}' could not be decoded as {format}: {source}")]
    ImageDecode {
        name: String,
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("unknown form type '{0}'")]
    UnknownFormType(String),

    #[error("failed to serialise document: {0}")]
    Serialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

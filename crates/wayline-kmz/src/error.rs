//! Serializer and packager error types.

use thiserror::Error;

/// Document rendering and archive errors
#[derive(Debug, Error)]
pub enum KmzError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to move archive into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl KmzError {
    /// Machine-readable error code
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Xml(_) => "XML_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::Persist(_) => "PERSIST_ERROR",
        }
    }
}

impl From<quick_xml::Error> for KmzError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for KmzError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type alias for serializer operations
pub type Result<T> = std::result::Result<T, KmzError>;

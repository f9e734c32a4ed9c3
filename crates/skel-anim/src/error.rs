use thiserror::Error;

/// Broad category of an [`AnimError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A bone or frame lookup referenced data that does not exist
    IndexOutOfRange,
    /// The skeleton or a clip does not describe a usable rig
    ConfigurationError,
}

/// Error types for skeleton construction, clip lookups and pose updates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// No samples were ever stored for this bone index
    #[error("Keyframe unattainable: bone index {bone} is out of range")]
    UnknownBone { bone: usize },

    /// The bone exists but holds fewer samples than requested
    #[error("Keyframe unattainable: frame {frame} is out of range for bone {bone} ({stored} stored)")]
    FrameOutOfRange {
        bone: usize,
        frame: usize,
        stored: usize,
    },

    /// The skeleton or clip configuration cannot be animated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A clip name that was never loaded into the controller
    #[error("Configuration error: unknown clip '{0}'")]
    UnknownClip(String),
}

impl AnimError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownBone { .. } | Self::FrameOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::Configuration(_) | Self::UnknownClip(_) => ErrorKind::ConfigurationError,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;

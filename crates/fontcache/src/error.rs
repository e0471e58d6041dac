use std::fmt;
use std::path::PathBuf;

/// Recoverable capacity conditions reported through [`RenderSink::error`].
///
/// The numeric codes are stable and can be forwarded across an FFI boundary.
///
/// [`RenderSink::error`]: crate::RenderSink::error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// `pop_state` was called with only the base frame left.
    StatesUnderflow = 1,
    /// `push_state` was called with the stack at its maximum depth.
    StatesOverflow = 2,
    /// The packer could not place a glyph bitmap in the atlas.
    AtlasFull = 3,
}

impl ErrorCode {
    /// Numeric value of this code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up a code by its numeric value.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::StatesUnderflow),
            2 => Some(Self::StatesOverflow),
            3 => Some(Self::AtlasFull),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::StatesUnderflow => write!(f, "style state stack underflow"),
            ErrorCode::StatesOverflow => write!(f, "style state stack overflow"),
            ErrorCode::AtlasFull => write!(f, "glyph atlas is full"),
        }
    }
}

/// Errors returned by fallible context and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum FontCacheError {
    /// The font backend rejected the font data.
    #[error("failed to parse font face {face_index}")]
    FontParse { face_index: u32 },

    /// Reading a font file from disk failed.
    #[error("failed to read font file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A [`ContextConfig`](crate::ContextConfig) value is out of range.
    #[error("invalid context configuration: {0}")]
    InvalidConfig(String),

    /// The render sink refused to create the atlas surface.
    #[error("render sink refused to create a {width}x{height} atlas")]
    SinkCreateFailed { width: u32, height: u32 },

    /// Growing an internal table failed.
    #[error("allocation failed while growing the {0} table")]
    OutOfMemory(&'static str),
}

/// Result type for fontcache operations.
pub type FontCacheResult<T> = Result<T, FontCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorCode::StatesUnderflow.code(), 1);
        assert_eq!(ErrorCode::StatesOverflow.code(), 2);
        assert_eq!(ErrorCode::AtlasFull.code(), 3);
    }

    #[test]
    fn test_error_code_round_trip() {
        for code in [
            ErrorCode::StatesUnderflow,
            ErrorCode::StatesOverflow,
            ErrorCode::AtlasFull,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code(0), None);
        assert_eq!(ErrorCode::from_code(4), None);
    }

    #[test]
    fn test_display_messages() {
        let err = FontCacheError::SinkCreateFailed {
            width: 512,
            height: 256,
        };
        assert_eq!(err.to_string(), "render sink refused to create a 512x256 atlas");
        assert_eq!(
            FontCacheError::FontParse { face_index: 2 }.to_string(),
            "failed to parse font face 2"
        );
    }
}

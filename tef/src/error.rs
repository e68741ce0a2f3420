use thiserror::Error;

/// Hard parse failures. Heuristic steps never raise these — they degrade to
/// a [`crate::file::Warning`] instead (spec'd in §7: only malformed headers
/// and off-file pointer dereferences are terminal).
#[derive(Error, Debug)]
pub enum TefError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported TEF version {major}.{minor:02}; only 2.x and 3.x are understood")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("truncated file: read at offset 0x{at_offset:X} overran the end of the buffer")]
    Truncated { at_offset: usize },

    #[error("corrupt file: {reason}")]
    CorruptFile { reason: &'static str },
}

pub type Result<T> = std::result::Result<T, TefError>;

//! Error types for waypoint-dump

use thiserror::Error;

/// Main error type for waypoint-dump operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid container: {0}")]
    ContainerFormat(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Invalid NBT data: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failures while parsing the tagged binary tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("root must be TAG_Compound, got tag {0}")]
    RootNotCompound(u8),

    #[error("unknown tag id {id} at offset {offset}")]
    UnknownTag { id: u8, offset: u64 },

    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: u64 },

    #[error("negative length {len} at offset {offset}")]
    NegativeLength { len: i32, offset: u64 },

    #[error("list of TAG_End declares {len} elements at offset {offset}")]
    NonEmptyEndList { len: usize, offset: u64 },

    #[error("nesting exceeds {depth} levels")]
    TooDeep { depth: usize },
}

/// Result type alias for waypoint-dump operations
pub type Result<T> = std::result::Result<T, Error>;

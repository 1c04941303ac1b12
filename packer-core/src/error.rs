use thiserror::Error;

/// The closed set of ways an encode or decode can fail. See spec §7;
/// every kind there has exactly one variant here.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("value contains a type this format cannot represent")]
    UnsupportedType,

    #[error("recursion depth {depth} exceeds the configured maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("a string, buffer, array, or hash count does not fit in 32 bits")]
    SizeLimit,

    #[error("input ended before a complete value could be read")]
    Truncated,

    #[error("unrecognized tag byte 0x{tag:02x} at offset {offset}")]
    BadTag { tag: u8, offset: usize },

    #[error("string pool reference {index} is past the high-water mark {high_water_mark}")]
    BadPoolIndex { index: u32, high_water_mark: u32 },

    #[error("level-3 entropy stream failed to decode: {reason}")]
    EntropyError { reason: String },

    #[error("{extra} byte(s) remained after decoding the top-level value")]
    TrailingGarbage { extra: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;

// No explicit `impl From<CodecError> for packer_base::Error` here: it
// would conflict with packer_base's own blanket
// `impl<E: std::error::Error + Send + Sync + 'static> From<E> for Error`,
// which already covers this conversion since `CodecError` (derived via
// `thiserror`) satisfies that bound.

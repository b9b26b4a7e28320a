pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("a vlq value is malformed: \"{0}\"")]
    MalformedVlq(String),
    #[error("a segment does not have 1, 4 or 5 fields: \"{0}\"")]
    MalformedSegment(String),
    #[error("mappings are unordered")]
    UnorderedMappings,
    #[error("{field} is out of range: {value}")]
    ValueOutOfRange { field: &'static str, value: i64 },
    #[error("a mapping references unknown source #{0}")]
    UnknownSourceReference(u32),
    #[error("a mapping references unknown name #{0}")]
    UnknownNameReference(u32),
}

impl Error {
    #[cold]
    pub(crate) fn out_of_range(field: &'static str, value: i64) -> Self {
        Self::ValueOutOfRange { field, value }
    }
}

/// Converts an absolute value into `u32`, reporting which field overflowed.
#[inline]
pub(crate) fn to_u32(field: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::out_of_range(field, value))
}

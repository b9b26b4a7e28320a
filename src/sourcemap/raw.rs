use crate::mappings::Mappings;
use crate::Result;
use std::borrow::Cow;

/// A `mappings` string kept exactly as supplied, with the counts its indices refer to.
///
/// Nothing is decoded until a change to the mappings is requested.
#[derive(Debug, Clone)]
pub(crate) struct RawMappings<'a> {
    pub(crate) mappings: Cow<'a, str>,
    pub(crate) sources: u32,
    pub(crate) names: u32,
}

impl<'a> RawMappings<'a> {
    pub fn new(mappings: Cow<'a, str>, sources: u32, names: u32) -> Self {
        Self {
            mappings,
            sources,
            names,
        }
    }

    /// Decodes the string as the first set of a [Mappings].
    pub fn parse(&self) -> Result<Mappings> {
        Mappings::parse(&self.mappings, self.sources, self.names)
    }

    pub fn into_owned(self) -> RawMappings<'static> {
        RawMappings {
            mappings: Cow::Owned(self.mappings.into_owned()),
            sources: self.sources,
            names: self.names,
        }
    }
}

mod raw;

use crate::mapping::{Mapping, Position};
use crate::mappings::Mappings;
use crate::Result;
use raw::RawMappings;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::io;
use std::io::Write;

#[derive(Clone)]
enum Repr<'a> {
    Raw(RawMappings<'a>),
    Parsed(Mappings),
}

/// `SourceMap` holds the `mappings` of a source map along with the number of sources and names
/// they refer to.
///
/// The surrounding document (`sources`, `names`, `file`, ...) is left to the caller, who
/// supplies the counts and reads back the encoded string and the updated counts.
///
/// # Lazy decoding
///
/// A `SourceMap` created by [`new`](SourceMap::new) keeps the supplied string untouched and
/// writes it back byte for byte, without decoding or re-encoding it. The string is only
/// decoded, once, when a change is requested:
/// - [`add_mappings`](SourceMap::add_mappings)
/// - [`add_mapping`](SourceMap::add_mapping)
/// - [`offset_lines`](SourceMap::offset_lines)
/// - [`offset_columns`](SourceMap::offset_columns)
///
/// A malformed string is therefore only reported by the first of these calls.
///
/// # Example
/// ```
/// # use splicemap::SourceMap;
/// let mut sm = SourceMap::new("AAAA", 1, 0);
/// assert_eq!(sm.to_string().unwrap(), "AAAA");
///
/// sm.add_mappings("CAAA", 1, 0, (1, 0)).unwrap();
/// assert_eq!(sm.sources_count(), 2);
/// assert_eq!(sm.to_string().unwrap(), "AAAA;CCAA");
/// ```
#[derive(Clone)]
pub struct SourceMap<'a> {
    repr: Repr<'a>,
}

impl Debug for SourceMap<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.repr {
            Repr::Raw(raw) => write!(
                f,
                "SourceMap (raw, {} sources, {} names)\n  {}",
                raw.sources, raw.names, raw.mappings
            ),
            Repr::Parsed(mappings) => write!(f, "SourceMap {mappings:?}"),
        }
    }
}

impl<'a> SourceMap<'a> {
    /// Creates a `SourceMap` holding `mappings` as is.
    #[inline]
    pub fn new<S>(mappings: S, sources: u32, names: u32) -> Self
    where
        S: Into<Cow<'a, str>>,
    {
        Self {
            repr: Repr::Raw(RawMappings::new(mappings.into(), sources, names)),
        }
    }

    /// Creates a `SourceMap` whose mappings start at `offset` in the generated file.
    ///
    /// A zero offset behaves like [`new`](Self::new). Any other offset changes the encoded
    /// string, so `mappings` is decoded right away.
    pub fn with_offset<S, P>(mappings: S, sources: u32, names: u32, offset: P) -> Result<Self>
    where
        S: Into<Cow<'a, str>>,
        P: Into<Position>,
    {
        let offset = offset.into();
        if offset == Position::min() {
            return Ok(Self::new(mappings, sources, names));
        }
        let mappings: Cow<'a, str> = mappings.into();
        let mut parsed = Mappings::new();
        parsed.add_mappings(&mappings, sources, names, offset)?;
        Ok(Self::from(parsed))
    }

    /// Returns `true` while the supplied string has not been decoded.
    #[inline]
    pub fn is_raw(&self) -> bool {
        matches!(self.repr, Repr::Raw(_))
    }

    /// Total number of sources the mappings refer to.
    #[inline]
    pub fn sources_count(&self) -> u32 {
        match &self.repr {
            Repr::Raw(raw) => raw.sources,
            Repr::Parsed(mappings) => mappings.sources_count(),
        }
    }

    /// Total number of names the mappings refer to.
    #[inline]
    pub fn names_count(&self) -> u32 {
        match &self.repr {
            Repr::Raw(raw) => raw.names,
            Repr::Parsed(mappings) => mappings.names_count(),
        }
    }

    /// Returns the decoded mappings.
    ///
    /// A raw `SourceMap` decodes a copy and stays raw.
    pub fn decoded(&self) -> Result<Cow<'_, Mappings>> {
        match &self.repr {
            Repr::Raw(raw) => raw.parse().map(Cow::Owned),
            Repr::Parsed(mappings) => Ok(Cow::Borrowed(mappings)),
        }
    }

    /// Consumes the `SourceMap`, returning the decoded mappings.
    pub fn into_mappings(self) -> Result<Mappings> {
        match self.repr {
            Repr::Raw(raw) => raw.parse(),
            Repr::Parsed(mappings) => Ok(mappings),
        }
    }

    /// Checks the order of the mappings and their source and name references.
    ///
    /// A raw `SourceMap` is not checked at all.
    pub fn validate(&self) -> Result<()> {
        match &self.repr {
            Repr::Raw(_) => Ok(()),
            Repr::Parsed(mappings) => mappings.validate(),
        }
    }

    pub fn into_owned(self) -> SourceMap<'static> {
        SourceMap {
            repr: match self.repr {
                Repr::Raw(raw) => Repr::Raw(raw.into_owned()),
                Repr::Parsed(mappings) => Repr::Parsed(mappings),
            },
        }
    }
}

impl SourceMap<'_> {
    /// Merges another `mappings` string, see [Mappings::add_mappings].
    ///
    /// `sources` and `names` are the counts of the lists the new indices refer to; the caller
    /// is expected to append those lists after the ones already registered.
    pub fn add_mappings<P>(
        &mut self,
        mappings: &str,
        sources: u32,
        names: u32,
        offset: P,
    ) -> Result<()>
    where
        P: Into<Position>,
    {
        self.parsed_mut()?
            .add_mappings(mappings, sources, names, offset)
    }

    /// Inserts one mapping, see [Mappings::add_mapping].
    pub fn add_mapping(&mut self, mapping: Mapping) -> Result<()> {
        self.parsed_mut()?.add_mapping(mapping);
        Ok(())
    }

    /// see [Mappings::offset_lines].
    pub fn offset_lines(&mut self, from_line: u32, delta: i64) -> Result<()> {
        self.parsed_mut()?.offset_lines(from_line, delta)
    }

    /// see [Mappings::offset_columns].
    pub fn offset_columns(&mut self, line: u32, from_column: u32, delta: i64) -> Result<()> {
        self.parsed_mut()?.offset_columns(line, from_column, delta)
    }

    fn parsed_mut(&mut self) -> Result<&mut Mappings> {
        if let Repr::Raw(raw) = &self.repr {
            let parsed = raw.parse()?;
            tracing::debug!(
                count = parsed.len(),
                sources = raw.sources,
                names = raw.names,
                "decoded raw mappings"
            );
            self.repr = Repr::Parsed(parsed);
        }
        match &mut self.repr {
            Repr::Parsed(mappings) => Ok(mappings),
            Repr::Raw(_) => unreachable!("raw mappings are decoded above"),
        }
    }
}

impl SourceMap<'_> {
    /// Writes the encoded `mappings` string.
    pub fn write<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        match &self.repr {
            Repr::Raw(raw) => w.write_all(raw.mappings.as_bytes()),
            Repr::Parsed(mappings) => mappings.encode(w),
        }
    }

    #[inline]
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        let mut v = Vec::with_capacity(1024);
        self.write(&mut v)?;
        Ok(v)
    }

    #[inline]
    pub fn to_string(&self) -> io::Result<String> {
        match &self.repr {
            Repr::Raw(raw) => Ok(raw.mappings.to_string()),
            Repr::Parsed(mappings) => mappings.to_string(),
        }
    }
}

impl From<Mappings> for SourceMap<'_> {
    fn from(mappings: Mappings) -> Self {
        Self {
            repr: Repr::Parsed(mappings),
        }
    }
}

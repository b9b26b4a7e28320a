use std::fmt::{Debug, Formatter};

/// `Position` represents a zero-based line and zero-based column in a file.
///
/// It is also the shape of the offsets accepted when mappings are merged: `line` is the
/// number of generated lines inserted before the merged mappings, `column` the number of
/// columns inserted before their first line.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn max() -> Self {
        Self {
            line: u32::MAX,
            column: u32::MAX,
        }
    }

    pub const fn min() -> Self {
        Self { line: 0, column: 0 }
    }

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

/// The original side of a [Mapping]: a position in one of the sources, and optionally a name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginalLocation {
    /// Index into the sources list.
    pub source: u32,
    pub line: u32,
    pub column: u32,
    /// Index into the names list.
    pub name: Option<u32>,
}

impl OriginalLocation {
    pub const fn new(source: u32, line: u32, column: u32, name: Option<u32>) -> Self {
        Self {
            source,
            line,
            column,
            name,
        }
    }

    #[inline]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Presents one decoded segment of the `mappings`.
///
/// A segment with a single field maps a generated position to nothing, its
/// [original](Mapping::original) is `None` rather than anything inherited from earlier segments.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mapping {
    pub(crate) generated: Position,
    pub(crate) original: Option<OriginalLocation>,
}

impl Debug for Mapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.generated.line, self.generated.column)?;
        if let Some(original) = &self.original {
            write!(
                f,
                " -> {}:{}:{}",
                original.source, original.line, original.column
            )?;
            if let Some(name) = original.name {
                write!(f, " ({name})")?;
            }
        }
        Ok(())
    }
}

impl Mapping {
    #[inline(always)]
    pub const fn new(generated_line: u32, generated_column: u32) -> Self {
        Self {
            generated: Position::new(generated_line, generated_column),
            original: None,
        }
    }

    #[inline(always)]
    pub const fn with_source(self, source: u32, line: u32, column: u32) -> Self {
        Self {
            original: Some(OriginalLocation::new(source, line, column, None)),
            ..self
        }
    }

    /// Attaches a name to the mapping.
    ///
    /// Names only exist next to an original location, so this does nothing
    /// unless [with_source](Self::with_source) was called first.
    #[inline(always)]
    pub const fn with_name(self, name: u32) -> Self {
        match self.original {
            Some(original) => Self {
                original: Some(OriginalLocation {
                    name: Some(name),
                    ..original
                }),
                ..self
            },
            None => self,
        }
    }
}

impl Mapping {
    /// Returns the generated position of the mapping.
    #[inline]
    pub fn generated(&self) -> Position {
        self.generated
    }

    /// Returns the original location if the segment had one.
    #[inline]
    pub fn original(&self) -> Option<&OriginalLocation> {
        self.original.as_ref()
    }

    #[inline]
    pub fn source(&self) -> Option<u32> {
        self.original.map(|o| o.source)
    }

    #[inline]
    pub fn name(&self) -> Option<u32> {
        self.original.and_then(|o| o.name)
    }

    #[inline]
    pub fn has_source(&self) -> bool {
        self.original.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Mapping, OriginalLocation, Position};

    #[test]
    fn test_mapping_builders() {
        let mapping = Mapping::new(3, 4).with_source(1, 2, 8).with_name(5);
        assert_eq!(mapping.generated(), Position::new(3, 4));
        assert_eq!(
            mapping.original(),
            Some(&OriginalLocation::new(1, 2, 8, Some(5)))
        );
        assert_eq!(mapping.source(), Some(1));
        assert_eq!(mapping.name(), Some(5));

        // a name without a source is dropped
        let bare = Mapping::new(0, 1).with_name(2);
        assert!(!bare.has_source());
        assert_eq!(bare.name(), None);
    }

    #[test]
    fn test_mapping_debug() {
        insta::assert_snapshot!(format!("{:?}", Mapping::new(0, 1)), @"0:1");
        insta::assert_snapshot!(format!("{:?}", Mapping::new(2, 7).with_source(1, 0, 3)), @"2:7 -> 1:0:3");
        insta::assert_snapshot!(format!("{:?}", Mapping::new(2, 7).with_source(1, 0, 3).with_name(4)), @"2:7 -> 1:0:3 (4)");
    }

    #[test]
    fn test_position_order() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(1, 2) < Position::new(1, 3));
        assert_eq!(Position::from((4, 2)), Position::new(4, 2));
        assert!(Position::min() < Position::max());
    }
}

use crate::mapping::{Mapping, Position};
use std::cell::Cell;

// lookups this close to the last one on the same line scan instead of bisecting
const LINEAR_SEARCH_DISTANCE: u32 = 32;

/// `MappingFinder` is a helper struct for finding mappings within [Mappings](crate::Mappings).
///
/// It remembers the last result, which makes it efficient for lookups that move through the
/// generated file in small increments.
#[derive(Debug)]
pub struct MappingFinder<'a> {
    mappings: &'a [Mapping],
    // generated pos and index of the last finding
    last: Cell<Option<(Position, usize)>>,
}

impl<'a> MappingFinder<'a> {
    pub(crate) fn new(mappings: &'a [Mapping]) -> Self {
        Self {
            mappings,
            last: Cell::new(None),
        }
    }

    /// Finds the mapping for a given generated position.
    ///
    /// If an exact match is not found, this method returns the closest preceding mapping.
    /// If there are no preceding mappings, it returns `None`.
    pub fn find_mapping<P>(&self, pos: P) -> Option<Mapping>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        let idx = match self.last.get() {
            Some((last_pos, last_idx)) if last_pos == pos => Some(last_idx),
            Some((last_pos, last_idx)) if last_pos < pos => {
                let near = pos.line == last_pos.line
                    && pos.column - last_pos.column <= LINEAR_SEARCH_DISTANCE;
                // everything up to last_idx is <= pos, the answer is at or after it
                let upper = if near {
                    self.mappings[last_idx + 1..]
                        .iter()
                        .position(|m| m.generated() > pos)
                        .map_or(self.mappings.len(), |offset| last_idx + 1 + offset)
                } else {
                    last_idx + 1
                        + self.mappings[last_idx + 1..].partition_point(|m| m.generated() <= pos)
                };
                Some(upper - 1)
            }
            Some((_, last_idx)) => find_closest(&self.mappings[..last_idx], pos),
            None => find_closest(self.mappings, pos),
        }?;

        let found = self.mappings[idx];
        self.last.set(Some((found.generated(), idx)));
        Some(found)
    }
}

/// Returns the index of the last mapping at or before `pos`.
pub(crate) fn find_closest(mappings: &[Mapping], pos: Position) -> Option<usize> {
    match mappings.partition_point(|m| m.generated() <= pos) {
        0 => None,
        upper => Some(upper - 1),
    }
}

use crate::error::to_u32;
use crate::finder::{find_closest, MappingFinder};
use crate::mapping::{Mapping, OriginalLocation, Position};
use crate::splitter::Splitter;
use crate::vlq::{VlqDecoder, VlqEncoder};
use crate::{Error, Result};
use std::fmt::{Debug, Formatter};
use std::io;
use std::io::Write;
use std::ops::Deref;

/// `Mappings` is a sorted collection of [Mapping] entries, together with the number of
/// sources and names registered so far.
///
/// The counts grow with every merged set, so that the source and name indices of each set
/// land after those of the sets merged before it.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Mappings {
    entries: Vec<Mapping>,
    sources: u32,
    names: u32,
}

impl Deref for Mappings {
    type Target = [Mapping];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl Debug for Mappings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mappings ({} sources, {} names)", self.sources, self.names)?;
        let mut last_line = None;
        for mapping in &self.entries {
            let line = mapping.generated().line;
            if last_line == Some(line) {
                f.write_str(", ")?;
            } else {
                if last_line.is_some() {
                    f.write_str("\n")?;
                }
                f.write_str("  ")?;
            }
            write!(f, "{mapping:?}")?;
            last_line = Some(line);
        }
        Ok(())
    }
}

impl Mappings {
    /// Creates an empty collection with no registered sources or names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `mappings` string whose indices refer to `sources` sources and `names` names.
    pub fn parse(input: &str, sources: u32, names: u32) -> Result<Self> {
        let mut mappings = Self::new();
        mappings.add_mappings(input, sources, names, Position::min())?;
        Ok(mappings)
    }

    /// Creates a collection from entries and the counts their indices refer to.
    ///
    /// The entries are sorted by their generated positions.
    pub fn from_entries(mut entries: Vec<Mapping>, sources: u32, names: u32) -> Self {
        entries.sort_by_key(Mapping::generated);
        Self {
            entries,
            sources,
            names,
        }
    }

    /// Total number of sources registered by every merged set.
    #[inline]
    pub fn sources_count(&self) -> u32 {
        self.sources
    }

    /// Total number of names registered by every merged set.
    #[inline]
    pub fn names_count(&self) -> u32 {
        self.names
    }

    pub fn into_vec(self) -> Vec<Mapping> {
        self.entries
    }
}

impl Mappings {
    /// Finds the mapping for a given generated position.
    ///
    /// If an exact match is not found, this method returns the closest preceding mapping.
    /// If there are no preceding mappings, it returns `None`.
    pub fn find_mapping<P>(&self, pos: P) -> Option<Mapping>
    where
        P: Into<Position>,
    {
        find_closest(&self.entries, pos.into()).map(|idx| self.entries[idx])
    }

    /// Creates a stateful [MappingFinder], faster for lookups that walk the positions in order.
    pub fn finder(&self) -> MappingFinder {
        MappingFinder::new(&self.entries)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct DecodeState {
    pub(crate) generated_line: u32,
    pub(crate) generated_col: u32,
    pub(crate) source_id: u32,
    pub(crate) name_id: u32,
}

/// Absolute values carried from one segment to the next.
///
/// Values are relative to the set being decoded and only checked against the `u32`
/// range when a mapping is built.
#[derive(Debug, Default)]
struct RunningState {
    generated_col: i64,
    source_id: i64,
    source_line: i64,
    source_col: i64,
    name_id: i64,
}

impl RunningState {
    fn apply(
        &mut self,
        generated_line: u32,
        fields: &[i64],
        base: &DecodeState,
    ) -> Result<Mapping> {
        self.generated_col = self.generated_col.saturating_add(fields[0]);
        let generated_col = to_u32("generated column", self.generated_col)?;
        let mapping = Mapping::new(generated_line, generated_col);

        let &[_, source_id, source_line, source_col, ref rest @ ..] = fields else {
            return Ok(mapping);
        };

        self.source_id = self.source_id.saturating_add(source_id);
        self.source_line = self.source_line.saturating_add(source_line);
        self.source_col = self.source_col.saturating_add(source_col);

        let mut mapping = mapping.with_source(
            renumber("source", self.source_id, base.source_id)?,
            to_u32("original line", self.source_line)?,
            to_u32("original column", self.source_col)?,
        );

        if let Some(&name_id) = rest.first() {
            self.name_id = self.name_id.saturating_add(name_id);
            mapping = mapping.with_name(renumber("name", self.name_id, base.name_id)?);
        }

        Ok(mapping)
    }
}

#[inline]
fn renumber(field: &'static str, relative: i64, base: u32) -> Result<u32> {
    if relative < 0 {
        return Err(Error::out_of_range(field, relative));
    }
    to_u32(field, relative + base as i64)
}

/// Decodes `source` into absolute mappings.
///
/// `state` seeds the decoding: every generated line is moved down by `generated_line`,
/// columns of the first line are moved right by `generated_col`, and source and name
/// indices are renumbered from `source_id` and `name_id`.
///
/// Segments of a line may come in any column order, the returned mappings are sorted.
pub(crate) fn decode(source: &str, state: &DecodeState) -> Result<Vec<Mapping>> {
    let mut entries = Vec::new();
    let mut decoder = VlqDecoder::new();
    let mut running = RunningState {
        generated_col: state.generated_col as i64,
        ..RunningState::default()
    };

    for (line_idx, line) in Splitter::new(source, b';').enumerate() {
        if !line.is_empty() {
            let generated_line =
                to_u32("generated line", state.generated_line as i64 + line_idx as i64)?;
            let line_start = entries.len();
            for segment in Splitter::new(line, b',') {
                let fields = decoder.decode(segment)?;
                entries.push(running.apply(generated_line, fields, state)?);
            }
            // stable, segments on the same column keep their order
            entries[line_start..].sort_by_key(Mapping::generated);
        }

        running.generated_col = 0;
    }

    Ok(entries)
}

impl Mappings {
    /// Merges another `mappings` string into the collection.
    ///
    /// The new mappings are moved down by `offset.line` lines, the ones on their first line
    /// are also moved right by `offset.column` columns. Their source and name indices are
    /// renumbered after the sources and names registered so far, then `sources` and `names`
    /// are added to those counts.
    ///
    /// Mappings are kept sorted by generated position; when the new set starts before the
    /// end of the collection it is merged in rather than appended. On error the collection
    /// is left untouched.
    ///
    /// A mapping landing on the generated position of an existing one does not replace it.
    /// Both are kept, the existing one first, and the encoder writes the second with a zero
    /// column delta.
    pub fn add_mappings<P>(
        &mut self,
        input: &str,
        sources: u32,
        names: u32,
        offset: P,
    ) -> Result<()>
    where
        P: Into<Position>,
    {
        let offset = offset.into();
        let sources_total = to_u32("sources count", self.sources as i64 + sources as i64)?;
        let names_total = to_u32("names count", self.names as i64 + names as i64)?;

        let incoming = decode(
            input,
            &DecodeState {
                generated_line: offset.line,
                generated_col: offset.column,
                source_id: self.sources,
                name_id: self.names,
            },
        )?;
        tracing::debug!(
            count = incoming.len(),
            line_offset = offset.line,
            column_offset = offset.column,
            "merging mappings"
        );

        self.extend_sorted(incoming);
        self.sources = sources_total;
        self.names = names_total;
        Ok(())
    }

    /// Inserts one mapping after every entry at or before its generated position.
    ///
    /// Entries on the same position are kept, as in [add_mappings](Self::add_mappings).
    pub fn add_mapping(&mut self, mapping: Mapping) {
        let pos = mapping.generated();
        let idx = self.entries.partition_point(|m| m.generated() <= pos);
        self.entries.insert(idx, mapping);
    }

    fn extend_sorted(&mut self, incoming: Vec<Mapping>) {
        let overlaps = match (self.entries.last(), incoming.first()) {
            (Some(last), Some(first)) => first.generated() < last.generated(),
            _ => false,
        };
        if !overlaps {
            self.entries.extend(incoming);
            return;
        }

        tracing::trace!(
            existing = self.entries.len(),
            incoming = incoming.len(),
            "merging overlapping mappings in order"
        );
        let existing = std::mem::take(&mut self.entries);
        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        let mut existing = existing.into_iter().peekable();
        let mut incoming = incoming.into_iter().peekable();
        loop {
            // on equal positions the mappings merged earlier come first
            let take_existing = match (existing.peek(), incoming.peek()) {
                (Some(a), Some(b)) => a.generated() <= b.generated(),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            merged.extend(if take_existing {
                existing.next()
            } else {
                incoming.next()
            });
        }
        self.entries = merged;
    }

    /// Moves every mapping on line `from_line` or below by `delta` lines.
    ///
    /// When moving up, the mappings already on the lines being covered
    /// (`from_line + delta..from_line`) are removed.
    pub fn offset_lines(&mut self, from_line: u32, delta: i64) -> Result<()> {
        let start = to_u32("generated line", from_line as i64 + delta)?;
        let split = self.entries.partition_point(|m| m.generated.line < from_line);
        if let Some(last) = self.entries.last().filter(|_| split < self.entries.len()) {
            to_u32("generated line", last.generated.line as i64 + delta)?;
        }
        if delta == 0 {
            return Ok(());
        }

        let mut moved = self.entries.split_off(split);
        if delta < 0 {
            let keep = self.entries.partition_point(|m| m.generated.line < start);
            self.entries.truncate(keep);
        }
        for mapping in &mut moved {
            mapping.generated.line = (mapping.generated.line as i64 + delta) as u32;
        }
        self.entries.append(&mut moved);
        Ok(())
    }

    /// Moves every mapping on `line` at column `from_column` or after by `delta` columns.
    ///
    /// When moving left, the mappings already on the columns being covered
    /// (`from_column + delta..from_column`) are removed.
    pub fn offset_columns(&mut self, line: u32, from_column: u32, delta: i64) -> Result<()> {
        let start = to_u32("generated column", from_column as i64 + delta)?;
        let line_start = self.entries.partition_point(|m| m.generated.line < line);
        let line_end = self.entries.partition_point(|m| m.generated.line <= line);
        let on_line = &self.entries[line_start..line_end];

        let first_moved =
            line_start + on_line.partition_point(|m| m.generated.column < from_column);
        if first_moved < line_end {
            let last = &self.entries[line_end - 1];
            to_u32("generated column", last.generated.column as i64 + delta)?;
        }
        if delta == 0 {
            return Ok(());
        }

        for mapping in &mut self.entries[first_moved..line_end] {
            mapping.generated.column = (mapping.generated.column as i64 + delta) as u32;
        }
        if delta < 0 {
            let drop_from = line_start
                + self.entries[line_start..first_moved]
                    .partition_point(|m| m.generated.column < start);
            self.entries.drain(drop_from..first_moved);
        }
        Ok(())
    }
}

impl Mappings {
    /// Encodes the collection back into a `mappings` string.
    pub fn encode<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let mut prev_generated_line = 0;
        let mut prev_generated_col = 0;
        let mut prev_source_id = 0;
        let mut prev_source_line = 0;
        let mut prev_source_col = 0;
        let mut prev_name_id = 0;

        for (idx, mapping) in self.entries.iter().enumerate() {
            let generated_pos = mapping.generated();

            if generated_pos.line != prev_generated_line {
                prev_generated_col = 0;
                let skipped = (generated_pos.line - prev_generated_line) as usize;
                writer.write_all(&b";".repeat(skipped))?;
                prev_generated_line = generated_pos.line;
            } else if idx != 0 {
                writer.write_all(b",")?;
            }

            let mut encoder = VlqEncoder::new(writer);

            encoder.encode(prev_generated_col, generated_pos.column)?;
            prev_generated_col = generated_pos.column;

            if let Some(&OriginalLocation {
                source,
                line,
                column,
                name,
            }) = mapping.original()
            {
                encoder.encode(prev_source_id, source)?;
                prev_source_id = source;

                encoder.encode(prev_source_line, line)?;
                prev_source_line = line;

                encoder.encode(prev_source_col, column)?;
                prev_source_col = column;

                if let Some(name_id) = name {
                    encoder.encode(prev_name_id, name_id)?;
                    prev_name_id = name_id;
                }
            }
        }

        Ok(())
    }

    #[inline]
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        let mut v = Vec::with_capacity(self.entries.len() * 6);
        self.encode(&mut v)?;
        Ok(v)
    }

    /// Encodes the collection into a new `String`.
    #[inline]
    pub fn to_string(&self) -> io::Result<String> {
        // SAFETY: the encoder only writes base64 characters, ',' and ';'
        self.to_vec().map(|v| unsafe { String::from_utf8_unchecked(v) })
    }

    /// Checks that the mappings are ordered and only reference registered sources and names.
    pub fn validate(&self) -> Result<()> {
        let mut last_generated_pos = Position::min();

        for mapping in &self.entries {
            let pos = mapping.generated();
            if pos < last_generated_pos {
                return Err(Error::UnorderedMappings);
            }
            last_generated_pos = pos;
            if let Some(original) = mapping.original() {
                if original.source >= self.sources {
                    return Err(Error::UnknownSourceReference(original.source));
                }

                if let Some(name_id) = original.name {
                    if name_id >= self.names {
                        return Err(Error::UnknownNameReference(name_id));
                    }
                }
            }
        }

        Ok(())
    }
}

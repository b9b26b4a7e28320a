use splicemap::{Mapping, Mappings};

/// Builds a `mappings` string shaped like minified output: few long lines, many segments.
pub fn generate_mappings(lines: u32, segments_per_line: u32) -> String {
    let mut entries = Vec::with_capacity((lines * segments_per_line) as usize);
    for line in 0..lines {
        for idx in 0..segments_per_line {
            let mapping =
                Mapping::new(line, idx * 7).with_source(idx % 3, line * 4 + idx / 8, idx % 40);
            entries.push(if idx % 5 == 0 {
                mapping.with_name(idx % 11)
            } else {
                mapping
            });
        }
    }
    Mappings::from_entries(entries, 3, 11).to_string().unwrap()
}

use memchr::Memchr;

/// Splits a string on a single ASCII separator.
///
/// Behaves like [str::split], an empty input yields one empty piece.
#[derive(Debug)]
pub(crate) struct Splitter<'a> {
    string: &'a str,
    cur_start: usize,
    finished: bool,
    memchr: Memchr<'a>,
}

impl<'a> Splitter<'a> {
    pub fn new(string: &'a str, separator: u8) -> Self {
        debug_assert!(separator.is_ascii());
        Self {
            string,
            cur_start: 0,
            finished: false,
            memchr: memchr::memchr_iter(separator, string.as_bytes()),
        }
    }
}

impl<'a> Iterator for Splitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        // separators are ASCII, so both ends are char boundaries
        match self.memchr.next() {
            Some(end) => {
                let s = &self.string[self.cur_start..end];
                self.cur_start = end + 1;
                Some(s)
            }
            None => {
                self.finished = true;
                Some(&self.string[self.cur_start..])
            }
        }
    }
}

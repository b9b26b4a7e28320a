use crate::{Error, Result};
use std::io;
use std::io::Write;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE64_VALUES: [i8; 256] = get_base64_map();

const CONTINUATION_BIT: u8 = 0b100000;
const DIGIT_MASK: u8 = 0b11111;
// 13 groups carry 65 bits, the last group may only use 4 of them
const MAX_SHIFT: u32 = 60;

const fn get_base64_map() -> [i8; 256] {
    let mut res = [-1i8; 256];
    // `for in` is not allowed in const fn
    let mut idx = 0;
    while idx < 64 {
        res[BASE64_CHARS[idx] as usize] = idx as i8;
        idx += 1;
    }
    res
}

/// Decodes the base64 VLQ value starting at `pos` in `input`.
///
/// Returns the value and the position right after its last group.
///
/// # Errors
///
/// [Error::MalformedVlq] is returned when a character is outside the base64 alphabet,
/// when the continuation chain runs past the end of `input`, or when the value does not
/// fit in 64 bits.
pub fn decode_vlq(input: &[u8], mut pos: usize) -> Result<(i64, usize)> {
    let mut acc = 0u64;
    let mut shift = 0;

    loop {
        let Some(&byte) = input.get(pos) else {
            return Err(malformed(input));
        };
        pos += 1;

        let value = BASE64_VALUES[byte as usize];
        if value < 0 {
            return Err(malformed(input));
        }
        let value = value as u8;
        let digit = (value & DIGIT_MASK) as u64;

        if shift > MAX_SHIFT || (shift == MAX_SHIFT && digit > 0b1111) {
            return Err(malformed(input));
        }
        acc |= digit << shift;
        shift += 5;

        if value & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // acc >> 1 never exceeds i64::MAX
    let magnitude = (acc >> 1) as i64;
    let value = if acc & 1 == 1 { -magnitude } else { magnitude };
    Ok((value, pos))
}

/// Writes `value` as base64 VLQ.
///
/// Every `i64` except `i64::MIN` is supported.
pub fn encode_vlq<W>(value: i64, writer: &mut W) -> io::Result<()>
where
    W: Write,
{
    let mut num = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    let mut buf = [0u8; 13];
    let mut len = 0;
    loop {
        let mut digit = (num & DIGIT_MASK as u64) as u8;
        num >>= 5;
        if num != 0 {
            digit |= CONTINUATION_BIT;
        }
        buf[len] = BASE64_CHARS[digit as usize];
        len += 1;
        if num == 0 {
            break;
        }
    }

    writer.write_all(&buf[..len])
}

#[cold]
fn malformed(input: &[u8]) -> Error {
    Error::MalformedVlq(String::from_utf8_lossy(input).into_owned())
}

/// Decodes whole segments, reusing one fixed buffer for their fields.
#[derive(Debug)]
pub(crate) struct VlqDecoder {
    buf: [i64; 5],
}

impl VlqDecoder {
    pub fn new() -> Self {
        Self { buf: [0; 5] }
    }

    /// Decodes every field of `segment`, which must hold 1, 4 or 5 of them.
    pub fn decode(&mut self, segment: &str) -> Result<&[i64]> {
        let bytes = segment.as_bytes();
        let mut len = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            if len == self.buf.len() {
                return Err(Error::MalformedSegment(segment.to_owned()));
            }
            let (value, next) = decode_vlq(bytes, pos)?;
            self.buf[len] = value;
            len += 1;
            pos = next;
        }

        if !matches!(len, 1 | 4 | 5) {
            return Err(Error::MalformedSegment(segment.to_owned()));
        }
        Ok(&self.buf[..len])
    }
}

/// Writes the delta between two absolute values.
#[derive(Debug)]
pub(crate) struct VlqEncoder<'a, W>
where
    W: Write,
{
    writer: &'a mut W,
}

impl<'a, W> VlqEncoder<'a, W>
where
    W: Write,
{
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    #[inline]
    pub fn encode(&mut self, prev: u32, cur: u32) -> io::Result<()> {
        encode_vlq(cur as i64 - prev as i64, self.writer)
    }
}

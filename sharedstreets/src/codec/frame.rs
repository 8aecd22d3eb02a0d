//! Varint length-delimited framing.

use std::ops::Range;

use prost::encoding::decode_varint;

use super::DecodeError;

/// Reads the frame starting at `*pos` and advances `pos` past it.
///
/// Returns `None` once the buffer is exhausted. A bad or overrunning length
/// prefix yields one error and moves `pos` to the end of the buffer, since
/// nothing after it can be trusted.
pub(crate) fn next_frame(
    buf: &[u8],
    pos: &mut usize,
) -> Option<Result<Range<usize>, DecodeError>> {
    if *pos >= buf.len() {
        return None;
    }

    let offset = *pos;
    let mut cursor = &buf[offset..];
    let remaining = cursor.len();

    let declared = match decode_varint(&mut cursor) {
        Ok(len) => len,
        Err(_) => {
            *pos = buf.len();
            return Some(Err(DecodeError::BadLengthPrefix { offset }));
        }
    };

    let start = offset + (remaining - cursor.len());
    let available = buf.len() - start;

    match usize::try_from(declared) {
        Ok(len) if len <= available => {
            *pos = start + len;
            Some(Ok(start..start + len))
        }
        _ => {
            *pos = buf.len();
            Some(Err(DecodeError::Truncated {
                offset,
                expected: declared,
                available,
            }))
        }
    }
}

/// Iterator over the raw frames of an in-memory layer buffer.
///
/// Single pass; stops after the first framing error.
#[derive(Debug, Clone)]
pub struct FramedRecords<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FramedRecords<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset of the next unread frame.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for FramedRecords<'a> {
    type Item = Result<&'a [u8], DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let buf = self.buf;
        next_frame(buf, &mut self.pos).map(|frame| frame.map(|range| &buf[range]))
    }
}

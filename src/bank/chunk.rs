use std::io::{Read, Seek};
use std::str::from_utf8;

use log::debug;

use crate::bank::error::BankError;
use crate::bank::header::{CHUNK_COUNT_OFFSET, TOC_SIZE_OFFSET};
use crate::cursor::ByteCursor;

pub const TONE_MAGIC: [u8; 4] = *b"TONE";

// Tag + payload size
const CHUNK_HEADER_LEN: u64 = 8;

/// A top-level chunk as found in the chunk list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkHeader {
    pub tag: [u8; 4],
    /// Absolute offset of the chunk header (the tag).
    pub offset: u64,
    /// Payload size, excluding the 8 byte header.
    pub size: u32,
}

impl ChunkHeader {
    /// Absolute offset where the payload begins.
    pub fn data_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_LEN
    }

    pub fn tag_str(&self) -> &str {
        from_utf8(&self.tag).unwrap_or("????")
    }
}

/// Walks the top-level chunk list in file order.
///
/// Chunks are packed back to back, the next header begins where the previous
/// payload ends. The walk stops after the number of chunks the header
/// announces, or at the first error.
pub struct ChunkWalker<'a, S> {
    cursor: &'a mut ByteCursor<S>,
    remaining: u32,
    offset: u64,
    end: u64,
}

impl<'a, S: Read + Seek> ChunkWalker<'a, S> {
    pub fn new(cursor: &'a mut ByteCursor<S>) -> Result<Self, BankError> {
        let toc_size = cursor.read_u32_at(TOC_SIZE_OFFSET)?;
        let count = cursor.read_u32_at(CHUNK_COUNT_OFFSET)?;
        let end = cursor.stream_len()?;

        debug!("chunk list: {} chunks, toc size {:#x}", count, toc_size);

        Ok(ChunkWalker {
            cursor,
            remaining: count,
            offset: CHUNK_COUNT_OFFSET + toc_size as u64,
            end,
        })
    }

    fn read_header(&mut self) -> Result<ChunkHeader, BankError> {
        if self.offset + CHUNK_HEADER_LEN > self.end {
            return Err(BankError::StructuralMismatch {
                reason: format!(
                    "chunk header at {:#x} runs past the end of the bank ({:#x})",
                    self.offset, self.end
                ),
            });
        }

        let header = ChunkHeader {
            tag: self.cursor.read_tag_at(self.offset)?,
            offset: self.offset,
            size: self.cursor.read_u32_at(self.offset + 4)?,
        };

        let next = header.data_offset() + header.size as u64;
        if next > self.end {
            return Err(BankError::StructuralMismatch {
                reason: format!(
                    "chunk {:?} at {:#x} claims {:#x} bytes past the end of the bank",
                    header.tag_str(),
                    header.offset,
                    next - self.end
                ),
            });
        }

        self.offset = next;
        Ok(header)
    }
}

impl<'a, S: Read + Seek> Iterator for ChunkWalker<'a, S> {
    type Item = Result<ChunkHeader, BankError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match self.read_header() {
            Ok(header) => {
                self.remaining -= 1;
                Some(Ok(header))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

/// Payload offset of the `TONE` chunk (the entry table).
pub fn find_tone<S: Read + Seek>(cursor: &mut ByteCursor<S>) -> Result<u64, BankError> {
    for chunk in ChunkWalker::new(cursor)? {
        let chunk = chunk?;
        if chunk.tag == TONE_MAGIC {
            debug!("TONE chunk at {:#x}, {:#x} bytes", chunk.offset, chunk.size);
            return Ok(chunk.data_offset());
        }
    }

    Err(BankError::StructuralMismatch {
        reason: "no TONE chunk in the chunk list".to_string(),
    })
}

use std::io::{Read, Seek};

use log::debug;

use crate::bank::error::BankError;
use crate::cursor::ByteCursor;

// Relative offset + size per entry
const DESCRIPTOR_LEN: u64 = 8;

const FLAGS_OFFSET: u64 = 7;
const NAME_LEN_OFFSET: u64 = 8;
pub const FLAG_EXTENDED: u8 = 0x80;
// Extended records carry 4 more bytes ahead of the name
const EXTENDED_SKIP: u64 = 4;
// Distance from the end of the padded name to the volume sub-record
const VOLUME_RECORD_SKIP: u64 = 0xC;

/// The entry table held in the `TONE` chunk payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneTable {
    offset: u64,
    count: u32,
}

impl ToneTable {
    pub fn read<S: Read + Seek>(cursor: &mut ByteCursor<S>, offset: u64) -> Result<Self, BankError> {
        let count = cursor.read_u32_at(offset)?;
        debug!("tone table at {:#x}: {} entries", offset, count);

        Ok(ToneTable { offset, count })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Absolute offset of the record for entry `idx`.
    pub fn entry_for<S: Read + Seek>(
        &self,
        cursor: &mut ByteCursor<S>,
        idx: u32,
    ) -> Result<u64, BankError> {
        if idx >= self.count {
            return Err(BankError::IndexOutOfRange {
                idx,
                count: self.count,
            });
        }

        let descriptor = self.offset + 4 + idx as u64 * DESCRIPTOR_LEN;
        let relative = cursor.read_u32_at(descriptor)?;

        Ok(self.offset + relative as u64)
    }
}

/// The leading part of an entry record, up to and including the name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryRecord {
    pub offset: u64,
    pub flags: u8,
    pub name_offset: u64,
    pub name_len: u8,
}

impl EntryRecord {
    pub fn read<S: Read + Seek>(cursor: &mut ByteCursor<S>, offset: u64) -> Result<Self, BankError> {
        let flags = cursor.read_u8_at(offset + FLAGS_OFFSET)?;

        let mut len_offset = offset + NAME_LEN_OFFSET;
        if flags & FLAG_EXTENDED != 0 {
            len_offset += EXTENDED_SKIP;
        }
        let name_len = cursor.read_u8_at(len_offset)?;

        Ok(EntryRecord {
            offset,
            flags,
            name_offset: len_offset + 1,
            name_len,
        })
    }

    pub fn name<S: Read + Seek>(&self, cursor: &mut ByteCursor<S>) -> Result<String, BankError> {
        let raw = cursor.read_bytes_at(self.name_offset, self.name_len as usize)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Where the volume sub-record would be, if this entry has one.
    ///
    /// The length byte and the name are padded together to a 4 byte boundary,
    /// followed by 12 bytes of other entry data.
    pub fn volume_record_offset(&self) -> u64 {
        let padded = (self.name_len as u64 + 1).div_ceil(4) * 4;
        (self.name_offset - 1) + padded + VOLUME_RECORD_SKIP
    }
}

//! NUS3BANK audio bank container
//!
//! A bank is a chunked binary container holding audio entries ("tones").
//! This module only understands enough of it to find the volume of one
//! entry and rewrite it in place. Audio payloads, entry counts and every
//! chunk besides `TONE` are left alone.
//!
//! Unless otherwise noted everything is stored in Little Endian format.
//!
//! # Header
//!
//! | Offset | Type    | Name     | Description |
//! | -----: | ------: | -------- | ----------- |
//! | 0x00   | [u8; 4] | magic    | `NUS3` |
//! | 0x04   | u32     | size     | Size of the rest of the file, not used |
//! | 0x08   | [u8; 4] | magic    | `BANK` |
//! | 0x0C   | [u8; 4] | magic    | `TOC ` |
//! | 0x10   | u32     | toc_size | Size of the table of contents, counted from 0x14 |
//! | 0x14   | u32     | count    | Number of top level chunks |
//!
//! # Chunk List
//!
//! The first chunk begins at `0x14 + toc_size`. Each chunk is an 8 byte header
//! followed directly by its payload, and the next chunk begins right where the
//! payload ends. There is no padding between chunks at this level.
//!
//! | Type    | Name | Description |
//! | ------: | ---- | ----------- |
//! | [u8; 4] | tag  | The chunk type, ASCII such as `PROP`, `BINF`, `TONE` |
//! | u32     | size | Length of the payload |
//! | [u8; N] | data | Payload |
//!
//! ## TONE
//!
//! The entry table. Offsets in the descriptors are relative to the start of
//! this payload.
//!
//! | Type            | Name    | Description |
//! | --------------: | ------- | ----------- |
//! | u32             | count   | Number of entries |
//! | [(u32, u32); N] | entries | Relative offset and size of each entry record |
//!
//! ## Entry Record
//!
//! | Offset | Type    | Name  | Description |
//! | -----: | ------: | ----- | ----------- |
//! | +0x07  | u8      | flags | Bit `0x80` moves the name 4 bytes further in |
//! | +0x08  | u8      | len   | Name length (`+0x0C` if flag `0x80` is set) |
//! | +0x09  | [u8; N] | name  | ASCII name, not terminated |
//!
//! The length byte and the name are padded together to a multiple of 4. The
//! volume sub-record sits `0xC` bytes after that padding:
//!
//! | Type | Name   | Description |
//! | ---: | ------ | ----------- |
//! | u32  | tag    | `0x000022E8`, any other value means the entry has no volume |
//! | f32  | volume | IEEE-754 single precision |
pub mod chunk;
pub mod error;
pub mod header;
pub mod tone;
pub mod volume;

#[cfg(test)]
pub(crate) mod builder;

use std::io::{Read, Seek, Write};

use log::{debug, info};

pub use crate::bank::chunk::ChunkHeader;
pub use crate::bank::error::BankError;

use crate::bank::chunk::ChunkWalker;
use crate::bank::tone::{EntryRecord, ToneTable};
use crate::bank::volume::VolumeField;
use crate::cursor::ByteCursor;

/// One entry as presented to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub idx: u32,
    pub name: String,
    /// `None` for entries without a volume sub-record.
    pub volume: Option<f32>,
}

/// An opened bank.
///
/// Opening validates the header and resolves the entry table once, every
/// entry access after that is a handful of absolute reads. The handle owns
/// the source until [`Bank::into_inner`] hands it back.
pub struct Bank<S> {
    cursor: ByteCursor<S>,
    tone: ToneTable,
}

impl<S: Read + Seek> Bank<S> {
    pub fn open(source: S) -> Result<Self, BankError> {
        let mut cursor = ByteCursor::new(source);

        header::validate(&mut cursor)?;
        let tone_offset = chunk::find_tone(&mut cursor)?;
        let tone = ToneTable::read(&mut cursor, tone_offset)?;

        Ok(Bank { cursor, tone })
    }

    pub fn entry_count(&self) -> u32 {
        self.tone.count()
    }

    /// Absolute offset of the `TONE` payload.
    pub fn tone_offset(&self) -> u64 {
        self.tone.offset()
    }

    pub fn into_inner(self) -> S {
        self.cursor.into_inner()
    }

    fn record(&mut self, idx: u32) -> Result<EntryRecord, BankError> {
        let offset = self.tone.entry_for(&mut self.cursor, idx)?;
        EntryRecord::read(&mut self.cursor, offset)
    }

    fn volume_field(&mut self, idx: u32) -> Result<VolumeField, BankError> {
        let record = self.record(idx)?;
        VolumeField::locate(&mut self.cursor, idx, &record)
    }

    pub fn get_name(&mut self, idx: u32) -> Result<String, BankError> {
        let record = self.record(idx)?;
        record.name(&mut self.cursor)
    }

    pub fn get_volume(&mut self, idx: u32) -> Result<f32, BankError> {
        let field = self.volume_field(idx)?;
        field.get(&mut self.cursor)
    }

    /// Name and volume of entry `idx`, unsupported entries have no volume.
    pub fn entry(&mut self, idx: u32) -> Result<Entry, BankError> {
        let record = self.record(idx)?;
        let name = record.name(&mut self.cursor)?;

        let volume = match VolumeField::locate(&mut self.cursor, idx, &record) {
            Ok(field) => Some(field.get(&mut self.cursor)?),
            Err(BankError::UnsupportedEntry { tag, .. }) => {
                debug!("entry {} ({}) has tag {:#010x}, no volume", idx, name, tag);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Entry { idx, name, volume })
    }

    pub fn entries(&mut self) -> Result<Vec<Entry>, BankError> {
        (0..self.entry_count()).map(|idx| self.entry(idx)).collect()
    }
}

impl<S: Read + Write + Seek> Bank<S> {
    /// Overwrite the volume of entry `idx`.
    ///
    /// Only the 4 bytes of the value change. The whole offset chain, and the
    /// presence of the old value, is checked before anything is written.
    pub fn set_volume(&mut self, idx: u32, value: f32) -> Result<(), BankError> {
        let field = self.volume_field(idx)?;
        let old = field.get(&mut self.cursor)?;

        field.set(&mut self.cursor, value)?;
        info!("entry {} volume {} -> {}", idx, old, value);
        Ok(())
    }
}

/// Validate the header of `source` and list its top level chunks.
pub fn chunks<S: Read + Seek>(source: S) -> Result<Vec<ChunkHeader>, BankError> {
    let mut cursor = ByteCursor::new(source);
    header::validate(&mut cursor)?;

    let walker = ChunkWalker::new(&mut cursor)?;
    walker.collect()
}

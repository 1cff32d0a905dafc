use std::io::{Read, Seek, Write};

use log::debug;

use crate::bank::error::BankError;
use crate::bank::tone::EntryRecord;
use crate::cursor::ByteCursor;

/// Tag that marks the volume sub-record of an entry.
pub const VOLUME_TAG: u32 = 0x0000_22E8;

/// Location of a validated volume value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeField {
    /// Absolute offset of the 4 byte float, right after the tag.
    pub offset: u64,
}

impl VolumeField {
    /// Check the sub-record tag of entry `idx` and locate its value.
    ///
    /// Entries of other kinds (sound effects in `se_*` banks for example)
    /// carry some other tag here and have no volume to edit.
    pub fn locate<S: Read + Seek>(
        cursor: &mut ByteCursor<S>,
        idx: u32,
        record: &EntryRecord,
    ) -> Result<Self, BankError> {
        let at = record.volume_record_offset();
        let tag = cursor.read_u32_at(at)?;

        if tag != VOLUME_TAG {
            return Err(BankError::UnsupportedEntry { idx, tag });
        }

        debug!("entry {} volume at {:#x}", idx, at + 4);
        Ok(VolumeField { offset: at + 4 })
    }

    pub fn get<S: Read + Seek>(&self, cursor: &mut ByteCursor<S>) -> Result<f32, BankError> {
        Ok(cursor.read_f32_at(self.offset)?)
    }

    pub fn set<S: Read + Write + Seek>(
        &self,
        cursor: &mut ByteCursor<S>,
        value: f32,
    ) -> Result<(), BankError> {
        Ok(cursor.write_f32_at(self.offset, value)?)
    }
}

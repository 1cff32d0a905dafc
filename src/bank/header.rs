use std::io::{ErrorKind, Read, Seek};

use log::debug;

use crate::bank::error::BankError;
use crate::cursor::ByteCursor;

pub const NUS3_MAGIC: [u8; 4] = *b"NUS3";
pub const BANK_MAGIC: [u8; 4] = *b"BANK";
pub const TOC_MAGIC: [u8; 4] = *b"TOC ";

pub const TOC_SIZE_OFFSET: u64 = 0x10;
pub const CHUNK_COUNT_OFFSET: u64 = 0x14;

// Checked in file order, the first mismatch stops any further reads
const MAGICS: [(u64, [u8; 4]); 3] = [(0x00, NUS3_MAGIC), (0x08, BANK_MAGIC), (0x0C, TOC_MAGIC)];

/// Check the fixed header tags of a bank.
pub fn validate<S: Read + Seek>(cursor: &mut ByteCursor<S>) -> Result<(), BankError> {
    for (offset, expected) in MAGICS.iter() {
        let found = match cursor.read_tag_at(*offset) {
            Ok(tag) => tag,
            // Too short to even hold the header
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => [0; 4],
            Err(e) => return Err(e.into()),
        };

        if &found != expected {
            return Err(BankError::InvalidMagic {
                offset: *offset,
                expected: *expected,
                found,
            });
        }
    }

    debug!("bank header ok");
    Ok(())
}

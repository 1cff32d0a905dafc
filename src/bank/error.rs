use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("invalid magic at {offset:#x}: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        offset: u64,
        expected: [u8; 4],
        found: [u8; 4],
    },
    #[error("unsupported bank layout: {reason}")]
    StructuralMismatch { reason: String },
    #[error("entry {idx} out of range, bank has {count} entries")]
    IndexOutOfRange { idx: u32, count: u32 },
    #[error("entry {idx} has no volume field (found tag {tag:#010x})")]
    UnsupportedEntry { idx: u32, tag: u32 },
}

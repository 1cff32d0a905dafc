//! Read and patch entry volumes in NUS3BANK audio banks.
//!
//! [`bank`] is the format engine and works on any seekable source. [`file`]
//! is the filesystem side: extension policy, backups and staged write-back.
pub mod bank;
pub mod cursor;
pub mod file;

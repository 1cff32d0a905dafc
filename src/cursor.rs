use std::io::{Read, Result, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Random access over a seekable byte source.
///
/// Every read and write takes an absolute offset from the start of the
/// source, so the cursor carries no position of its own that callers need to
/// track. All multi-byte values are little endian.
pub struct ByteCursor<S> {
    inner: S,
}

impl<S> ByteCursor<S> {
    pub fn new(source: S) -> Self {
        ByteCursor { inner: source }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S: Read + Seek> ByteCursor<S> {
    /// Total length of the source in bytes.
    pub fn stream_len(&mut self) -> Result<u64> {
        self.inner.seek(SeekFrom::End(0))
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn read_u8_at(&mut self, offset: u64) -> Result<u8> {
        self.seek(offset)?;
        self.inner.read_u8()
    }

    pub fn read_u32_at(&mut self, offset: u64) -> Result<u32> {
        self.seek(offset)?;
        self.inner.read_u32::<LittleEndian>()
    }

    pub fn read_f32_at(&mut self, offset: u64) -> Result<f32> {
        self.seek(offset)?;
        self.inner.read_f32::<LittleEndian>()
    }

    /// Read a 4-byte tag (chunk magic) as raw bytes.
    pub fn read_tag_at(&mut self, offset: u64) -> Result<[u8; 4]> {
        let mut tag = [0u8; 4];
        self.seek(offset)?;
        self.inner.read_exact(&mut tag)?;
        Ok(tag)
    }

    pub fn read_bytes_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut data = vec![0; len];
        self.seek(offset)?;
        self.inner.read_exact(&mut data[..])?;
        Ok(data)
    }
}

impl<S: Read + Write + Seek> ByteCursor<S> {
    /// Overwrite exactly 4 bytes at `offset` and flush the source.
    pub fn write_f32_at(&mut self, offset: u64, value: f32) -> Result<()> {
        self.seek(offset)?;
        self.inner.write_f32::<LittleEndian>(value)?;
        self.inner.flush()
    }
}

use byteorder::ByteOrder;

use crate::result::{Error, Result};

/// A bounds-checked cursor over a borrowed buffer.
///
/// `base` is the position of `buf[0]` in the caller's original buffer, so
/// error offsets stay meaningful when decoding starts past a GeoPackage header.
#[derive(Debug, Clone)]
pub struct WkbReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> WkbReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    pub fn with_base(buf: &'a [u8], base: usize) -> Self {
        WkbReader { buf, pos: 0, base }
    }

    /// Offset of the next unread byte, relative to the original buffer
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes consumed so far by this reader
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fails without consuming anything unless `needed` more bytes are available
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::TruncatedBuffer {
                offset: self.offset(),
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32<T: ByteOrder>(&mut self) -> Result<u32> {
        Ok(T::read_u32(self.take(4)?))
    }

    pub fn read_i32<T: ByteOrder>(&mut self) -> Result<i32> {
        Ok(T::read_i32(self.take(4)?))
    }

    pub fn read_f64<T: ByteOrder>(&mut self) -> Result<f64> {
        Ok(T::read_f64(self.take(8)?))
    }

    /// Reads a count field, rejecting counts whose items cannot possibly fit
    /// in what is left of the buffer before anything is allocated for them.
    pub fn read_count<T: ByteOrder>(&mut self, min_item_len: usize) -> Result<usize> {
        let count = self.read_u32::<T>()? as usize;
        let needed = count.saturating_mul(min_item_len);
        self.ensure(needed)?;
        Ok(count)
    }
}

use core::fmt::{self, Write};

use crate::{
  crc32::chunk_crc,
  error::{PngError, PngResult},
};

/// A chunk type tag, held as a big-endian `u32` magic number.
///
/// The four tag bytes are ASCII letters, and the case of each letter is a
/// property bit. The only one the decoder acts on is bit 5 of the first
/// byte: clear (uppercase) marks a *critical* chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTag(u32);
impl ChunkTag {
  /// `IHDR`: image header.
  pub const IHDR: Self = Self::new(*b"IHDR");
  /// `PLTE`: palette.
  pub const PLTE: Self = Self::new(*b"PLTE");
  /// `IDAT`: image data.
  pub const IDAT: Self = Self::new(*b"IDAT");
  /// `IEND`: image trailer.
  pub const IEND: Self = Self::new(*b"IEND");
  /// `gAMA`: image gamma.
  pub const GAMA: Self = Self::new(*b"gAMA");
  /// `bKGD`: background color.
  pub const BKGD: Self = Self::new(*b"bKGD");

  /// Makes a tag from the four bytes as they appear in the stream.
  #[inline]
  #[must_use]
  pub const fn new(bytes: [u8; 4]) -> Self {
    Self(u32::from_be_bytes(bytes))
  }

  /// The tag bytes in stream order.
  #[inline]
  #[must_use]
  pub const fn to_bytes(self) -> [u8; 4] {
    self.0.to_be_bytes()
  }

  /// Bit 5 of the first tag byte, set: the chunk is ancillary and an
  /// unrecognized one may be skipped. Clear: the chunk is critical and an
  /// unrecognized one aborts the decode.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.to_bytes()[0] & 0x20) != 0
  }
}
impl fmt::Debug for ChunkTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for byte in self.to_bytes() {
      f.write_char(byte as char)?;
    }
    Ok(())
  }
}

/// An unparsed chunk: framing only, payload uninterpreted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawChunk<'b> {
  /// The chunk's type tag.
  pub tag: ChunkTag,
  /// The payload bytes, `length` of them.
  pub data: &'b [u8],
  /// The CRC stored in the stream after the payload.
  pub declared_crc: u32,
}
impl RawChunk<'_> {
  /// Computes the real CRC of the tag and payload.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.tag.to_bytes(), self.data)
  }

  /// Errors with [`PngError::CrcMismatch`] unless the stored CRC matches
  /// the computed one.
  #[inline]
  pub fn check_crc(&self) -> PngResult<()> {
    if self.actual_crc() == self.declared_crc {
      Ok(())
    } else {
      Err(PngError::CrcMismatch)
    }
  }
}
impl fmt::Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RawChunk")
      .field("tag", &self.tag)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator producing successive raw chunks.
///
/// Construct it with the bytes immediately *after* the 8-byte PNG
/// signature. A stream that ends between chunks simply ends the iterator; a
/// stream that ends in the middle of a chunk yields one
/// [`PngError::TruncatedChunk`] and then ends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawChunkIter<'b>(&'b [u8]);
impl<'b> RawChunkIter<'b> {
  /// Makes an iterator over the chunk region of a PNG stream.
  #[inline]
  #[must_use]
  pub const fn new(bytes_after_signature: &'b [u8]) -> Self {
    Self(bytes_after_signature)
  }

  fn take(&mut self, n: usize) -> PngResult<&'b [u8]> {
    if self.0.len() >= n {
      let (head, rest) = self.0.split_at(n);
      self.0 = rest;
      Ok(head)
    } else {
      self.0 = &[];
      Err(PngError::TruncatedChunk)
    }
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = PngResult<RawChunk<'b>>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.0.is_empty() {
      return None;
    }
    let mut chunk = || -> PngResult<RawChunk<'b>> {
      let len_bytes = self.take(4)?;
      let chunk_len = u32::from_be_bytes(len_bytes.try_into().unwrap()) as usize;
      let tag = ChunkTag::new(self.take(4)?.try_into().unwrap());
      let data = self.take(chunk_len)?;
      let declared_crc = u32::from_be_bytes(self.take(4)?.try_into().unwrap());
      Ok(RawChunk { tag, data, declared_crc })
    };
    Some(chunk())
  }
}

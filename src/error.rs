/// The broad class of a [`PngError`].
///
/// Callers that don't care about the precise failure can branch on this
/// instead of the full error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
  /// The input isn't PNG data at all.
  NotPng,
  /// The input claims to be PNG data but violates the format.
  InvalidData,
  /// The input is valid, but the decoder won't process it.
  Unsupported,
  /// The allocator couldn't give us enough space.
  OutOfMemory,
}

/// An error while decoding PNG data.
///
/// Every failure aborts the whole decode. The decoder never hands back a
/// partially filled pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngError {
  /// The first 8 bytes aren't the PNG signature.
  NotPng,
  /// The stream ended in the middle of a chunk.
  TruncatedChunk,
  /// A chunk's stored CRC doesn't match the CRC of its type and payload.
  CrcMismatch,
  /// The byte stream held no chunks at all.
  NoChunks,
  /// The header payload is the wrong size, has a zero dimension, uses an
  /// unknown compression or filter method, or pairs a bit depth with a color
  /// type illegally.
  IllegalIhdr,
  /// The palette payload isn't 1 to 256 RGB triples, or has more entries
  /// than the bit depth of an indexed image can address.
  IllegalPlte,
  /// The gamma payload isn't a single 32-bit value.
  IllegalGama,
  /// The background payload doesn't fit the image's color type.
  IllegalBkgd,
  /// The trailer chunk carried payload bytes.
  IllegalIend,
  /// A chunk the decoder doesn't recognize is marked critical.
  UnknownCriticalChunk,
  /// A recognized chunk appeared somewhere its ordering rules forbid.
  ChunkOutOfOrder,
  /// A chunk limited to one appearance showed up again.
  DuplicateChunk,
  /// No image data chunk was present.
  MissingIdat,
  /// The stream ended without a trailer chunk.
  MissingIend,
  /// An indexed-color image has no palette.
  MissingPalette,
  /// A scanline's filter byte was outside `0..=4`.
  IllegalFilterType,
  /// The zlib stream inside the image data chunks couldn't be decompressed.
  IdatDecompressFailed,
  /// The decompressed image data isn't exactly the size the header implies.
  IdatLengthMismatch,
  /// The pixel count overflows, or exceeds the caller's configured limit.
  ImageTooLarge,
  /// The allocator couldn't give us enough space.
  Alloc,
  /// Reading from the input source failed.
  #[cfg(feature = "std")]
  Io,
}
impl PngError {
  /// Which broad class this error falls into.
  #[inline]
  #[must_use]
  pub const fn kind(self) -> ErrorKind {
    match self {
      PngError::NotPng => ErrorKind::NotPng,
      PngError::ImageTooLarge => ErrorKind::Unsupported,
      PngError::Alloc => ErrorKind::OutOfMemory,
      _ => ErrorKind::InvalidData,
    }
  }
}

/// Alias for decode results.
pub type PngResult<T> = Result<T, PngError>;

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngError {
  #[inline]
  fn from(_: std::io::Error) -> Self {
    Self::Io
  }
}

use core::fmt;

/// `IDAT`: image data.
///
/// * Image data is stored with zlib compression applied.
/// * Images can have more than one `IDAT` chunk, stored back to back; all
///   of them together form a single zlib datastream.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Idat<'b>(&'b [u8]);
impl<'b> From<&'b [u8]> for Idat<'b> {
  #[inline]
  #[must_use]
  fn from(data: &'b [u8]) -> Self {
    Self(data)
  }
}
impl<'b> Idat<'b> {
  /// The still-compressed payload bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &'b [u8] {
    self.0
  }
}
impl fmt::Debug for Idat<'_> {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Idat").field(&&self.0[..self.0.len().min(12)]).field(&self.0.len()).finish()
  }
}

#[cfg(feature = "alloc")]
pub(crate) use self::inflate::inflate_idat;

#[cfg(feature = "alloc")]
mod inflate {
  use alloc::vec::Vec;
  use log::trace;
  use miniz_oxide::inflate::decompress_slice_iter_to_slice;

  use crate::{
    error::{PngError, PngResult},
    ihdr::Ihdr,
  };

  /// Inflates the concatenation of all image data payloads, in stream
  /// order, into one buffer of exactly the size the header implies.
  ///
  /// The zlib Adler-32 is not checked; every chunk already passed its CRC.
  pub(crate) fn inflate_idat(ihdr: &Ihdr, segments: &[&[u8]]) -> PngResult<Vec<u8>> {
    let expected = ihdr.expected_inflated_len()?;
    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(expected)?;
    out.resize(expected, 0);
    let produced =
      decompress_slice_iter_to_slice(&mut out, segments.iter().copied(), true, true)
        .map_err(|_| PngError::IdatDecompressFailed)?;
    if produced != expected {
      trace!("inflated {produced} of the {expected} bytes the header implies");
      return Err(PngError::IdatLengthMismatch);
    }
    Ok(out)
  }
}

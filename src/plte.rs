use core::fmt;

use crate::{
  error::{PngError, PngResult},
  ihdr::Ihdr,
};

/// `PLTE`: palette data.
///
/// Palette entries are always RGB.
///
/// * Required for indexed-color images, where it must also fit the bit
///   depth: no more entries than the index type can address.
/// * Optional for RGB and RGBA images, where it is only a quantization
///   suggestion.
///
/// Spec: [PLTE](https://www.w3.org/TR/png/#11PLTE)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Plte<'b>(&'b [[u8; 3]]);
impl<'b> Plte<'b> {
  /// Views a palette payload as RGB triples, applying the size rules.
  ///
  /// ## Failure
  /// * [`PngError::IllegalPlte`] if the payload isn't a whole number of
  ///   triples, is empty, has more than 256 entries, or (for an indexed
  ///   image) has more entries than `2^bit_depth`.
  pub(crate) fn from_payload(data: &'b [u8], ihdr: &Ihdr) -> PngResult<Self> {
    let entries: &[[u8; 3]] =
      bytemuck::try_cast_slice(data).map_err(|_| PngError::IllegalPlte)?;
    if entries.is_empty() || entries.len() > 256 {
      return Err(PngError::IllegalPlte);
    }
    if ihdr.format.is_indexed() && entries.len() > (1 << ihdr.format.bits_per_channel()) {
      return Err(PngError::IllegalPlte);
    }
    Ok(Self(entries))
  }

  /// The palette entries.
  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &'b [[u8; 3]] {
    self.0
  }

  /// How many entries the palette holds (1 to 256).
  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.0.len()
  }

  /// A valid palette is never empty, but clippy wants the pair.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
impl fmt::Debug for Plte<'_> {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // prints no more than 4 palette entries
    f.debug_tuple("Plte").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ihdr::PixelFormat;

  const fn indexed_2bit() -> Ihdr {
    Ihdr { width: 4, height: 4, format: PixelFormat::I2, is_interlaced: false }
  }

  #[test]
  fn palette_size_rules() {
    let ihdr = indexed_2bit();
    // 2^2 entries is the most a 2-bit index can address
    assert!(Plte::from_payload(&[0; 4 * 3], &ihdr).is_ok());
    assert_eq!(Plte::from_payload(&[0; 5 * 3], &ihdr), Err(PngError::IllegalPlte));
    // ragged and empty payloads
    assert_eq!(Plte::from_payload(&[0; 7], &ihdr), Err(PngError::IllegalPlte));
    assert_eq!(Plte::from_payload(&[], &ihdr), Err(PngError::IllegalPlte));
  }

  #[test]
  fn non_indexed_images_only_cap_at_256() {
    let ihdr = Ihdr { width: 1, height: 1, format: PixelFormat::RGB8, is_interlaced: false };
    assert!(Plte::from_payload(&[0; 256 * 3], &ihdr).is_ok());
    assert_eq!(Plte::from_payload(&[0; 257 * 3], &ihdr), Err(PngError::IllegalPlte));
  }
}

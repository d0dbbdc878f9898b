use crate::error::{PngError, PngResult};

/// The pixel formats a PNG is allowed to use.
///
/// This is the legal pairings of color type and bit depth, one variant per
/// pair.
///
/// * The greyscale (`Y`) and indexed (`I`) formats allow pixels of 1, 2, or
///   4 bits. Those are tightly packed into bytes, leftmost pixel in the
///   highest bits.
/// * 16-bit samples are stored big-endian in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum PixelFormat {
  Y1,
  Y2,
  Y4,
  Y8,
  Y16,
  RGB8,
  RGB16,
  I1,
  I2,
  I4,
  I8,
  YA8,
  YA16,
  RGBA8,
  RGBA16,
}
impl PixelFormat {
  /// Looks up the format for a `(bit_depth, color_type)` pair, as the pair
  /// appears in the header payload.
  #[inline]
  #[must_use]
  pub const fn from_depth_and_color(bit_depth: u8, color_type: u8) -> Option<Self> {
    Some(match (bit_depth, color_type) {
      (1, 0) => PixelFormat::Y1,
      (2, 0) => PixelFormat::Y2,
      (4, 0) => PixelFormat::Y4,
      (8, 0) => PixelFormat::Y8,
      (16, 0) => PixelFormat::Y16,
      (8, 2) => PixelFormat::RGB8,
      (16, 2) => PixelFormat::RGB16,
      (1, 3) => PixelFormat::I1,
      (2, 3) => PixelFormat::I2,
      (4, 3) => PixelFormat::I4,
      (8, 3) => PixelFormat::I8,
      (8, 4) => PixelFormat::YA8,
      (16, 4) => PixelFormat::YA16,
      (8, 6) => PixelFormat::RGBA8,
      (16, 6) => PixelFormat::RGBA16,
      _ => return None,
    })
  }

  /// Bits per channel (the header's bit depth field).
  #[inline]
  #[must_use]
  pub const fn bits_per_channel(self) -> usize {
    use PixelFormat::*;
    match self {
      Y1 | I1 => 1,
      Y2 | I2 => 2,
      Y4 | I4 => 4,
      Y8 | I8 | YA8 | RGB8 | RGBA8 => 8,
      Y16 | RGB16 | YA16 | RGBA16 => 16,
    }
  }

  /// How many channels a pixel has (indexed counts as one).
  #[inline]
  #[must_use]
  pub const fn channels(self) -> usize {
    use PixelFormat::*;
    match self {
      Y1 | Y2 | Y4 | Y8 | Y16 | I1 | I2 | I4 | I8 => 1,
      YA8 | YA16 => 2,
      RGB8 | RGB16 => 3,
      RGBA8 | RGBA16 => 4,
    }
  }

  /// The byte distance between neighboring pixels that filters operate on.
  ///
  /// Depending on bit depth and channel count this is 1 to 8; formats
  /// packing several pixels per byte filter at a distance of one byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(self) -> usize {
    let bits = self.bits_per_channel() * self.channels();
    if bits < 8 {
      1
    } else {
      bits / 8
    }
  }

  /// Given an image or reduced-image *pixel* width, the *byte* length of one
  /// full scanline in this format.
  ///
  /// This doesn't include the filter byte that precedes each scanline in the
  /// decompressed image data.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(self, width: u32) -> usize {
    let bits = width as usize * self.bits_per_channel();
    ((bits + 7) / 8) * self.channels()
  }

  /// `true` for the indexed-color formats.
  #[inline]
  #[must_use]
  pub const fn is_indexed(self) -> bool {
    matches!(self, PixelFormat::I1 | PixelFormat::I2 | PixelFormat::I4 | PixelFormat::I8)
  }
}

/// `IHDR`: the image header.
///
/// Always the first chunk, and immutable once parsed: everything later in
/// the stream is validated against it.
///
/// Spec: [IHDR](https://www.w3.org/TR/png/#11IHDR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ihdr {
  /// Width in pixels, never 0.
  pub width: u32,
  /// Height in pixels, never 0.
  pub height: u32,
  /// The combined color type and bit depth.
  pub format: PixelFormat,
  /// Whether the image data is stored in seven Adam7 passes.
  pub is_interlaced: bool,
}
impl Ihdr {
  /// Parses the 13-byte header payload.
  ///
  /// ## Failure
  /// * [`PngError::IllegalIhdr`] for a wrong payload size, a zero width or
  ///   height, a nonzero compression or filter method, an interlace method
  ///   other than 0 or 1, or an illegal depth/color pairing.
  pub fn from_payload(data: &[u8]) -> PngResult<Self> {
    if data.len() != 13 || data[10] != 0 || data[11] != 0 || data[12] > 1 {
      return Err(PngError::IllegalIhdr);
    }
    let width = u32::from_be_bytes(data[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(data[4..8].try_into().unwrap());
    if width == 0 || height == 0 {
      return Err(PngError::IllegalIhdr);
    }
    let format =
      PixelFormat::from_depth_and_color(data[8], data[9]).ok_or(PngError::IllegalIhdr)?;
    Ok(Self { width, height, format, is_interlaced: data[12] == 1 })
  }

  /// Total pixels in the image.
  #[inline]
  #[must_use]
  pub const fn pixel_count(&self) -> u64 {
    self.width as u64 * self.height as u64
  }

  /// Exactly how many bytes the image data has to inflate to.
  ///
  /// Each scanline of each (reduced) image costs its byte length plus one
  /// filter byte; reduced images with a zero dimension cost nothing.
  pub(crate) fn expected_inflated_len(&self) -> PngResult<usize> {
    if self.is_interlaced {
      let mut total = 0_usize;
      let mut pass = 0;
      while pass < 7 {
        let (w, h) = crate::adam7::pass_dimensions(pass, self.width, self.height);
        if w != 0 && h != 0 {
          let line = self.format.bytes_per_scanline(w) + 1;
          let image = line.checked_mul(h as usize).ok_or(PngError::ImageTooLarge)?;
          total = total.checked_add(image).ok_or(PngError::ImageTooLarge)?;
        }
        pass += 1;
      }
      Ok(total)
    } else {
      let line = self.format.bytes_per_scanline(self.width) + 1;
      line.checked_mul(self.height as usize).ok_or(PngError::ImageTooLarge)
    }
  }
}

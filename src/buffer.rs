use alloc::vec::Vec;

use crate::{
  error::{PngError, PngResult},
  ihdr::{Ihdr, PixelFormat},
  pixel::{RGB16, RGB8, RGBA16, RGBA8, YA16, YA8},
  plte::Plte,
};

/// A `width * height` grid of pixels, row by row.
///
/// The struct takes no opinion on whether the first row is the top or the
/// bottom of the image; different GPU libraries disagree, and the decoder
/// itself always writes in stream order (first row first).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bitmap<P> {
  /// Width in pixels.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
  /// The pixel data, `width * height` of them.
  pub pixels: Vec<P>,
}
impl<P> Bitmap<P> {
  /// Converts an `x` and `y` to an index into the `pixels` vec.
  ///
  /// ```txt
  /// index = y * width + x
  /// ```
  ///
  /// Does not perform bounds checks.
  #[inline]
  #[must_use]
  pub const fn xy_to_index(&self, x: u32, y: u32) -> usize {
    y as usize * self.width as usize + x as usize
  }

  /// Gets a shared reference to the specified pixel.
  ///
  /// ## Failure
  /// * If `x` or `y` are out of bounds you get `None`.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x >= self.width || y >= self.height {
      return None;
    }
    self.pixels.get(self.xy_to_index(x, y))
  }

  /// Gets a unique reference to the specified pixel.
  ///
  /// ## Failure
  /// * If `x` or `y` are out of bounds you get `None`.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x >= self.width || y >= self.height {
      return None;
    }
    let i = self.xy_to_index(x, y);
    self.pixels.get_mut(i)
  }
}
impl<P: Default + Clone> Bitmap<P> {
  /// Allocates a zeroed-out bitmap, signaling instead of aborting if the
  /// allocator can't provide the space.
  pub(crate) fn try_new(width: u32, height: u32) -> PngResult<Self> {
    let len =
      (width as usize).checked_mul(height as usize).ok_or(PngError::ImageTooLarge)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len)?;
    pixels.resize(len, P::default());
    Ok(Self { width, height, pixels })
  }

  /// Sets every pixel of the `w * h` rectangle at `(x, y)` to `p`, clipped
  /// to the bitmap bounds.
  pub(crate) fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, p: P) {
    if x >= self.width || y >= self.height {
      return;
    }
    let x_end = x.saturating_add(w).min(self.width);
    let y_end = y.saturating_add(h).min(self.height);
    for yy in y..y_end {
      let row = self.xy_to_index(x, yy);
      self.pixels[row..row + (x_end - x) as usize].fill(p.clone());
    }
  }
}

/// Indexed pixels together with their palette.
///
/// The `indices` are stored raw; an index beyond the palette is technically
/// an encoder error, so look entries up with
/// `palette.get(i).copied().unwrap_or_default()` if you want such pixels to
/// come out as transparent black rather than a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexedBitmap {
  /// The palette, at most `2^bit_depth` entries, alpha always 255.
  pub palette: Vec<RGBA8>,
  /// One palette index per pixel.
  pub indices: Bitmap<u8>,
}
impl IndexedBitmap {
  fn try_new(width: u32, height: u32, plte: &Plte<'_>) -> PngResult<Self> {
    let mut palette = Vec::new();
    palette.try_reserve_exact(plte.len())?;
    palette.extend(
      plte.entries().iter().map(|&[r, g, b]| RGBA8 { r, g, b, a: 255 }),
    );
    Ok(Self { palette, indices: Bitmap::try_new(width, height)? })
  }
}

/// The typed destination buffer, one variant per legal pixel format.
///
/// Whatever the variant, the buffer holds exactly `width * height` values.
/// Sub-byte greyscale and index samples live one per entry in their low
/// bits, not re-packed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PixelStore {
  Y1(Bitmap<u8>),
  Y2(Bitmap<u8>),
  Y4(Bitmap<u8>),
  Y8(Bitmap<u8>),
  Y16(Bitmap<u16>),
  Ya8(Bitmap<YA8>),
  Ya16(Bitmap<YA16>),
  Rgb8(Bitmap<RGB8>),
  Rgb16(Bitmap<RGB16>),
  Rgba8(Bitmap<RGBA8>),
  Rgba16(Bitmap<RGBA16>),
  I1(IndexedBitmap),
  I2(IndexedBitmap),
  I4(IndexedBitmap),
  I8(IndexedBitmap),
}
impl PixelStore {
  /// Allocates the store variant the header calls for.
  ///
  /// ## Failure
  /// * [`PngError::MissingPalette`] for an indexed format with no palette.
  /// * [`PngError::Alloc`] / [`PngError::ImageTooLarge`] from the buffer
  ///   allocation itself.
  pub(crate) fn try_new(ihdr: &Ihdr, plte: Option<&Plte<'_>>) -> PngResult<Self> {
    let (w, h) = (ihdr.width, ihdr.height);
    Ok(match ihdr.format {
      PixelFormat::Y1 => PixelStore::Y1(Bitmap::try_new(w, h)?),
      PixelFormat::Y2 => PixelStore::Y2(Bitmap::try_new(w, h)?),
      PixelFormat::Y4 => PixelStore::Y4(Bitmap::try_new(w, h)?),
      PixelFormat::Y8 => PixelStore::Y8(Bitmap::try_new(w, h)?),
      PixelFormat::Y16 => PixelStore::Y16(Bitmap::try_new(w, h)?),
      PixelFormat::YA8 => PixelStore::Ya8(Bitmap::try_new(w, h)?),
      PixelFormat::YA16 => PixelStore::Ya16(Bitmap::try_new(w, h)?),
      PixelFormat::RGB8 => PixelStore::Rgb8(Bitmap::try_new(w, h)?),
      PixelFormat::RGB16 => PixelStore::Rgb16(Bitmap::try_new(w, h)?),
      PixelFormat::RGBA8 => PixelStore::Rgba8(Bitmap::try_new(w, h)?),
      PixelFormat::RGBA16 => PixelStore::Rgba16(Bitmap::try_new(w, h)?),
      PixelFormat::I1 | PixelFormat::I2 | PixelFormat::I4 | PixelFormat::I8 => {
        let plte = plte.ok_or(PngError::MissingPalette)?;
        let indexed = IndexedBitmap::try_new(w, h, plte)?;
        match ihdr.format {
          PixelFormat::I1 => PixelStore::I1(indexed),
          PixelFormat::I2 => PixelStore::I2(indexed),
          PixelFormat::I4 => PixelStore::I4(indexed),
          _ => PixelStore::I8(indexed),
        }
      }
    })
  }

  /// Width and height in pixels.
  #[must_use]
  pub fn dimensions(&self) -> (u32, u32) {
    match self {
      PixelStore::Y1(b) | PixelStore::Y2(b) | PixelStore::Y4(b) | PixelStore::Y8(b) => {
        (b.width, b.height)
      }
      PixelStore::Y16(b) => (b.width, b.height),
      PixelStore::Ya8(b) => (b.width, b.height),
      PixelStore::Ya16(b) => (b.width, b.height),
      PixelStore::Rgb8(b) => (b.width, b.height),
      PixelStore::Rgb16(b) => (b.width, b.height),
      PixelStore::Rgba8(b) => (b.width, b.height),
      PixelStore::Rgba16(b) => (b.width, b.height),
      PixelStore::I1(p) | PixelStore::I2(p) | PixelStore::I4(p) | PixelStore::I8(p) => {
        (p.indices.width, p.indices.height)
      }
    }
  }

  /// How many pixels the store holds.
  #[must_use]
  pub fn pixel_count(&self) -> usize {
    match self {
      PixelStore::Y1(b) | PixelStore::Y2(b) | PixelStore::Y4(b) | PixelStore::Y8(b) => {
        b.pixels.len()
      }
      PixelStore::Y16(b) => b.pixels.len(),
      PixelStore::Ya8(b) => b.pixels.len(),
      PixelStore::Ya16(b) => b.pixels.len(),
      PixelStore::Rgb8(b) => b.pixels.len(),
      PixelStore::Rgb16(b) => b.pixels.len(),
      PixelStore::Rgba8(b) => b.pixels.len(),
      PixelStore::Rgba16(b) => b.pixels.len(),
      PixelStore::I1(p) | PixelStore::I2(p) | PixelStore::I4(p) | PixelStore::I8(p) => {
        p.indices.pixels.len()
      }
    }
  }

  /// Decodes one sample's bytes for this variant and writes it to every
  /// pixel of the `w * h` block at `(x, y)`, clipped to the image.
  ///
  /// `data` is what the scanline walker hands over: the sample value in the
  /// low bits of one byte for the sub-byte formats, otherwise one byte per
  /// channel (two, big-endian, for 16-bit channels).
  pub(crate) fn write_block(&mut self, x: u32, y: u32, w: u32, h: u32, data: &[u8]) {
    match self {
      PixelStore::Y1(b) | PixelStore::Y2(b) | PixelStore::Y4(b) | PixelStore::Y8(b) => {
        b.fill_rect(x, y, w, h, data[0]);
      }
      PixelStore::Y16(b) => b.fill_rect(x, y, w, h, be16(data, 0)),
      PixelStore::Ya8(b) => b.fill_rect(x, y, w, h, YA8 { y: data[0], a: data[1] }),
      PixelStore::Ya16(b) => {
        b.fill_rect(x, y, w, h, YA16 { y: be16(data, 0), a: be16(data, 1) });
      }
      PixelStore::Rgb8(b) => {
        b.fill_rect(x, y, w, h, RGB8 { r: data[0], g: data[1], b: data[2] });
      }
      PixelStore::Rgb16(b) => {
        b.fill_rect(x, y, w, h, RGB16 { r: be16(data, 0), g: be16(data, 1), b: be16(data, 2) });
      }
      PixelStore::Rgba8(b) => {
        b.fill_rect(x, y, w, h, RGBA8 { r: data[0], g: data[1], b: data[2], a: data[3] });
      }
      PixelStore::Rgba16(b) => {
        b.fill_rect(
          x,
          y,
          w,
          h,
          RGBA16 { r: be16(data, 0), g: be16(data, 1), b: be16(data, 2), a: be16(data, 3) },
        );
      }
      PixelStore::I1(p) | PixelStore::I2(p) | PixelStore::I4(p) | PixelStore::I8(p) => {
        p.indices.fill_rect(x, y, w, h, data[0]);
      }
    }
  }
}

/// The `i`th big-endian `u16` of a sample's bytes.
#[inline]
fn be16(data: &[u8], i: usize) -> u16 {
  u16::from_be_bytes([data[2 * i], data[2 * i + 1]])
}

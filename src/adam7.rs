//! Adam7 pass geometry and the de-interlacing driver.
//!
//! The seven passes tile every 8x8 block of the image like so:
//!
//! ```txt
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```
//!
//! PS: Interlacing is terrible, don't interlace your images.

/// Placement of one pass's samples within the full image.
///
/// A sample at pass position `(px, py)` lands at
/// `(start_x + px * x_step, start_y + py * y_step)`, and paints a
/// `block_w * block_h` tile there so a partially decoded image still makes
/// sense at full size. Only the last pass paints single pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pass {
  pub(crate) start_x: u32,
  pub(crate) start_y: u32,
  pub(crate) x_step: u32,
  pub(crate) y_step: u32,
  pub(crate) block_w: u32,
  pub(crate) block_h: u32,
}

pub(crate) const PASSES: [Pass; 7] = [
  Pass { start_x: 0, start_y: 0, x_step: 8, y_step: 8, block_w: 8, block_h: 8 },
  Pass { start_x: 4, start_y: 0, x_step: 8, y_step: 8, block_w: 4, block_h: 8 },
  Pass { start_x: 0, start_y: 4, x_step: 4, y_step: 8, block_w: 4, block_h: 4 },
  Pass { start_x: 2, start_y: 0, x_step: 4, y_step: 4, block_w: 2, block_h: 4 },
  Pass { start_x: 0, start_y: 2, x_step: 2, y_step: 4, block_w: 2, block_h: 2 },
  Pass { start_x: 1, start_y: 0, x_step: 2, y_step: 2, block_w: 1, block_h: 2 },
  Pass { start_x: 0, start_y: 1, x_step: 1, y_step: 2, block_w: 1, block_h: 1 },
];

/// The width and height of reduced image `pass` (0 through 6) for a full
/// image of `width * height`.
///
/// Either dimension can come out 0, in which case the pass holds no data at
/// all (not even filter bytes).
#[inline]
#[must_use]
pub(crate) const fn pass_dimensions(pass: usize, width: u32, height: u32) -> (u32, u32) {
  match pass {
    0 => ((width + 7) / 8, (height + 7) / 8),
    1 => ((width + 3) / 8, (height + 7) / 8),
    2 => ((width + 3) / 4, (height + 3) / 8),
    3 => ((width + 1) / 4, (height + 3) / 4),
    4 => ((width + 1) / 2, (height + 1) / 4),
    5 => (width / 2, (height + 1) / 2),
    6 => (width, height / 2),
    _ => (0, 0),
  }
}

#[cfg(feature = "alloc")]
pub(crate) use self::driver::unpack_interlaced;

#[cfg(feature = "alloc")]
mod driver {
  use super::{pass_dimensions, PASSES};
  use crate::{
    buffer::PixelStore,
    error::{PngError, PngResult},
    filter::Unfilterer,
    ihdr::Ihdr,
    unpack::for_each_sample,
  };

  /// Runs the seven passes over the inflated image data, block-filling each
  /// decoded sample into the store.
  ///
  /// Every pass starts a fresh filter engine: filters never reach across a
  /// pass boundary, so the first row of each reduced image is unfiltered
  /// against an all-zero previous row.
  pub(crate) fn unpack_interlaced(
    ihdr: &Ihdr, mut decompressed: &[u8], store: &mut PixelStore,
  ) -> PngResult<()> {
    for (pass, geo) in PASSES.iter().enumerate() {
      let (pass_w, pass_h) = pass_dimensions(pass, ihdr.width, ihdr.height);
      if pass_w == 0 || pass_h == 0 {
        continue;
      }
      let stride = ihdr.format.bytes_per_scanline(pass_w);
      let pass_bytes = (1 + stride) * pass_h as usize;
      if decompressed.len() < pass_bytes {
        return Err(PngError::IdatLengthMismatch);
      }
      let (this_pass, rest) = decompressed.split_at(pass_bytes);
      decompressed = rest;
      let mut unfilterer = Unfilterer::new(stride, ihdr.format.bytes_per_pixel())?;
      for (pass_y, line) in this_pass.chunks_exact(1 + stride).enumerate() {
        let (&filter_ty, filtered) = line.split_first().unwrap();
        let recon = unfilterer.unfilter_line(filter_ty, filtered)?;
        for_each_sample(ihdr.format, recon, pass_w, |pass_x, data| {
          let x = geo.start_x + pass_x * geo.x_step;
          let y = geo.start_y + pass_y as u32 * geo.y_step;
          store.write_block(x, y, geo.block_w, geo.block_h, data);
        });
      }
    }
    Ok(())
  }
}

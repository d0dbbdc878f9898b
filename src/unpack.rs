use crate::{
  buffer::PixelStore,
  error::{PngError, PngResult},
  filter::Unfilterer,
  ihdr::{Ihdr, PixelFormat},
};

/// Calls `op(i, sample_bytes)` for each of the first `width` samples of a
/// reconstructed scanline.
///
/// * Bit depths 1, 2, and 4 pack several samples per byte, leftmost sample
///   in the highest bits; `op` gets the value in the low bits of a single
///   byte. Padding bits after the last sample of a line are never visited.
/// * Bit depth 8 hands over one byte per channel, and depth 16 two bytes
///   per channel still in big-endian order.
pub(crate) fn for_each_sample<F: FnMut(u32, &[u8])>(
  format: PixelFormat, row: &[u8], width: u32, mut op: F,
) {
  let depth = format.bits_per_channel();
  match depth {
    1 | 2 | 4 => {
      let mask = (1_u8 << depth) - 1;
      for i in 0..width {
        let bit_offset = i as usize * depth;
        let down_shift = 8 - depth - (bit_offset % 8);
        op(i, &[(row[bit_offset / 8] >> down_shift) & mask]);
      }
    }
    _ => {
      let bytes_per_pixel = format.bytes_per_pixel();
      for (i, sample) in row.chunks_exact(bytes_per_pixel).take(width as usize).enumerate()
      {
        op(i as u32, sample);
      }
    }
  }
}

/// Unfilters `height` scanlines of inflated image data and writes every
/// pixel of a non-interlaced image into the store.
pub(crate) fn unpack_image(
  ihdr: &Ihdr, decompressed: &[u8], store: &mut PixelStore,
) -> PngResult<()> {
  let stride = ihdr.format.bytes_per_scanline(ihdr.width);
  let mut unfilterer = Unfilterer::new(stride, ihdr.format.bytes_per_pixel())?;
  let mut lines = decompressed.chunks_exact(1 + stride);
  for y in 0..ihdr.height {
    let line = lines.next().ok_or(PngError::IdatLengthMismatch)?;
    let (&filter_ty, filtered) = line.split_first().unwrap();
    let recon = unfilterer.unfilter_line(filter_ty, filtered)?;
    for_each_sample(ihdr.format, recon, ihdr.width, |x, data| {
      store.write_block(x, y, 1, 1, data);
    });
  }
  Ok(())
}

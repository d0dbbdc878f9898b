#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! A strict decoder for the core of the PNG format.
//!
//! * [Portable Network Graphics (PNG) Specification (Third Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/png/
//!
//! The decoder covers the chunk container (CRC-checked, with the ordering
//! and appearance-count rules enforced), the `IHDR`/`PLTE`/`gAMA`/`bKGD`
//! payloads, zlib inflation of the `IDAT` stream, scanline unfiltering,
//! Adam7 de-interlacing, and unpacking into a typed pixel buffer. It does
//! *not* write PNG files, and it leaves color handling (gamma application,
//! palette expansion, alpha math) to the caller: pixels come out exactly as
//! the file stores them, one [`PixelStore`] variant per legal pixel format.
//!
//! ## Decoding
//!
//! The whole encoded stream has to be in memory as a single byte slice;
//! there is no streaming mode. Call [`decode_png`] (or [`decode_png_with`]
//! to set limits) and you get back a [`Png`] holding the pixel buffer and
//! the recognized metadata:
//!
//! ```no_run
//! let bytes = std::fs::read("example.png").unwrap();
//! let png = pnglet::decode_png(&bytes).unwrap();
//! match png.pixels {
//!   pnglet::PixelStore::Rgba8(bitmap) => drop(bitmap.get(0, 0)),
//!   _ => (),
//! }
//! ```
//!
//! With `std` enabled there's also [`decode_png_from_reader`], which slurps
//! a `Read + Seek` source and decodes that.
//!
//! ## Strictness
//!
//! Everything the format calls an error is fatal here: a bad chunk CRC, a
//! chunk out of order, an unknown *critical* chunk, an illegal header
//! field, a filter byte past 4, or image data that inflates to the wrong
//! size. On any failure the decoder drops every buffer it allocated and
//! returns one [`PngError`]; it never hands back a partial image. The only
//! leniency is the one the format itself grants: unrecognized *ancillary*
//! chunks are skipped, as are recognized ancillary chunks with payloads
//! that don't parse.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bkgd;
mod chunk;
mod crc32;
mod error;
mod gama;
mod ihdr;
mod idat;
mod plte;
mod raw_chunk;

pub use bkgd::*;
pub use chunk::*;
pub use error::*;
pub use gama::*;
pub use ihdr::*;
pub use idat::*;
pub use plte::*;
pub use raw_chunk::*;

mod adam7;

#[cfg(feature = "alloc")]
mod buffer;
#[cfg(feature = "alloc")]
mod filter;
#[cfg(feature = "alloc")]
mod stream;
#[cfg(feature = "alloc")]
mod unpack;

#[cfg(feature = "alloc")]
mod pixel;

#[cfg(feature = "alloc")]
pub use buffer::*;
#[cfg(feature = "alloc")]
pub use pixel::*;

/// The 8 bytes at the start of every PNG stream.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the bytes open with the PNG signature.
#[inline]
#[must_use]
pub fn is_png_signature(bytes: &[u8]) -> bool {
  bytes.len() >= 8 && bytes[..8] == PNG_SIGNATURE
}

/// Knobs for a decode call.
///
/// The default configuration has no limits at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
  /// Refuse images with more than this many pixels before allocating
  /// anything for them. Protects against tiny files that describe enormous
  /// images.
  pub max_pixels: Option<u64>,
}

/// A fully decoded image.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Png {
  /// Width in pixels.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
  /// The pixel data, in the file's own format.
  pub pixels: PixelStore,
  /// The gamma chunk's value, if one was present.
  pub gamma: Option<Gamma>,
  /// The background chunk's value, if one was present.
  pub background: Option<Background>,
}

/// Decodes a PNG stream with the default [`DecodeOptions`].
#[cfg(feature = "alloc")]
#[inline]
pub fn decode_png(bytes: &[u8]) -> PngResult<Png> {
  decode_png_with(bytes, &DecodeOptions::default())
}

/// Decodes a PNG stream.
///
/// The slice has to hold the complete stream, signature included.
///
/// ## Failure
/// * [`PngError::NotPng`] when the signature is wrong and the input is
///   something other than a PNG.
/// * [`PngError::ImageTooLarge`] when the header admits to more pixels
///   than `options.max_pixels` allows.
/// * Otherwise, whatever the chunk walk, inflate, or unfilter stage hit
///   first.
#[cfg(feature = "alloc")]
pub fn decode_png_with(bytes: &[u8], options: &DecodeOptions) -> PngResult<Png> {
  if !is_png_signature(bytes) {
    return Err(PngError::NotPng);
  }
  let parsed = stream::ChunkWalker::walk(&bytes[8..])?;
  let ihdr = parsed.ihdr;
  if let Some(max_pixels) = options.max_pixels {
    if ihdr.pixel_count() > max_pixels {
      return Err(PngError::ImageTooLarge);
    }
  }
  let mut store = PixelStore::try_new(&ihdr, parsed.plte.as_ref())?;
  let inflated = idat::inflate_idat(&ihdr, &parsed.idat)?;
  if ihdr.is_interlaced {
    adam7::unpack_interlaced(&ihdr, &inflated, &mut store)?;
  } else {
    unpack::unpack_image(&ihdr, &inflated, &mut store)?;
  }
  Ok(Png {
    width: ihdr.width,
    height: ihdr.height,
    pixels: store,
    gamma: parsed.gamma,
    background: parsed.background,
  })
}

/// Reads a complete PNG stream out of a seekable source and decodes it.
///
/// The source is rewound to its start first, then read to its end.
#[cfg(feature = "std")]
pub fn decode_png_from_reader<R>(reader: &mut R, options: &DecodeOptions) -> PngResult<Png>
where
  R: std::io::Read + std::io::Seek,
{
  use std::io::SeekFrom;
  reader.seek(SeekFrom::Start(0))?;
  let mut bytes = alloc::vec::Vec::new();
  reader.read_to_end(&mut bytes)?;
  decode_png_with(&bytes, options)
}

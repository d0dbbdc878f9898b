use log::debug;

use crate::{
  bkgd::Background,
  error::{PngError, PngResult},
  gama::Gamma,
  idat::Idat,
  ihdr::Ihdr,
  plte::Plte,
  raw_chunk::{ChunkTag, RawChunk},
};

/// A parsed PNG chunk.
///
/// [`Chunk::parse`] turns a [`RawChunk`] into this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chunk<'b> {
  /// Image header.
  Ihdr(Ihdr),
  /// Palette.
  Plte(Plte<'b>),
  /// Gamma value times 100,000.
  Gama(Gamma),
  /// Background color.
  Bkgd(Background),
  /// Image data.
  Idat(Idat<'b>),
  /// Image trailer.
  Iend,
}
impl<'b> Chunk<'b> {
  /// Decodes one raw chunk into its typed form.
  ///
  /// `ihdr` is the already-parsed header, needed to decode the chunks whose
  /// payload shape depends on it. Give `None` only while parsing the header
  /// chunk itself.
  ///
  /// Returns `Ok(None)` for chunks the decode can carry on without: an
  /// unrecognized ancillary chunk, or a recognized ancillary chunk with a
  /// malformed payload.
  ///
  /// ## Failure
  /// * [`PngError::UnknownCriticalChunk`] for an unrecognized critical tag.
  /// * [`PngError::ChunkOutOfOrder`] for a chunk that needs the header when
  ///   `ihdr` is `None`.
  /// * Whatever the payload decoder of a critical chunk signals.
  pub fn parse(raw: &RawChunk<'b>, ihdr: Option<&Ihdr>) -> PngResult<Option<Self>> {
    Ok(match raw.tag {
      ChunkTag::IHDR => Some(Chunk::Ihdr(Ihdr::from_payload(raw.data)?)),
      ChunkTag::PLTE => {
        let ihdr = ihdr.ok_or(PngError::ChunkOutOfOrder)?;
        Some(Chunk::Plte(Plte::from_payload(raw.data, ihdr)?))
      }
      ChunkTag::GAMA => match Gamma::from_payload(raw.data) {
        Ok(gamma) => Some(Chunk::Gama(gamma)),
        Err(_) => {
          debug!("skipping gAMA with a malformed payload");
          None
        }
      },
      ChunkTag::BKGD => {
        let ihdr = ihdr.ok_or(PngError::ChunkOutOfOrder)?;
        match Background::from_payload(raw.data, ihdr.format) {
          Ok(background) => Some(Chunk::Bkgd(background)),
          Err(_) => {
            debug!("skipping bKGD with a malformed payload");
            None
          }
        }
      }
      ChunkTag::IDAT => Some(Chunk::Idat(Idat::from(raw.data))),
      ChunkTag::IEND => match raw.data {
        [] => Some(Chunk::Iend),
        _ => return Err(PngError::IllegalIend),
      },
      other if other.is_ancillary() => None,
      _ => return Err(PngError::UnknownCriticalChunk),
    })
  }
}

/// How often a recognized chunk may appear in one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cardinality {
  ExactlyOne,
  ZeroOrOne,
  OneOrMore,
}

pub(crate) struct TagInfo {
  pub(crate) tag: ChunkTag,
  pub(crate) cardinality: Cardinality,
}

/// Every chunk kind the decoder knows. Appearance counts are checked
/// against this table once the stream walk finishes.
pub(crate) const RECOGNIZED: [TagInfo; 6] = [
  TagInfo { tag: ChunkTag::IHDR, cardinality: Cardinality::ExactlyOne },
  TagInfo { tag: ChunkTag::PLTE, cardinality: Cardinality::ZeroOrOne },
  TagInfo { tag: ChunkTag::GAMA, cardinality: Cardinality::ZeroOrOne },
  TagInfo { tag: ChunkTag::BKGD, cardinality: Cardinality::ZeroOrOne },
  TagInfo { tag: ChunkTag::IDAT, cardinality: Cardinality::OneOrMore },
  TagInfo { tag: ChunkTag::IEND, cardinality: Cardinality::ExactlyOne },
];

/// Index into [`RECOGNIZED`] for a tag, if it's one of ours.
#[inline]
#[must_use]
pub(crate) fn recognized_index(tag: ChunkTag) -> Option<usize> {
  RECOGNIZED.iter().position(|info| info.tag == tag)
}

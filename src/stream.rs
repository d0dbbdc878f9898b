use alloc::vec::Vec;
use log::trace;

use crate::{
  bkgd::Background,
  chunk::{recognized_index, Cardinality, Chunk, RECOGNIZED},
  error::{PngError, PngResult},
  gama::Gamma,
  ihdr::Ihdr,
  plte::Plte,
  raw_chunk::{ChunkTag, RawChunk, RawChunkIter},
};

/// Everything gathered from one pass over the chunk stream.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedPng<'b> {
  pub(crate) ihdr: Ihdr,
  pub(crate) plte: Option<Plte<'b>>,
  pub(crate) gamma: Option<Gamma>,
  pub(crate) background: Option<Background>,
  /// The compressed payload slices, in stream order.
  pub(crate) idat: Vec<&'b [u8]>,
}

/// What to do after a chunk has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
  Continue,
  Stop,
}

/// Where the walk currently is within the stream's required shape.
///
/// The ordering rules: the header comes first, the palette (if any) before
/// any image data, background and gamma after the palette and before any
/// image data, image data chunks back to back, and the trailer last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
  Start,
  AfterIhdr,
  AfterPlte,
  InIdat,
  AfterIdat,
  Done,
}

pub(crate) struct ChunkWalker<'b> {
  state: WalkState,
  counts: [u32; RECOGNIZED.len()],
  ihdr: Option<Ihdr>,
  plte: Option<Plte<'b>>,
  gamma: Option<Gamma>,
  background: Option<Background>,
  idat: Vec<&'b [u8]>,
}
impl<'b> ChunkWalker<'b> {
  /// Walks the chunk region of a PNG stream and gathers the typed results.
  ///
  /// The walk stops at the trailer chunk; bytes after it are never looked
  /// at.
  pub(crate) fn walk(bytes_after_signature: &'b [u8]) -> PngResult<ParsedPng<'b>> {
    let mut walker = Self {
      state: WalkState::Start,
      counts: [0; RECOGNIZED.len()],
      ihdr: None,
      plte: None,
      gamma: None,
      background: None,
      idat: Vec::new(),
    };
    let mut seen_any = false;
    for raw in RawChunkIter::new(bytes_after_signature) {
      seen_any = true;
      if let Directive::Stop = walker.step(&raw?)? {
        break;
      }
    }
    if !seen_any {
      return Err(PngError::NoChunks);
    }
    walker.finish()
  }

  fn step(&mut self, raw: &RawChunk<'b>) -> PngResult<Directive> {
    raw.check_crc()?;
    self.advance_state(raw.tag)?;
    if let Some(i) = recognized_index(raw.tag) {
      self.counts[i] += 1;
    }
    match Chunk::parse(raw, self.ihdr.as_ref())? {
      Some(Chunk::Ihdr(ihdr)) => self.ihdr = Some(ihdr),
      Some(Chunk::Plte(plte)) => self.plte = Some(plte),
      Some(Chunk::Gama(gamma)) => self.gamma = Some(gamma),
      Some(Chunk::Bkgd(background)) => self.background = Some(background),
      Some(Chunk::Idat(idat)) => self.idat.push(idat.as_bytes()),
      Some(Chunk::Iend) => {
        self.state = WalkState::Done;
        return Ok(Directive::Stop);
      }
      None => trace!("skipping an unrecognized or malformed ancillary chunk"),
    }
    Ok(Directive::Continue)
  }

  /// Applies the ordering rules for one tag and moves the state along.
  fn advance_state(&mut self, tag: ChunkTag) -> PngResult<()> {
    use WalkState::*;
    if self.state == Start && tag != ChunkTag::IHDR {
      return Err(PngError::ChunkOutOfOrder);
    }
    // a non-IDAT chunk of any kind ends the contiguous IDAT run
    if self.state == InIdat && tag != ChunkTag::IDAT {
      self.state = AfterIdat;
    }
    match tag {
      ChunkTag::IHDR => match self.state {
        Start => self.state = AfterIhdr,
        _ => return Err(PngError::DuplicateChunk),
      },
      ChunkTag::PLTE => match self.state {
        // a background seen before the palette is out of order, not just
        // a duplicate-count problem
        AfterIhdr if self.count_of(ChunkTag::BKGD) == 0 => self.state = AfterPlte,
        AfterPlte => return Err(PngError::DuplicateChunk),
        _ => return Err(PngError::ChunkOutOfOrder),
      },
      ChunkTag::GAMA | ChunkTag::BKGD => match self.state {
        AfterIhdr | AfterPlte => (),
        _ => return Err(PngError::ChunkOutOfOrder),
      },
      ChunkTag::IDAT => match self.state {
        AfterIhdr | AfterPlte | InIdat => self.state = InIdat,
        _ => return Err(PngError::ChunkOutOfOrder),
      },
      // the trailer may close the stream from anywhere; whether image data
      // ever appeared is a cardinality question
      ChunkTag::IEND => (),
      // unrecognized chunks have no position rules
      _ => (),
    }
    Ok(())
  }

  fn count_of(&self, tag: ChunkTag) -> u32 {
    recognized_index(tag).map(|i| self.counts[i]).unwrap_or(0)
  }

  /// The whole-stream checks that only make sense once the walk is over.
  fn finish(self) -> PngResult<ParsedPng<'b>> {
    if self.state != WalkState::Done {
      return Err(PngError::MissingIend);
    }
    for (info, &n) in RECOGNIZED.iter().zip(self.counts.iter()) {
      match info.cardinality {
        Cardinality::ExactlyOne if n != 1 => {
          return Err(if info.tag == ChunkTag::IEND {
            PngError::MissingIend
          } else {
            PngError::DuplicateChunk
          });
        }
        Cardinality::ZeroOrOne if n > 1 => return Err(PngError::DuplicateChunk),
        Cardinality::OneOrMore if n == 0 => return Err(PngError::MissingIdat),
        _ => (),
      }
    }
    let ihdr = self.ihdr.ok_or(PngError::ChunkOutOfOrder)?;
    if ihdr.format.is_indexed() && self.plte.is_none() {
      return Err(PngError::MissingPalette);
    }
    Ok(ParsedPng {
      ihdr,
      plte: self.plte,
      gamma: self.gamma,
      background: self.background,
      idat: self.idat,
    })
  }
}

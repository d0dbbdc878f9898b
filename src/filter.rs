//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.

use alloc::vec::Vec;

use crate::error::{PngError, PngResult};

/// Inverts the per-scanline filters, holding exactly two scanlines of
/// state.
///
/// The window buffer is `2 * line_stride` bytes; the cursor advances one
/// stride per row, so which half is "current" and which is "previous"
/// swaps every row. A fresh engine has an all-zero previous row, which is
/// exactly what the first scanline's filters are defined against. Each
/// Adam7 reduced image gets its own fresh engine.
pub(crate) struct Unfilterer {
  window: Vec<u8>,
  line_stride: usize,
  pixel_stride: usize,
  /// Byte position in the (conceptually unbounded) filtered stream; the
  /// window address is this modulo `2 * line_stride`.
  index: usize,
}
impl Unfilterer {
  pub(crate) fn new(line_stride: usize, pixel_stride: usize) -> PngResult<Self> {
    debug_assert!(line_stride >= pixel_stride);
    let mut window = Vec::new();
    window.try_reserve_exact(2 * line_stride)?;
    window.resize(2 * line_stride, 0);
    Ok(Self { window, line_stride, pixel_stride, index: 0 })
  }

  /// Reconstructs one scanline from its filter byte and filtered bytes,
  /// returning the recovered bytes.
  ///
  /// ## Failure
  /// * [`PngError::IllegalFilterType`] for a filter byte outside `0..=4`.
  pub(crate) fn unfilter_line(&mut self, filter_ty: u8, filtered: &[u8]) -> PngResult<&[u8]> {
    let ls = self.line_stride;
    let ps = self.pixel_stride;
    debug_assert_eq!(filtered.len(), ls);
    let cur_is_low = (self.index / ls) % 2 == 0;
    let (cur, prev) = {
      let (low, high) = self.window.split_at_mut(ls);
      if cur_is_low {
        (low, high)
      } else {
        (high, low)
      }
    };
    cur.copy_from_slice(filtered);
    match filter_ty {
      0 => (),
      1 => {
        // Sub: the first pixel has no left neighbor and passes through
        for i in ps..ls {
          cur[i] = cur[i].wrapping_add(cur[i - ps]);
        }
      }
      2 => {
        // Up
        for i in 0..ls {
          cur[i] = cur[i].wrapping_add(prev[i]);
        }
      }
      3 => {
        // Average, floor division after summing in wider math
        for i in 0..ls {
          let a = if i >= ps { u32::from(cur[i - ps]) } else { 0 };
          let b = u32::from(prev[i]);
          cur[i] = cur[i].wrapping_add(((a + b) / 2) as u8);
        }
      }
      4 => {
        // Paeth
        for i in 0..ls {
          let a = if i >= ps { cur[i - ps] } else { 0 };
          let b = prev[i];
          let c = if i >= ps { prev[i - ps] } else { 0 };
          cur[i] = cur[i].wrapping_add(paeth_predict(a, b, c));
        }
      }
      _ => return Err(PngError::IllegalFilterType),
    }
    self.index += ls;
    let start = if cur_is_low { 0 } else { ls };
    Ok(&self.window[start..start + ls])
  }
}

/// The Paeth filter function computes a simple linear function of the three
/// neighboring bytes (left `a`, above `b`, upper left `c`) and picks the
/// neighbor closest to it.
///
/// The PNG spec says the calculation "shall be performed exactly, without
/// overflow", so this widens to i32 before subtracting, and it is extremely
/// specific that the order of the tie-breaking tests must not change.
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn paeth_tie_breaks_toward_a_then_b() {
    // pa and pb are both 5 here; the tie goes to `a`
    assert_eq!(paeth_predict(10, 20, 15), 10);
    // pb and pc tie at 1; the tie goes to `b`
    assert_eq!(paeth_predict(1, 4, 2), 4);
    // and plain nearest-neighbor picks otherwise
    assert_eq!(paeth_predict(1, 200, 3), 200);
    assert_eq!(paeth_predict(0, 0, 0), 0);
    assert_eq!(paeth_predict(255, 255, 255), 255);
  }

  #[test]
  fn sub_filter_accumulates_left() {
    let mut un = Unfilterer::new(2, 1).unwrap();
    assert_eq!(un.unfilter_line(0, &[0x10, 0x20]).unwrap(), &[0x10, 0x20]);
    assert_eq!(un.unfilter_line(1, &[0x05, 0x07]).unwrap(), &[0x15, 0x1C]);
  }

  #[test]
  fn up_filter_uses_the_previous_row() {
    let mut un = Unfilterer::new(3, 3).unwrap();
    assert_eq!(un.unfilter_line(0, &[1, 2, 3]).unwrap(), &[1, 2, 3]);
    assert_eq!(un.unfilter_line(2, &[10, 10, 255]).unwrap(), &[11, 12, 2]);
    // the window wraps and the roles swap again
    assert_eq!(un.unfilter_line(2, &[1, 1, 1]).unwrap(), &[12, 13, 3]);
  }

  #[test]
  fn average_floors_the_sum() {
    let mut un = Unfilterer::new(2, 1).unwrap();
    // no previous row, so only the left neighbor contributes
    assert_eq!(un.unfilter_line(3, &[2, 4]).unwrap(), &[2, 5]);
    // row two: a from the left, b from above, (a + b) / 2 rounds down
    assert_eq!(un.unfilter_line(3, &[0, 0]).unwrap(), &[1, 3]);
  }

  #[test]
  fn up_on_the_first_row_sees_zeros() {
    let mut un = Unfilterer::new(2, 1).unwrap();
    assert_eq!(un.unfilter_line(2, &[9, 9]).unwrap(), &[9, 9]);
  }

  #[test]
  fn paeth_row_math() {
    let mut un = Unfilterer::new(2, 1).unwrap();
    assert_eq!(un.unfilter_line(0, &[10, 20]).unwrap(), &[10, 20]);
    // first byte: a=0 b=10 c=0 predicts 10; second: a=11, b=20, c=10
    // predicts 20 (p=21, pa=10, pb=1)
    assert_eq!(un.unfilter_line(4, &[1, 1]).unwrap(), &[11, 21]);
  }

  #[test]
  fn filter_bytes_past_four_are_rejected() {
    let mut un = Unfilterer::new(1, 1).unwrap();
    assert_eq!(un.unfilter_line(5, &[0]), Err(PngError::IllegalFilterType));
    assert_eq!(un.unfilter_line(255, &[0]), Err(PngError::IllegalFilterType));
  }
}

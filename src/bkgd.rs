use crate::{
  error::{PngError, PngResult},
  ihdr::PixelFormat,
};

/// `bKGD`: background color.
///
/// Gives an intended background for the image, in a shape keyed off the
/// image's color type: greyscale images (with or without alpha) store one
/// 16-bit level, truecolor images store a 16-bit triple, and indexed images
/// store a palette index. The implied alpha is always fully opaque.
///
/// Spec: [bKGD](https://www.w3.org/TR/png/#11bKGD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Background {
  /// A grey level, for the `Y` and `YA` formats.
  Y {
    /// The grey level, 16-bit regardless of the image's bit depth.
    y: u16,
  },
  /// A color, for the `RGB` and `RGBA` formats.
  Rgb {
    /// Red.
    r: u16,
    /// Green.
    g: u16,
    /// Blue.
    b: u16,
  },
  /// A palette index, for the indexed formats.
  Index {
    /// The palette entry to use.
    i: u8,
  },
}
impl Background {
  /// Parses a background payload against the image's pixel format.
  ///
  /// ## Failure
  /// * [`PngError::IllegalBkgd`] when the payload size doesn't match what
  ///   the format calls for.
  pub(crate) fn from_payload(data: &[u8], format: PixelFormat) -> PngResult<Self> {
    use PixelFormat::*;
    match (format, data) {
      (Y1 | Y2 | Y4 | Y8 | Y16 | YA8 | YA16, [y0, y1]) => {
        Ok(Background::Y { y: u16::from_be_bytes([*y0, *y1]) })
      }
      (RGB8 | RGB16 | RGBA8 | RGBA16, [r0, r1, g0, g1, b0, b1]) => Ok(Background::Rgb {
        r: u16::from_be_bytes([*r0, *r1]),
        g: u16::from_be_bytes([*g0, *g1]),
        b: u16::from_be_bytes([*b0, *b1]),
      }),
      (I1 | I2 | I4 | I8, [i]) => Ok(Background::Index { i: *i }),
      _ => Err(PngError::IllegalBkgd),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn payload_shape_follows_the_color_type() {
    assert_eq!(
      Background::from_payload(&[0x01, 0x02], PixelFormat::Y8),
      Ok(Background::Y { y: 0x0102 })
    );
    assert_eq!(
      Background::from_payload(&[0, 1, 0, 2, 0, 3], PixelFormat::RGBA16),
      Ok(Background::Rgb { r: 1, g: 2, b: 3 })
    );
    assert_eq!(
      Background::from_payload(&[7], PixelFormat::I4),
      Ok(Background::Index { i: 7 })
    );
    // a greyscale image can't take an index-shaped payload, and so on
    assert!(Background::from_payload(&[7], PixelFormat::Y8).is_err());
    assert!(Background::from_payload(&[0, 1], PixelFormat::RGB8).is_err());
    assert!(Background::from_payload(&[0, 1, 0, 2, 0, 3], PixelFormat::I8).is_err());
  }
}

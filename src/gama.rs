use crate::error::{PngError, PngResult};

/// `gAMA`: image gamma.
///
/// The value is stored as an integer 100,000 times the real gamma.
///
/// **Example:** a gamma of 1/2.2 is stored as 45,455.
///
/// Spec: [gAMA](https://www.w3.org/TR/png/#11gAMA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gamma(pub u32);
impl Gamma {
  pub(crate) fn from_payload(data: &[u8]) -> PngResult<Self> {
    match data.try_into() {
      Ok(bytes) => Ok(Self(u32::from_be_bytes(bytes))),
      Err(_) => Err(PngError::IllegalGama),
    }
  }

  /// The gamma exponent: the stored value divided by 100,000.
  #[inline]
  #[must_use]
  pub fn to_exponent(self) -> f32 {
    self.0 as f32 / 100_000.0
  }
}

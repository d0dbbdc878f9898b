//! The pixel value types the decoder writes out.
//!
//! Greyscale and indexed samples are bare `u8`/`u16` values, so only the
//! multi-channel layouts get a struct. 16-bit channels hold the value
//! assembled from the stream's big-endian byte pairs.

use bytemuck::{Pod, Zeroable};

/// An 8-bits per channel greyscale + alpha pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct YA8 {
  pub y: u8,
  pub a: u8,
}

/// A 16-bits per channel greyscale + alpha pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct YA16 {
  pub y: u16,
  pub a: u16,
}

/// An RGB pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An RGB pixel, 16 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB16 {
  pub r: u16,
  pub g: u16,
  pub b: u16,
}

/// An RGBA pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

/// An RGBA pixel, 16 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA16 {
  pub r: u16,
  pub g: u16,
  pub b: u16,
  pub a: u16,
}

unsafe impl Zeroable for YA8 {}
unsafe impl Zeroable for YA16 {}
unsafe impl Zeroable for RGB8 {}
unsafe impl Zeroable for RGB16 {}
unsafe impl Zeroable for RGBA8 {}
unsafe impl Zeroable for RGBA16 {}
//
unsafe impl Pod for YA8 {}
unsafe impl Pod for YA16 {}
unsafe impl Pod for RGB8 {}
unsafe impl Pod for RGB16 {}
unsafe impl Pod for RGBA8 {}
unsafe impl Pod for RGBA16 {}

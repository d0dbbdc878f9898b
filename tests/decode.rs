use miniz_oxide::deflate::compress_to_vec_zlib;
use pnglet::*;

/// Bitwise CRC-32, deliberately independent of the library's table-driven
/// one.
fn crc32(bytes: impl Iterator<Item = u8>) -> u32 {
  let mut c = u32::MAX;
  for byte in bytes {
    c ^= u32::from(byte);
    for _ in 0..8 {
      c = if (c & 1) != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
    }
  }
  c ^ u32::MAX
}

fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
  let mut out = Vec::new();
  out.extend((payload.len() as u32).to_be_bytes());
  out.extend(tag);
  out.extend(payload);
  out.extend(crc32(tag.iter().chain(payload).copied()).to_be_bytes());
  out
}

fn ihdr_chunk(w: u32, h: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
  let mut payload = Vec::new();
  payload.extend(w.to_be_bytes());
  payload.extend(h.to_be_bytes());
  payload.extend([depth, color, 0, 0, interlace]);
  chunk(b"IHDR", &payload)
}

/// Deflates raw (filter byte + scanline) data into a single IDAT chunk.
fn idat_chunk(raw: &[u8]) -> Vec<u8> {
  chunk(b"IDAT", &compress_to_vec_zlib(raw, 6))
}

fn png_stream(chunks: &[Vec<u8>]) -> Vec<u8> {
  let mut out = PNG_SIGNATURE.to_vec();
  for c in chunks {
    out.extend(c);
  }
  out
}

fn simple_png(w: u32, h: u32, depth: u8, color: u8, raw: &[u8]) -> Vec<u8> {
  png_stream(&[ihdr_chunk(w, h, depth, color, 0), idat_chunk(raw), chunk(b"IEND", &[])])
}

#[test]
fn rejects_anything_without_the_signature() {
  assert_eq!(decode_png(&[0; 8]), Err(PngError::NotPng));
  assert_eq!(decode_png(&[0; 64]), Err(PngError::NotPng));
  assert_eq!(decode_png(&[]), Err(PngError::NotPng));
  assert_eq!(PngError::NotPng.kind(), ErrorKind::NotPng);
}

#[test]
fn minimal_rgba_image() {
  let bytes = simple_png(1, 1, 8, 6, &[0, 0xAA, 0xBB, 0xCC, 0xDD]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!((png.width, png.height), (1, 1));
  match png.pixels {
    PixelStore::Rgba8(bitmap) => {
      assert_eq!(bitmap.pixels, [RGBA8 { r: 0xAA, g: 0xBB, b: 0xCC, a: 0xDD }]);
    }
    other => panic!("wrong store variant: {other:?}"),
  }
}

#[test]
fn sub_filtered_grayscale() {
  // row 0 unfiltered, row 1 sub-filtered: each byte adds the one to its left
  let bytes = simple_png(2, 2, 8, 0, &[0, 0x10, 0x20, 1, 0x05, 0x07]);
  let png = decode_png(&bytes).unwrap();
  match png.pixels {
    PixelStore::Y8(bitmap) => assert_eq!(bitmap.pixels, [0x10, 0x20, 0x15, 0x1C]),
    other => panic!("wrong store variant: {other:?}"),
  }
}

#[test]
fn every_format_decodes_a_single_pixel() {
  // (depth, color, one filtered sample's bytes)
  let cases: &[(u8, u8, &[u8])] = &[
    (1, 0, &[0x80]),
    (2, 0, &[0xC0]),
    (4, 0, &[0x70]),
    (8, 0, &[0x2A]),
    (16, 0, &[0x12, 0x34]),
    (8, 2, &[1, 2, 3]),
    (16, 2, &[1, 2, 3, 4, 5, 6]),
    (1, 3, &[0x00]),
    (2, 3, &[0x40]),
    (4, 3, &[0x10]),
    (8, 3, &[0x01]),
    (8, 4, &[9, 8]),
    (16, 4, &[1, 2, 3, 4]),
    (8, 6, &[1, 2, 3, 4]),
    (16, 6, &[1, 2, 3, 4, 5, 6, 7, 8]),
  ];
  for &(depth, color, sample) in cases {
    let mut raw = vec![0_u8];
    raw.extend(sample);
    let mut chunks = vec![ihdr_chunk(1, 1, depth, color, 0)];
    if color == 3 {
      chunks.push(chunk(b"PLTE", &[10, 20, 30, 40, 50, 60]));
    }
    chunks.push(idat_chunk(&raw));
    chunks.push(chunk(b"IEND", &[]));
    let png = decode_png(&png_stream(&chunks))
      .unwrap_or_else(|e| panic!("depth {depth} color {color} failed: {e:?}"));
    assert_eq!((png.width, png.height), (1, 1), "depth {depth} color {color}");
    assert_eq!(png.pixels.pixel_count(), 1, "depth {depth} color {color}");
    assert_eq!(png.pixels.dimensions(), (1, 1), "depth {depth} color {color}");
  }
}

#[test]
fn adam7_solid_gray() {
  // 8x8 solid 0x42: reduced images are 1x1, 1x1, 2x1, 2x2, 4x2, 4x4, 8x4,
  // every scanline unfiltered
  let mut raw = Vec::new();
  for (w, h) in [(1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)] {
    for _ in 0..h {
      raw.push(0);
      raw.extend(std::iter::repeat(0x42_u8).take(w));
    }
  }
  let bytes = png_stream(&[ihdr_chunk(8, 8, 8, 0, 1), idat_chunk(&raw), chunk(b"IEND", &[])]);
  let png = decode_png(&bytes).unwrap();
  match png.pixels {
    PixelStore::Y8(bitmap) => {
      assert_eq!(bitmap.pixels.len(), 64);
      assert!(bitmap.pixels.iter().all(|&y| y == 0x42));
    }
    other => panic!("wrong store variant: {other:?}"),
  }
}

#[test]
fn adam7_matches_the_straight_scan_order() {
  // all filters `none`, so interlacing is purely a reordering: both layouts
  // of the same 8x8 gradient have to produce identical pixel buffers
  const ORIGIN_X: [u32; 7] = [0, 4, 0, 2, 0, 1, 0];
  const ORIGIN_Y: [u32; 7] = [0, 0, 4, 0, 2, 0, 1];
  const STEP_X: [u32; 7] = [8, 8, 4, 4, 2, 2, 1];
  const STEP_Y: [u32; 7] = [8, 8, 8, 4, 4, 2, 2];
  let value = |x: u32, y: u32| (16 * y + x) as u8;

  let mut straight = Vec::new();
  for y in 0..8 {
    straight.push(0);
    straight.extend((0..8).map(|x| value(x, y)));
  }
  let mut interlaced = Vec::new();
  for pass in 0..7 {
    let xs: Vec<u32> = (ORIGIN_X[pass]..8).step_by(STEP_X[pass] as usize).collect();
    let ys: Vec<u32> = (ORIGIN_Y[pass]..8).step_by(STEP_Y[pass] as usize).collect();
    if xs.is_empty() || ys.is_empty() {
      continue;
    }
    for &y in &ys {
      interlaced.push(0);
      interlaced.extend(xs.iter().map(|&x| value(x, y)));
    }
  }

  let a = decode_png(&simple_png(8, 8, 8, 0, &straight)).unwrap();
  let b = decode_png(&png_stream(&[
    ihdr_chunk(8, 8, 8, 0, 1),
    idat_chunk(&interlaced),
    chunk(b"IEND", &[]),
  ]))
  .unwrap();
  assert_eq!(a.pixels, b.pixels);
}

#[test]
fn adam7_one_bit_deep() {
  // 8x8 depth-1 solid white: sub-byte samples inside each pass pack from
  // the high bits of that pass's own bytes
  let mut raw = Vec::new();
  for (w, h) in [(1_u32, 1_u32), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)] {
    let packed: u8 = match w {
      1 => 0x80,
      2 => 0xC0,
      4 => 0xF0,
      _ => 0xFF,
    };
    for _ in 0..h {
      raw.extend([0, packed]);
    }
  }
  let bytes = png_stream(&[ihdr_chunk(8, 8, 1, 0, 1), idat_chunk(&raw), chunk(b"IEND", &[])]);
  let png = decode_png(&bytes).unwrap();
  match png.pixels {
    PixelStore::Y1(bitmap) => assert!(bitmap.pixels.iter().all(|&y| y == 1)),
    other => panic!("wrong store variant: {other:?}"),
  }
}

#[test]
fn unknown_chunk_handling_follows_the_case_bit() {
  let make = |tag: &[u8; 4]| {
    png_stream(&[
      ihdr_chunk(1, 1, 8, 0, 0),
      chunk(tag, &[1, 2, 3]),
      idat_chunk(&[0, 0x55]),
      chunk(b"IEND", &[]),
    ])
  };
  // lowercase first letter: ancillary, quietly skipped
  assert!(decode_png(&make(b"bLUB")).is_ok());
  assert!(decode_png(&make(b"bLUb")).is_ok());
  // uppercase first letter: critical, fatal
  let err = decode_png(&make(b"BLUB")).unwrap_err();
  assert_eq!(err, PngError::UnknownCriticalChunk);
  assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn one_flipped_bit_fails_the_crc() {
  let mut bytes = simple_png(1, 1, 8, 0, &[0, 7]);
  // offset 16 is the first IHDR payload byte: signature, length, tag
  bytes[16] ^= 0x01;
  assert_eq!(decode_png(&bytes), Err(PngError::CrcMismatch));
  // flipping a tag bit instead turns IHDR into an unknown chunk, but the
  // CRC check comes first
  let mut bytes = simple_png(1, 1, 8, 0, &[0, 7]);
  bytes[12] ^= 0x01;
  assert_eq!(decode_png(&bytes), Err(PngError::CrcMismatch));
}

#[test]
fn truncated_streams_fail() {
  let bytes = simple_png(2, 2, 8, 0, &[0, 1, 2, 0, 3, 4]);
  for cut in 1..=8 {
    let err = decode_png(&bytes[..bytes.len() - cut]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData, "cut {cut} gave {err:?}");
  }
}

#[test]
fn short_zlib_stream_fails() {
  // frame a *valid* chunk around a cut-short zlib stream
  let mut compressed = compress_to_vec_zlib(&[0, 1, 2, 0, 3, 4], 6);
  compressed.truncate(compressed.len() / 2);
  let bytes = png_stream(&[
    ihdr_chunk(2, 2, 8, 0, 0),
    chunk(b"IDAT", &compressed),
    chunk(b"IEND", &[]),
  ]);
  let err = decode_png(&bytes).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn inflated_size_must_match_the_header_exactly() {
  // one trailing byte too many
  let err = decode_png(&simple_png(1, 1, 8, 0, &[0, 7, 9])).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidData);
  // one byte short
  let err = decode_png(&simple_png(1, 1, 8, 0, &[0])).unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn palette_sizes_at_the_depth_boundary() {
  let with_palette_entries = |n: usize| {
    let mut raw = vec![0_u8];
    raw.push(0x00);
    png_stream(&[
      ihdr_chunk(1, 1, 2, 3, 0),
      chunk(b"PLTE", &vec![0; n * 3]),
      idat_chunk(&raw),
      chunk(b"IEND", &[]),
    ])
  };
  // 2^2 entries fits a 2-bit index
  assert!(decode_png(&with_palette_entries(4)).is_ok());
  assert_eq!(decode_png(&with_palette_entries(5)), Err(PngError::IllegalPlte));
}

#[test]
fn indexed_images_need_a_palette() {
  let bytes =
    png_stream(&[ihdr_chunk(1, 1, 8, 3, 0), idat_chunk(&[0, 0]), chunk(b"IEND", &[])]);
  assert_eq!(decode_png(&bytes), Err(PngError::MissingPalette));
}

#[test]
fn chunk_ordering_is_enforced() {
  let gama = || chunk(b"gAMA", &45_455_u32.to_be_bytes());
  let plte = || chunk(b"PLTE", &[1, 2, 3]);
  // palette after image data
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    idat_chunk(&[0, 7]),
    plte(),
    chunk(b"IEND", &[]),
  ]);
  assert_eq!(decode_png(&bytes), Err(PngError::ChunkOutOfOrder));
  // a recognized chunk between two image data chunks
  let compressed = compress_to_vec_zlib(&[0, 7], 6);
  let (first, second) = compressed.split_at(compressed.len() / 2);
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    chunk(b"IDAT", first),
    gama(),
    chunk(b"IDAT", second),
    chunk(b"IEND", &[]),
  ]);
  assert_eq!(decode_png(&bytes), Err(PngError::ChunkOutOfOrder));
  // split image data with nothing between is fine
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    chunk(b"IDAT", first),
    chunk(b"IDAT", second),
    chunk(b"IEND", &[]),
  ]);
  assert!(decode_png(&bytes).is_ok());
  // gamma twice
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    gama(),
    gama(),
    idat_chunk(&[0, 7]),
    chunk(b"IEND", &[]),
  ]);
  assert_eq!(decode_png(&bytes), Err(PngError::DuplicateChunk));
  // background sitting before the palette it indexes into
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 3, 0),
    chunk(b"bKGD", &[0]),
    plte(),
    idat_chunk(&[0, 0]),
    chunk(b"IEND", &[]),
  ]);
  assert_eq!(decode_png(&bytes), Err(PngError::ChunkOutOfOrder));
  // no image data at all
  let bytes = png_stream(&[ihdr_chunk(1, 1, 8, 0, 0), chunk(b"IEND", &[])]);
  assert_eq!(decode_png(&bytes), Err(PngError::MissingIdat));
  // no trailer
  let bytes = png_stream(&[ihdr_chunk(1, 1, 8, 0, 0), idat_chunk(&[0, 7])]);
  assert_eq!(decode_png(&bytes), Err(PngError::MissingIend));
}

#[test]
fn gamma_and_background_come_along() {
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    chunk(b"gAMA", &45_455_u32.to_be_bytes()),
    chunk(b"bKGD", &[0, 42]),
    idat_chunk(&[0, 7]),
    chunk(b"IEND", &[]),
  ]);
  let png = decode_png(&bytes).unwrap();
  let gamma = png.gamma.unwrap();
  assert_eq!(gamma, Gamma(45_455));
  assert!((gamma.to_exponent() - 0.45455).abs() < 1e-6);
  assert_eq!(png.background, Some(Background::Y { y: 42 }));
  // truecolor and indexed backgrounds take their own shapes
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 2, 0),
    chunk(b"bKGD", &[0, 1, 0, 2, 0, 3]),
    idat_chunk(&[0, 7, 8, 9]),
    chunk(b"IEND", &[]),
  ]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!(png.background, Some(Background::Rgb { r: 1, g: 2, b: 3 }));
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 3, 0),
    chunk(b"PLTE", &[1, 2, 3]),
    chunk(b"bKGD", &[0]),
    idat_chunk(&[0, 0]),
    chunk(b"IEND", &[]),
  ]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!(png.background, Some(Background::Index { i: 0 }));
}

#[test]
fn malformed_ancillary_chunks_are_skipped() {
  // a 3-byte gamma payload parses as nothing, but the decode carries on
  let bytes = png_stream(&[
    ihdr_chunk(1, 1, 8, 0, 0),
    chunk(b"gAMA", &[1, 2, 3]),
    idat_chunk(&[0, 7]),
    chunk(b"IEND", &[]),
  ]);
  let png = decode_png(&bytes).unwrap();
  assert_eq!(png.gamma, None);
}

#[test]
fn pixel_limit_is_respected() {
  let bytes = simple_png(2, 2, 8, 0, &[0, 1, 2, 0, 3, 4]);
  let limited = DecodeOptions { max_pixels: Some(3) };
  let err = decode_png_with(&bytes, &limited).unwrap_err();
  assert_eq!(err, PngError::ImageTooLarge);
  assert_eq!(err.kind(), ErrorKind::Unsupported);
  let roomy = DecodeOptions { max_pixels: Some(4) };
  assert!(decode_png_with(&bytes, &roomy).is_ok());
}

#[test]
fn decoding_twice_gives_identical_buffers() {
  let bytes = simple_png(3, 2, 8, 2, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
  assert_eq!(decode_png(&bytes).unwrap(), decode_png(&bytes).unwrap());
}

#[test]
fn reading_from_a_seekable_source() {
  use std::io::Read;
  let bytes = simple_png(1, 1, 8, 6, &[0, 1, 2, 3, 4]);
  let mut cursor = std::io::Cursor::new(bytes.clone());
  // the decoder rewinds, so a source that's already been read from is fine
  let mut scratch = [0; 4];
  cursor.read_exact(&mut scratch).unwrap();
  let from_reader = decode_png_from_reader(&mut cursor, &DecodeOptions::default()).unwrap();
  assert_eq!(from_reader, decode_png(&bytes).unwrap());
}

#[test]
fn random_bytes_never_panic_the_decoder() {
  for _ in 0..10 {
    let mut buffer = vec![0; 1024];
    getrandom::getrandom(&mut buffer).unwrap();
    assert!(decode_png(&buffer).is_err());
  }
  // and random chunk regions behind a real signature shouldn't panic either
  for _ in 0..10 {
    let mut buffer = vec![0; 1024];
    getrandom::getrandom(&mut buffer).unwrap();
    buffer[..8].copy_from_slice(&PNG_SIGNATURE);
    let _ = decode_png(&buffer);
  }
}

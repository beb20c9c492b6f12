/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::read;

use sail::LoadSession;
use sail_bmp::BOTTOM_UP_PROPERTY;
use sail_core::common::Orientation;
use sail_core::options::Variant;
use sail_core::pixel_format::PixelFormat;

use crate::{hash, manifest_path, synthesize_bmp, test_context, TestEntry};

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_bmp() {
    let json_file = read(manifest_path("bmp.json")).unwrap();
    let entries: Vec<TestEntry> = serde_json::from_slice(&json_file).unwrap();

    let context = test_context();
    let mut error = false;
    let mut failed = Vec::new();

    for entry in &entries {
        let data = synthesize_bmp(entry);
        let image = context.load_from_memory(&data).unwrap();

        let expected_format = PixelFormat::from_name(&entry.pixel_format).unwrap();
        let expected_hash = hash(&entry.expected);
        let hash = hash(&image.pixels);

        if hash != expected_hash
            || image.pixel_format != expected_format
            || image.bytes_per_line != entry.bytes_per_line
        {
            error = true;
            failed.push(entry.name.clone());
            // report error
            let err = format!(
                "Mismatch for {}\nExpected {} {} bytes per line hash {}\nFound {} {} bytes per line hash {}\nConfig:{:#?}",
                entry.name,
                expected_format,
                entry.bytes_per_line,
                expected_hash,
                image.pixel_format,
                image.bytes_per_line,
                hash,
                entry
            );
            eprintln!("{}\n", err);
        }
    }
    if error {
        panic!("Errors found during test decoding\n {:#?}", failed);
    }
}

/// A 2x2 monochrome bitmap whose first stored row is the bottom one
#[test]
fn bottom_up_rows_are_flipped() {
    let entry = TestEntry {
        name:           "2x2 monochrome".to_string(),
        header_size:    40,
        width:          2,
        height:         2,
        bit_count:      1,
        compression:    0,
        palette:        vec![[0, 0, 0, 0], [255, 255, 255, 0]],
        // bottom row: white black, top row: black white
        stored:         vec![0b1000_0000, 0, 0, 0, 0b0100_0000, 0, 0, 0],
        pixel_format:   "BPP1-INDEXED".to_string(),
        bytes_per_line: 1,
        expected:       vec![0b0100_0000, 0b1000_0000],
        comment:        None
    };
    let data = synthesize_bmp(&entry);

    let context = test_context();
    let info = context.resolve_by_magic_bytes(&data).unwrap();
    assert_eq!(info.name(), "BMP");

    let codec = context.load_handle(info).unwrap();
    let mut session = LoadSession::start_memory(codec, &data, None).unwrap();
    let image = session.next_frame().unwrap();
    session.stop().unwrap();

    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(image.pixel_format, PixelFormat::Bpp1Indexed);
    // the top row is the last stored line
    assert_eq!(image.scan_line(0), Some(&[0b0100_0000_u8][..]));
    assert_eq!(image.scan_line(1), Some(&[0b1000_0000_u8][..]));

    let palette = image.palette.as_ref().unwrap();
    assert_eq!(palette.entry(0), Some(&[0_u8, 0, 0][..]));
    assert_eq!(palette.entry(1), Some(&[255_u8, 255, 255][..]));

    let source = image.source_image.unwrap();
    assert_eq!(source.orientation, Orientation::Normal);
    assert_ne!(source.orientation, Orientation::MirroredVertically);
    assert_eq!(source.pixel_format, PixelFormat::Bpp1Indexed);
    assert_eq!(
        source.special_properties.get(BOTTOM_UP_PROPERTY),
        Some(&Variant::Bool(true))
    );
}

#[test]
fn bytes_per_line_matches_the_header() {
    // 5 pixels at 24 bits, 15 bytes per row, stored padded to 16
    let stored: Vec<u8> = (0..32).collect();
    let entry = TestEntry {
        name:           "5x2 bgr".to_string(),
        header_size:    124,
        width:          5,
        height:         -2,
        bit_count:      24,
        compression:    0,
        palette:        vec![],
        stored:         stored.clone(),
        pixel_format:   "BPP24-BGR".to_string(),
        bytes_per_line: 15,
        expected:       vec![],
        comment:        None
    };
    let image = test_context()
        .load_from_memory(&synthesize_bmp(&entry))
        .unwrap();

    assert_eq!(image.bytes_per_line, 15);
    assert_eq!(image.scan_line(0), Some(&stored[..15]));
    assert_eq!(image.scan_line(1), Some(&stored[16..31]));
}

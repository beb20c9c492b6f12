/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Interlaced frames through the RAW test codec

use sail::{LoadSession, SailError, SaveSession};
use sail_core::bytestream::{ExpandingBufferIo, MemoryIo};
use sail_core::image::Image;
use sail_core::options::{LoadOptions, SaveOptions};
use sail_core::pixel_format::PixelFormat;

use crate::raw::{pass_calls, reset_pass_calls, HEADER_SIZE, PASSES};
use crate::{hash, test_context};

const WIDTH: u32 = 7;
const HEIGHT: u32 = 10;

fn gradient() -> Image {
    let mut image = Image::new(WIDTH, HEIGHT, PixelFormat::Bpp8Grayscale).unwrap();
    image.pixels = (0..WIDTH * HEIGHT).map(|i| (i * 3 + 1) as u8).collect();
    image
}

/// Encode `image` with the RAW codec, interlaced or not
fn encode(image: &Image, interlaced: bool) -> Vec<u8> {
    let context = test_context();
    let codec = context
        .load_handle(context.resolve_by_name("RAW").unwrap())
        .unwrap();

    let options = SaveOptions::from_features(codec.info().save_features()).set_interlaced(interlaced);
    let mut io = ExpandingBufferIo::new();

    let mut session = SaveSession::start_io(codec, &mut io, Some(options)).unwrap();
    session.write_frame(image).unwrap();
    let written = session.stop().unwrap();
    drop(session);

    assert_eq!(written, Some((HEADER_SIZE + image.pixels.len()) as u64));
    io.into_inner()
}

#[test]
fn every_pass_is_decoded() {
    let reference = gradient();
    let data = encode(&reference, true);

    let context = test_context();
    assert_eq!(context.resolve_by_magic_bytes(&data).unwrap().name(), "RAW");
    let codec = context
        .load_handle(context.resolve_by_extension("raw8").unwrap())
        .unwrap();

    reset_pass_calls();
    let mut session = LoadSession::start_memory(codec, &data, None).unwrap();
    let image = session.next_frame().unwrap();
    session.stop().unwrap();

    assert_eq!(pass_calls(), (PASSES as usize, PASSES as usize));
    assert!(image.source_image.as_ref().unwrap().interlaced);
    assert_eq!(image.interlaced_passes, PASSES);
    assert_eq!(hash(&image.pixels), hash(&reference.pixels));
}

#[test]
fn missing_passes_are_detected() {
    let reference = gradient();
    let data = encode(&reference, true);

    let context = test_context();
    let codec = context
        .load_handle(context.resolve_by_name("RAW").unwrap())
        .unwrap();
    let entries = *codec.load_entries();
    let seek_next_pass = entries.seek_next_pass.unwrap();

    // drive the codec by hand, one pass short
    let mut io = MemoryIo::new_read(&data);
    let mut state = (entries.init)(&mut io, &LoadOptions::default()).unwrap();
    let mut image = (entries.seek_next_frame)(&mut state, &mut io).unwrap();
    image.pixels = vec![0; image.pixels_size().unwrap()];

    for _ in 0..PASSES - 1 {
        seek_next_pass(&mut state, &mut io, &image).unwrap();
        (entries.frame)(&mut state, &mut io, &mut image).unwrap();
    }
    let partial = hash(&image.pixels);
    assert_ne!(partial, hash(&reference.pixels));

    seek_next_pass(&mut state, &mut io, &image).unwrap();
    (entries.frame)(&mut state, &mut io, &mut image).unwrap();
    (entries.finish)(state, &mut io).unwrap();

    assert_eq!(hash(&image.pixels), hash(&reference.pixels));
}

#[test]
fn progressive_frames_take_one_pass() {
    let reference = gradient();
    let data = encode(&reference, false);
    assert_eq!(data[HEADER_SIZE - 1], 0);

    reset_pass_calls();
    let context = test_context();
    let image = context.load_from_memory(&data).unwrap();

    assert_eq!(pass_calls(), (1, 1));
    assert!(!image.source_image.unwrap().interlaced);
    assert_eq!(hash(&image.pixels), hash(&reference.pixels));
}

#[test]
fn saving_writes_every_pass() {
    let reference = gradient();
    let context = test_context();
    let codec = context
        .load_handle(context.resolve_by_name("RAW").unwrap())
        .unwrap();

    reset_pass_calls();
    let mut buffer = vec![0; 256];
    let mut session = SaveSession::start_memory(codec, &mut buffer, None).unwrap();
    session.write_frame(&reference).unwrap();

    assert_eq!(session.stop().unwrap(), Some((HEADER_SIZE + 70) as u64));
    assert_eq!(session.stop().unwrap(), None);
    assert!(matches!(
        session.write_frame(&reference),
        Err(SailError::ConflictingOperation(_))
    ));
    drop(session);

    assert_eq!(pass_calls(), (PASSES as usize, PASSES as usize));
    assert_eq!(&buffer[..4], b"RAW8");
    // the first pass holds rows 0, 4 and 8
    assert_eq!(&buffer[HEADER_SIZE..HEADER_SIZE + 7], &reference.pixels[..7]);
    assert_eq!(
        &buffer[HEADER_SIZE + 7..HEADER_SIZE + 14],
        &reference.pixels[28..35]
    );
}

#[test]
fn frames_outside_save_features_are_rejected() {
    let context = test_context();
    let codec = context
        .load_handle(context.resolve_by_name("RAW").unwrap())
        .unwrap();
    let mut io = ExpandingBufferIo::new();
    let mut session = SaveSession::start_io(codec, &mut io, None).unwrap();

    let mut rgb = Image::new(2, 2, PixelFormat::Bpp24Rgb).unwrap();
    rgb.pixels = vec![0; 12];
    assert!(matches!(
        session.write_frame(&rgb),
        Err(SailError::UnsupportedPixelFormat(PixelFormat::Bpp24Rgb))
    ));

    let mut short_rows = gradient();
    short_rows.bytes_per_line = WIDTH - 1;
    assert!(matches!(
        session.write_frame(&short_rows),
        Err(SailError::InvalidArgument(_))
    ));

    let mut short_buffer = gradient();
    short_buffer.pixels.truncate(10);
    assert!(matches!(
        session.write_frame(&short_buffer),
        Err(SailError::InvalidArgument(_))
    ));
    assert_eq!(session.frames_written(), 0);
}

#[test]
fn registry_orders_codecs_by_priority() {
    let context = test_context();
    let names: Vec<&str> = context.codec_infos().iter().map(|info| info.name()).collect();

    // BMP is high priority, RAW lowest
    assert_eq!(names, ["BMP", "RAW"]);
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Load and save sessions driven through the built-in BMP codec
#![cfg(feature = "bmp")]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use sail::{Codec, Context, ContextConfig, ErrorKind, LoadSession, SailError, SaveSession};
use sail_core::bytestream::{IoFeatures, MemoryIo, SailIoError, SailIoTrait, SailSeekFrom};
use sail_core::image::Image;
use sail_core::options::LoadOptions;
use sail_core::pixel_format::PixelFormat;

/// A 2x2 uncompressed 24 bit bitmap, stored bottom-up
fn bmp_2x2() -> Vec<u8> {
    let mut out = vec![];
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&70_u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54_u32.to_le_bytes());

    out.extend_from_slice(&40_u32.to_le_bytes());
    out.extend_from_slice(&2_i32.to_le_bytes());
    out.extend_from_slice(&2_i32.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&24_u16.to_le_bytes());
    out.extend_from_slice(&[0; 24]);

    // bottom row, then top row, padded to 8 bytes
    out.extend_from_slice(&[1, 1, 1, 2, 2, 2, 0, 0]);
    out.extend_from_slice(&[3, 3, 3, 4, 4, 4, 0, 0]);
    out
}

fn bmp_codec(context: &Context) -> Arc<Codec> {
    let info = context.resolve_by_name("BMP").unwrap();
    context.load_handle(info).unwrap()
}

fn context() -> Context {
    Context::new_with_config(ContextConfig::new().set_client_codecs_paths(vec![]))
}

#[test]
fn frames_end_with_no_more_frames() {
    let context = context();
    let data = bmp_2x2();

    let mut session = LoadSession::start_memory(bmp_codec(&context), &data, None).unwrap();
    let image = session.next_frame().unwrap();

    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(image.pixel_format, PixelFormat::Bpp24Bgr);
    assert_eq!(image.bytes_per_line, 6);
    assert_eq!(image.pixels, [3, 3, 3, 4, 4, 4, 1, 1, 1, 2, 2, 2]);

    let err = session.next_frame().unwrap_err();
    assert!(err.is_no_more_frames());
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert_eq!(session.frames_read(), 1);

    session.stop().unwrap();
}

#[test]
fn stopped_sessions_refuse_frames() {
    let context = context();
    let data = bmp_2x2();

    let mut session = LoadSession::start_memory(bmp_codec(&context), &data, None).unwrap();
    session.stop().unwrap();
    // a second stop is a no-op
    session.stop().unwrap();

    assert!(session.is_stopped());
    assert!(matches!(
        session.next_frame(),
        Err(SailError::ConflictingOperation(_))
    ));
}

#[test]
fn borrowed_streams_stay_open() {
    let context = context();
    let data = bmp_2x2();
    let mut io = MemoryIo::new_read(&data);

    {
        let mut session = LoadSession::start_io(bmp_codec(&context), &mut io, None).unwrap();
        session.next_frame().unwrap();
    }
    // dropping the session stopped it without closing the stream
    assert!(io.tell().is_ok());
}

#[test]
fn probing_skips_pixels() {
    let context = context();
    let data = bmp_2x2();

    let session = LoadSession::start_memory(bmp_codec(&context), &data, None).unwrap();
    let image = session.probe().unwrap();

    assert_eq!((image.width, image.height), (2, 2));
    assert!(image.pixels.is_empty());
}

#[test]
fn broken_data_fails_start() {
    let context = context();
    let err = LoadSession::start_memory(bmp_codec(&context), b"BM\x00\x00", None)
        .err()
        .unwrap();

    assert_ne!(err.kind(), ErrorKind::Usage);
}

#[test]
fn options_limit_dimensions() {
    let context = context();
    let data = bmp_2x2();
    let options = LoadOptions::default().set_max_width(1);

    let result = LoadSession::start_memory(bmp_codec(&context), &data, Some(options))
        .and_then(|mut session| session.next_frame());
    assert!(result.is_err());
}

#[test]
fn files_are_owned_by_the_session() {
    let context = context();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.bmp");
    std::fs::write(&path, bmp_2x2()).unwrap();

    assert_eq!(context.resolve_by_file_magic(&path).unwrap().name(), "BMP");

    let mut session = LoadSession::start_file(bmp_codec(&context), &path, None).unwrap();
    assert_eq!(session.next_frame().unwrap().height, 2);
    session.stop().unwrap();

    let image = context.load_from_file(&path).unwrap();
    assert_eq!(image.pixels.len(), 12);
}

#[test]
fn loading_from_memory_sniffs_the_codec() {
    let context = context();
    let image = context.load_from_memory(&bmp_2x2()).unwrap();

    assert_eq!(image.scan_line(1), Some(&[1, 1, 1, 2, 2, 2][..]));
    assert!(context
        .load_from_memory(b"GIF89a\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00")
        .is_err());
}

#[test]
fn bmp_can_not_be_saved() {
    let context = context();
    let mut buffer = vec![0; 256];

    let err = SaveSession::start_memory(bmp_codec(&context), &mut buffer, None)
        .err()
        .unwrap();
    assert!(matches!(err, SailError::UnsupportedPixelFormat(_)));
}

#[test]
fn sessions_keep_unloaded_codecs_alive() {
    let context = context();
    let data = bmp_2x2();
    let codec = bmp_codec(&context);

    let mut session = LoadSession::start_memory(Arc::clone(&codec), &data, None).unwrap();
    context.unload_all();

    let image: Image = session.next_frame().unwrap();
    assert_eq!(image.width, 2);
    assert!(!Arc::ptr_eq(&codec, &bmp_codec(&context)));
}

#[test]
fn concurrent_loads_share_one_codec() {
    let context = context();
    let info = context.resolve_by_name("BMP").unwrap();

    let codecs: Vec<Arc<Codec>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| context.load_handle(info).unwrap()))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect()
    });

    for codec in &codecs[1..] {
        assert!(Arc::ptr_eq(&codecs[0], codec));
    }
    assert!(Arc::ptr_eq(&codecs[0], &bmp_codec(&context)));
}

/// A memory stream the caller can cut off while a session reads it
struct InterruptibleIo<'a> {
    inner:   MemoryIo<'a>,
    aborted: Rc<Cell<bool>>
}

impl InterruptibleIo<'_> {
    fn check(&self) -> Result<(), SailIoError> {
        if self.aborted.get() {
            return Err(SailIoError::Closed);
        }
        Ok(())
    }
}

impl SailIoTrait for InterruptibleIo<'_> {
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        self.check()?;
        self.inner.tolerant_read(buf)
    }

    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        self.check()?;
        self.inner.tolerant_write(buf)
    }

    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        self.check()?;
        self.inner.seek(from)
    }

    fn tell(&mut self) -> Result<u64, SailIoError> {
        self.check()?;
        self.inner.tell()
    }

    fn flush(&mut self) -> Result<(), SailIoError> {
        self.inner.flush()
    }

    fn close(&mut self) -> Result<(), SailIoError> {
        self.inner.close()
    }

    fn eof(&mut self) -> Result<bool, SailIoError> {
        self.check()?;
        self.inner.eof()
    }

    fn features(&self) -> IoFeatures {
        self.inner.features()
    }

    fn name(&self) -> &'static str {
        "interruptible"
    }
}

#[test]
fn aborted_streams_fail_only_their_session() {
    let context = context();
    let data = bmp_2x2();
    let aborted = Rc::new(Cell::new(false));
    let mut io = InterruptibleIo {
        inner:   MemoryIo::new_read(&data),
        aborted: Rc::clone(&aborted)
    };

    let mut session = LoadSession::start_io(bmp_codec(&context), &mut io, None).unwrap();
    aborted.set(true);

    let err = session.next_frame().unwrap_err();
    assert!(matches!(err, SailError::Io(SailIoError::Closed)));
    assert_eq!(err.kind(), ErrorKind::Io);
    session.stop().unwrap();
    drop(session);

    // the context is untouched
    let info = context.resolve_by_magic_bytes(&data).unwrap();
    assert_eq!(info.name(), "BMP");
    assert!(context.is_loaded(info));
    let image = context.load_from_memory(&data).unwrap();
    assert_eq!(image.pixels.len(), 12);
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A minimal layout 8 codec for exercising the host
//!
//! Files hold 8 bit grayscale frames
//!
//! ```text
//! "RAW8" | width u32 le | height u32 le | interlaced u8 | rows
//! ```
//!
//! Interlaced files store rows pass by pass, pass `p` holds every row
//! `y` with `y % 4 == p`.
use std::cell::Cell;

use sail_core::bytestream::{SailIoTrait, SailReader, SailWriter};
use sail_core::codec_symbol;
use sail_core::common::{Compression, Orientation, SailOptions};
use sail_core::image::{Image, SourceImage};
use sail_core::layout::{downcast_state, take_state, CodecModule, CodecState, EntryPoint, Export};
use sail_core::options::{LoadOptions, SaveOptions};
use sail_core::pixel_format::PixelFormat;
use sail_core::{SailError, SailResult};

const CODEC_NAME: &str = "RAW";
const MAGIC: &[u8; 4] = b"RAW8";
pub const HEADER_SIZE: usize = 13;
pub const PASSES: u32 = 4;

pub const DESCRIPTOR: &str = "
[codec]
layout=8
version=1.0.0
priority=lowest
name=RAW
description=Raw grayscale frames
magic-numbers=52 41 57 38
extensions=raw8
mime-types=image/x-raw8

[load-features]
features=STATIC;INTERLACED

[save-features]
features=STATIC;INTERLACED
output-pixel-formats=BPP8-GRAYSCALE
interlaced-passes=4
compression-types=NONE
default-compression=NONE
";

thread_local! {
    static SEEK_PASS_CALLS: Cell<usize> = const { Cell::new(0) };
    static FRAME_CALLS: Cell<usize> = const { Cell::new(0) };
}

/// Number of `seek_next_pass` and `frame` calls on this thread, load and save combined
pub fn pass_calls() -> (usize, usize) {
    (SEEK_PASS_CALLS.with(Cell::get), FRAME_CALLS.with(Cell::get))
}

pub fn reset_pass_calls() {
    SEEK_PASS_CALLS.with(|calls| calls.set(0));
    FRAME_CALLS.with(|calls| calls.set(0));
}

fn count(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    counter.with(|calls| calls.set(calls.get() + 1));
}

#[derive(Default)]
struct RawState {
    interlaced:     bool,
    passes_started: u32,
    current_pass:   u32,
    frame_seen:     bool
}

impl RawState {
    fn passes(&self) -> u32 {
        if self.interlaced {
            PASSES
        } else {
            1
        }
    }

    fn start_pass(&mut self) -> SailResult<()> {
        if self.passes_started >= self.passes() {
            return Err(SailError::ConflictingOperation("all passes are done"));
        }
        self.current_pass = self.passes_started;
        self.passes_started += 1;

        count(&SEEK_PASS_CALLS);
        Ok(())
    }

    fn rows(&self, height: u32) -> impl Iterator<Item = u32> {
        (self.current_pass..height).step_by(self.passes() as usize)
    }
}

fn load_init(_io: &mut dyn SailIoTrait, _options: &LoadOptions) -> SailResult<CodecState> {
    Ok(Box::<RawState>::default())
}

fn load_seek_next_frame(state: &mut CodecState, io: &mut dyn SailIoTrait) -> SailResult<Image> {
    let state = downcast_state::<RawState>(state, CODEC_NAME)?;

    if state.frame_seen {
        return Err(SailError::NoMoreFrames);
    }
    state.frame_seen = true;

    let mut reader = SailReader::new(io);

    if &reader.read_fixed_bytes_or_error::<4>()? != MAGIC {
        return Err(SailError::UnsupportedFormat("not a RAW8 file".to_string()));
    }
    let width = reader.get_u32_le_err()?;
    let height = reader.get_u32_le_err()?;
    state.interlaced = reader.get_u8_err()? != 0;
    state.passes_started = 0;

    let mut image = Image::new(width, height, PixelFormat::Bpp8Grayscale)?;
    image.interlaced_passes = state.passes();
    image.source_image = Some(SourceImage {
        pixel_format: PixelFormat::Bpp8Grayscale,
        compression: Compression::None,
        orientation: Orientation::Normal,
        interlaced: state.interlaced,
        ..SourceImage::default()
    });
    Ok(image)
}

fn load_seek_next_pass(state: &mut CodecState, _io: &mut dyn SailIoTrait, _image: &Image) -> SailResult<()> {
    downcast_state::<RawState>(state, CODEC_NAME)?.start_pass()
}

fn load_frame(state: &mut CodecState, io: &mut dyn SailIoTrait, image: &mut Image) -> SailResult<()> {
    let state = downcast_state::<RawState>(state, CODEC_NAME)?;
    count(&FRAME_CALLS);

    let width = image.width as usize;
    let mut reader = SailReader::new(io);

    for y in state.rows(image.height) {
        let row = image
            .scan_line_mut(y)
            .ok_or(SailError::InvalidArgument("row out of bounds"))?;
        reader.read_exact_bytes(&mut row[..width])?;
    }
    Ok(())
}

fn load_finish(state: CodecState, _io: &mut dyn SailIoTrait) -> SailResult<()> {
    take_state::<RawState>(state, CODEC_NAME)?;
    Ok(())
}

fn save_init(_io: &mut dyn SailIoTrait, options: &SaveOptions) -> SailResult<CodecState> {
    Ok(Box::new(RawState {
        interlaced: options.get_options().contains(SailOptions::INTERLACED),
        ..RawState::default()
    }))
}

fn save_seek_next_frame(state: &mut CodecState, io: &mut dyn SailIoTrait, image: &Image) -> SailResult<()> {
    let state = downcast_state::<RawState>(state, CODEC_NAME)?;
    state.passes_started = 0;

    let mut writer = SailWriter::new(io);
    writer.write_all(MAGIC)?;
    writer.write_u32_le_err(image.width)?;
    writer.write_u32_le_err(image.height)?;
    writer.write_u8_err(u8::from(state.interlaced))?;

    Ok(())
}

fn save_seek_next_pass(state: &mut CodecState, _io: &mut dyn SailIoTrait, _image: &Image) -> SailResult<()> {
    downcast_state::<RawState>(state, CODEC_NAME)?.start_pass()
}

fn save_frame(state: &mut CodecState, io: &mut dyn SailIoTrait, image: &Image) -> SailResult<()> {
    let state = downcast_state::<RawState>(state, CODEC_NAME)?;
    count(&FRAME_CALLS);

    let width = image.width as usize;
    let mut writer = SailWriter::new(io);

    for y in state.rows(image.height) {
        let row = image
            .scan_line(y)
            .ok_or(SailError::InvalidArgument("row out of bounds"))?;
        writer.write_all(&row[..width])?;
    }
    Ok(())
}

fn save_finish(state: CodecState, io: &mut dyn SailIoTrait) -> SailResult<()> {
    take_state::<RawState>(state, CODEC_NAME)?;
    io.flush()?;
    Ok(())
}

static EXPORTS: [Export; 10] = [
    Export::new(codec_symbol!(load_init, 8, "raw"), EntryPoint::LoadInit(load_init)),
    Export::new(
        codec_symbol!(load_seek_next_frame, 8, "raw"),
        EntryPoint::LoadSeekNextFrame(load_seek_next_frame)
    ),
    Export::new(
        codec_symbol!(load_seek_next_pass, 8, "raw"),
        EntryPoint::LoadSeekNextPass(load_seek_next_pass)
    ),
    Export::new(codec_symbol!(load_frame, 8, "raw"), EntryPoint::LoadFrame(load_frame)),
    Export::new(codec_symbol!(load_finish, 8, "raw"), EntryPoint::LoadFinish(load_finish)),
    Export::new(codec_symbol!(save_init, 8, "raw"), EntryPoint::SaveInit(save_init)),
    Export::new(
        codec_symbol!(save_seek_next_frame, 8, "raw"),
        EntryPoint::SaveSeekNextFrame(save_seek_next_frame)
    ),
    Export::new(
        codec_symbol!(save_seek_next_pass, 8, "raw"),
        EntryPoint::SaveSeekNextPass(save_seek_next_pass)
    ),
    Export::new(codec_symbol!(save_frame, 8, "raw"), EntryPoint::SaveFrame(save_frame)),
    Export::new(codec_symbol!(save_finish, 8, "raw"), EntryPoint::SaveFinish(save_finish))
];

pub static MODULE: CodecModule = CodecModule {
    name:       CODEC_NAME,
    descriptor: DESCRIPTOR,
    exports:    &EXPORTS
};

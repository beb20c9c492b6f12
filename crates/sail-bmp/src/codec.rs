/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Layout 8 entry points of the BMP codec

use sail_core::bytestream::{SailIoTrait, SailReader};
use sail_core::codec_symbol;
use sail_core::image::Image;
use sail_core::layout::{downcast_state, take_state, CodecModule, CodecState, EntryPoint, Export};
use sail_core::log::trace;
use sail_core::options::{LoadOptions, SaveOptions};
use sail_core::{SailError, SailResult};

use crate::decoder::BmpHeaders;

const CODEC_NAME: &str = "BMP";

/// Decoder state between two calls of the host
struct BmpState {
    headers:      BmpHeaders,
    frame_loaded: bool
}

fn load_init(io: &mut dyn SailIoTrait, options: &LoadOptions) -> SailResult<CodecState> {
    let mut reader = SailReader::new(io);
    let headers = BmpHeaders::parse(&mut reader, options)?;

    Ok(Box::new(BmpState {
        headers,
        frame_loaded: false
    }))
}

fn load_seek_next_frame(state: &mut CodecState, io: &mut dyn SailIoTrait) -> SailResult<Image> {
    let state = downcast_state::<BmpState>(state, CODEC_NAME)?;

    // a bmp file only ever has one frame
    if state.frame_loaded {
        return Err(SailError::NoMoreFrames);
    }
    state.frame_loaded = true;

    let mut reader = SailReader::new(io);
    state.headers.seek_to_pixels(&mut reader)?;

    Ok(state.headers.image_skeleton())
}

fn load_frame(state: &mut CodecState, io: &mut dyn SailIoTrait, image: &mut Image) -> SailResult<()> {
    let state = downcast_state::<BmpState>(state, CODEC_NAME)?;
    let stride = image.bytes_per_line as usize;

    let mut reader = SailReader::new(io);
    state
        .headers
        .read_pixels(&mut reader, &mut image.pixels, stride)?;

    trace!("BMP: decoded {}x{} frame", image.width, image.height);
    Ok(())
}

fn load_finish(state: CodecState, _io: &mut dyn SailIoTrait) -> SailResult<()> {
    take_state::<BmpState>(state, CODEC_NAME)?;
    Ok(())
}

fn save_init(_io: &mut dyn SailIoTrait, _options: &SaveOptions) -> SailResult<CodecState> {
    Err(SailError::NotImplemented("BMP encoding"))
}

fn save_seek_next_frame(
    _state: &mut CodecState, _io: &mut dyn SailIoTrait, _image: &Image
) -> SailResult<()> {
    Err(SailError::NotImplemented("BMP encoding"))
}

fn save_frame(_state: &mut CodecState, _io: &mut dyn SailIoTrait, _image: &Image) -> SailResult<()> {
    Err(SailError::NotImplemented("BMP encoding"))
}

fn save_finish(_state: CodecState, _io: &mut dyn SailIoTrait) -> SailResult<()> {
    Err(SailError::NotImplemented("BMP encoding"))
}

/// Export table of the codec
pub static EXPORTS: [Export; 8] = [
    Export::new(
        codec_symbol!(load_init, 8, "bmp"),
        EntryPoint::LoadInit(load_init)
    ),
    Export::new(
        codec_symbol!(load_seek_next_frame, 8, "bmp"),
        EntryPoint::LoadSeekNextFrame(load_seek_next_frame)
    ),
    Export::new(
        codec_symbol!(load_frame, 8, "bmp"),
        EntryPoint::LoadFrame(load_frame)
    ),
    Export::new(
        codec_symbol!(load_finish, 8, "bmp"),
        EntryPoint::LoadFinish(load_finish)
    ),
    Export::new(
        codec_symbol!(save_init, 8, "bmp"),
        EntryPoint::SaveInit(save_init)
    ),
    Export::new(
        codec_symbol!(save_seek_next_frame, 8, "bmp"),
        EntryPoint::SaveSeekNextFrame(save_seek_next_frame)
    ),
    Export::new(
        codec_symbol!(save_frame, 8, "bmp"),
        EntryPoint::SaveFrame(save_frame)
    ),
    Export::new(
        codec_symbol!(save_finish, 8, "bmp"),
        EntryPoint::SaveFinish(save_finish)
    )
];

/// The BMP codec module, its descriptor and export table
pub static MODULE: CodecModule = CodecModule {
    name:       CODEC_NAME,
    descriptor: include_str!("../bmp.codec.info"),
    exports:    &EXPORTS
};

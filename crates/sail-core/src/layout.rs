/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The versioned codec entry point layout
//!
//! A codec module exports a table of named entry points. Names embed the
//! layout version and the codec name, e.g `sail_codec_load_init_v8_bmp`,
//! so a host built for one layout never binds entry points built for another.
//!
//! The per session decoder/encoder state is opaque to the host, it's a
//! [`CodecState`] the codec creates in `*_init`, receives back on every
//! later call and consumes in `*_finish`.
//!
//! # Stages
//! Loading goes through `load_init`, then `load_seek_next_frame` once per frame,
//! followed by `load_seek_next_pass` and `load_frame` once per interlaced pass,
//! then `load_finish`. Saving mirrors this.
//!
//! `*_seek_next_pass` entry points are optional, a module that doesn't export
//! them gets a no-op.

use core::any::Any;

use crate::bytestream::SailIoTrait;
use crate::errors::{SailError, SailResult};
use crate::image::Image;
use crate::options::{LoadOptions, SaveOptions};

/// The only layout this build of the family speaks
pub const SUPPORTED_LAYOUT: u32 = 8;

/// Opaque per session codec state
pub type CodecState = Box<dyn Any + Send>;

pub type LoadInitFn = fn(&mut dyn SailIoTrait, &LoadOptions) -> SailResult<CodecState>;
/// Read the next frame header, filling geometry and provenance.
///
/// Must not allocate pixels, returns [`SailError::NoMoreFrames`] at the end
pub type LoadSeekNextFrameFn = fn(&mut CodecState, &mut dyn SailIoTrait) -> SailResult<Image>;
pub type LoadSeekNextPassFn = fn(&mut CodecState, &mut dyn SailIoTrait, &Image) -> SailResult<()>;
/// Fill the host allocated pixels of `image` for the current pass
pub type LoadFrameFn = fn(&mut CodecState, &mut dyn SailIoTrait, &mut Image) -> SailResult<()>;
pub type LoadFinishFn = fn(CodecState, &mut dyn SailIoTrait) -> SailResult<()>;

pub type SaveInitFn = fn(&mut dyn SailIoTrait, &SaveOptions) -> SailResult<CodecState>;
pub type SaveSeekNextFrameFn = fn(&mut CodecState, &mut dyn SailIoTrait, &Image) -> SailResult<()>;
pub type SaveSeekNextPassFn = fn(&mut CodecState, &mut dyn SailIoTrait, &Image) -> SailResult<()>;
pub type SaveFrameFn = fn(&mut CodecState, &mut dyn SailIoTrait, &Image) -> SailResult<()>;
pub type SaveFinishFn = fn(CodecState, &mut dyn SailIoTrait) -> SailResult<()>;

/// A stage of the codec protocol
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stage {
    LoadInit,
    LoadSeekNextFrame,
    LoadSeekNextPass,
    LoadFrame,
    LoadFinish,
    SaveInit,
    SaveSeekNextFrame,
    SaveSeekNextPass,
    SaveFrame,
    SaveFinish
}

impl Stage {
    /// Stages every module must export
    pub const REQUIRED: [Stage; 8] = [
        Stage::LoadInit,
        Stage::LoadSeekNextFrame,
        Stage::LoadFrame,
        Stage::LoadFinish,
        Stage::SaveInit,
        Stage::SaveSeekNextFrame,
        Stage::SaveFrame,
        Stage::SaveFinish
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::LoadInit => "load_init",
            Stage::LoadSeekNextFrame => "load_seek_next_frame",
            Stage::LoadSeekNextPass => "load_seek_next_pass",
            Stage::LoadFrame => "load_frame",
            Stage::LoadFinish => "load_finish",
            Stage::SaveInit => "save_init",
            Stage::SaveSeekNextFrame => "save_seek_next_frame",
            Stage::SaveSeekNextPass => "save_seek_next_pass",
            Stage::SaveFrame => "save_frame",
            Stage::SaveFinish => "save_finish"
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Stage::LoadSeekNextPass | Stage::SaveSeekNextPass)
    }
}

/// Build the entry point name for `stage` of codec `name` in `layout`
///
/// ```
/// use sail_core::layout::{symbol_name, Stage};
///
/// assert_eq!(symbol_name(Stage::LoadInit, 7, "ICO"), "sail_codec_load_init_v7_ico");
/// ```
pub fn symbol_name(stage: Stage, layout: u32, name: &str) -> String {
    format!(
        "sail_codec_{}_v{}_{}",
        stage.as_str(),
        layout,
        name.to_ascii_lowercase()
    )
}

/// Build an entry point name at compile time
///
/// The codec name must already be lower case.
///
/// ```
/// assert_eq!(
///     sail_core::codec_symbol!(load_frame, 8, "bmp"),
///     "sail_codec_load_frame_v8_bmp"
/// );
/// ```
#[macro_export]
macro_rules! codec_symbol {
    ($stage:ident, $layout:literal, $name:literal) => {
        concat!(
            "sail_codec_",
            stringify!($stage),
            "_v",
            stringify!($layout),
            "_",
            $name
        )
    };
}

/// A function exported by a codec module
#[derive(Copy, Clone)]
pub enum EntryPoint {
    LoadInit(LoadInitFn),
    LoadSeekNextFrame(LoadSeekNextFrameFn),
    LoadSeekNextPass(LoadSeekNextPassFn),
    LoadFrame(LoadFrameFn),
    LoadFinish(LoadFinishFn),
    SaveInit(SaveInitFn),
    SaveSeekNextFrame(SaveSeekNextFrameFn),
    SaveSeekNextPass(SaveSeekNextPassFn),
    SaveFrame(SaveFrameFn),
    SaveFinish(SaveFinishFn)
}

impl EntryPoint {
    pub const fn stage(&self) -> Stage {
        match self {
            EntryPoint::LoadInit(_) => Stage::LoadInit,
            EntryPoint::LoadSeekNextFrame(_) => Stage::LoadSeekNextFrame,
            EntryPoint::LoadSeekNextPass(_) => Stage::LoadSeekNextPass,
            EntryPoint::LoadFrame(_) => Stage::LoadFrame,
            EntryPoint::LoadFinish(_) => Stage::LoadFinish,
            EntryPoint::SaveInit(_) => Stage::SaveInit,
            EntryPoint::SaveSeekNextFrame(_) => Stage::SaveSeekNextFrame,
            EntryPoint::SaveSeekNextPass(_) => Stage::SaveSeekNextPass,
            EntryPoint::SaveFrame(_) => Stage::SaveFrame,
            EntryPoint::SaveFinish(_) => Stage::SaveFinish
        }
    }
}

impl core::fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EntryPoint({})", self.stage().as_str())
    }
}

/// A named entry in a module's export table
#[derive(Copy, Clone, Debug)]
pub struct Export {
    pub symbol: &'static str,
    pub entry:  EntryPoint
}

impl Export {
    pub const fn new(symbol: &'static str, entry: EntryPoint) -> Export {
        Export { symbol, entry }
    }
}

/// A codec module linked into the process image
///
/// This is what a shared object would expose through its symbol table,
/// the export table plus the descriptor installed next to it.
#[derive(Copy, Clone, Debug)]
pub struct CodecModule {
    /// Codec name as it appears in the descriptor
    pub name:       &'static str,
    /// Contents of the `.codec.info` descriptor
    pub descriptor: &'static str,
    pub exports:    &'static [Export]
}

impl CodecModule {
    /// Look up an export by its symbol name
    pub fn find_symbol(&self, symbol: &str) -> Option<EntryPoint> {
        self.exports
            .iter()
            .find(|export| export.symbol == symbol)
            .map(|export| export.entry)
    }
}

/// Borrow the concrete state of a codec
///
/// Fails with [`SailError::StateMismatch`] when the state was created
/// by some other codec.
pub fn downcast_state<'a, T: Any>(
    state: &'a mut CodecState, codec: &'static str
) -> SailResult<&'a mut T> {
    (**state)
        .downcast_mut::<T>()
        .ok_or(SailError::StateMismatch(codec))
}

/// Take back ownership of the concrete state of a codec
pub fn take_state<T: Any>(state: CodecState, codec: &'static str) -> SailResult<Box<T>> {
    state
        .downcast::<T>()
        .map_err(|_| SailError::StateMismatch(codec))
}

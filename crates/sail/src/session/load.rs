/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;
use std::sync::Arc;

use sail_core::bytestream::{FileIo, MemoryIo, SailIoTrait};
use sail_core::image::Image;
use sail_core::layout::CodecState;
use sail_core::log::{debug, error, trace};
use sail_core::options::LoadOptions;
use sail_core::{SailError, SailResult};

use crate::loader::Codec;
use crate::session::{abandon, close_owned};

/// Reads frames from a stream with one codec
///
/// # Example
/// ```no_run
/// use sail::{Context, LoadSession};
///
/// let context = Context::new();
/// let codec = context.load_handle(context.resolve_by_path("image.bmp")?)?;
///
/// let mut session = LoadSession::start_file(codec, "image.bmp", None)?;
/// loop {
///     match session.next_frame() {
///         Ok(image) => println!("{}x{}", image.width, image.height),
///         Err(err) if err.is_no_more_frames() => break,
///         Err(err) => return Err(err)
///     }
/// }
/// session.stop()?;
/// # Ok::<(), sail::SailError>(())
/// ```
pub struct LoadSession<'a> {
    codec:   Arc<Codec>,
    io:      Box<dyn SailIoTrait + 'a>,
    owns_io: bool,
    state:   Option<CodecState>,
    options: LoadOptions,
    stopped: bool,
    frames:  usize
}

impl<'a> LoadSession<'a> {
    fn start(
        codec: Arc<Codec>, mut io: Box<dyn SailIoTrait + 'a>, owns_io: bool,
        options: Option<LoadOptions>
    ) -> SailResult<LoadSession<'a>> {
        let options = options
            .unwrap_or_else(|| LoadOptions::from_features(codec.info().load_features()));

        debug!(
            "Starting to load with the {} codec from {}",
            codec.info().name(),
            io.name()
        );
        let init = codec.load_entries().init;

        let state = match init(&mut *io, &options) {
            Ok(state) => state,
            Err(err) => return Err(abandon(&mut *io, owns_io, err))
        };

        Ok(LoadSession {
            codec,
            io,
            owns_io,
            state: Some(state),
            options,
            stopped: false,
            frames: 0
        })
    }

    /// Load from a caller provided stream
    ///
    /// The stream is borrowed and left open on stop. `None` options
    /// enable everything the codec supports.
    pub fn start_io(
        codec: Arc<Codec>, io: &'a mut dyn SailIoTrait, options: Option<LoadOptions>
    ) -> SailResult<LoadSession<'a>> {
        LoadSession::start(codec, Box::new(io), false, options)
    }

    /// Load from an in-memory image
    pub fn start_memory(
        codec: Arc<Codec>, data: &'a [u8], options: Option<LoadOptions>
    ) -> SailResult<LoadSession<'a>> {
        LoadSession::start(codec, Box::new(MemoryIo::new_read(data)), true, options)
    }

    /// Load from a file, the file is closed on stop
    pub fn start_file<P: AsRef<Path>>(
        codec: Arc<Codec>, path: P, options: Option<LoadOptions>
    ) -> SailResult<LoadSession<'a>> {
        let io = FileIo::open_for_reading(path)?;

        LoadSession::start(codec, Box::new(io), true, options)
    }

    /// Decode the next frame
    ///
    /// The host allocates the pixels, then the codec fills them once per
    /// interlaced pass.
    ///
    /// # Errors
    /// [`SailError::NoMoreFrames`] after the last frame, this ends a normal
    /// read loop. [`SailError::ConflictingOperation`] once the session is stopped.
    pub fn next_frame(&mut self) -> SailResult<Image> {
        if self.stopped {
            return Err(SailError::ConflictingOperation("the load session is stopped"));
        }
        let state = self
            .state
            .as_mut()
            .ok_or(SailError::ConflictingOperation("the load session is stopped"))?;
        let entries = *self.codec.load_entries();

        let mut image = match (entries.seek_next_frame)(state, &mut *self.io) {
            Ok(image) => image,
            Err(err) => {
                if err.is_no_more_frames() {
                    debug!("No more frames after {} frame(s)", self.frames);
                }
                return Err(err);
            }
        };
        image.check_geometry()?;

        let interlaced = image
            .source_image
            .as_ref()
            .is_some_and(|source| source.interlaced);
        let passes = if interlaced { image.interlaced_passes } else { 1 };

        if passes < 1 {
            error!(
                "The {} codec reports an interlaced frame without passes",
                self.codec.info().name()
            );
            return Err(SailError::InterlacingUnsupported);
        }
        let size = image.pixels_size()?;
        let mut pixels = Vec::new();

        pixels
            .try_reserve_exact(size)
            .map_err(|_| SailError::MemoryAllocation(size))?;
        pixels.resize(size, 0);
        image.pixels = pixels;

        for pass in 0..passes {
            trace!("Loading pass {} of {}", pass + 1, passes);

            if let Some(seek_next_pass) = entries.seek_next_pass {
                seek_next_pass(state, &mut *self.io, &image)?;
            }
            (entries.frame)(state, &mut *self.io, &mut image)?;
        }
        self.frames += 1;

        Ok(image)
    }

    /// Read the first frame's properties without decoding pixels
    ///
    /// The session is stopped afterwards.
    pub fn probe(mut self) -> SailResult<Image> {
        let state = self
            .state
            .as_mut()
            .ok_or(SailError::ConflictingOperation("the load session is stopped"))?;

        let image = (self.codec.load_entries().seek_next_frame)(state, &mut *self.io)?;
        self.stop()?;

        Ok(image)
    }

    /// Finish the codec and close the stream if the session opened it
    ///
    /// Calling stop again does nothing.
    pub fn stop(&mut self) -> SailResult<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        let result = match self.state.take() {
            Some(state) => (self.codec.load_entries().finish)(state, &mut *self.io),
            None => Ok(())
        };
        trace!(
            "Stopped loading with the {} codec after {} frame(s)",
            self.codec.info().name(),
            self.frames
        );
        close_owned(&mut *self.io, self.owns_io, result)
    }

    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Number of frames decoded so far
    pub const fn frames_read(&self) -> usize {
        self.frames
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Drop for LoadSession<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("Failed to stop the load session: {}", err);
        }
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;
use std::sync::Arc;

use sail_core::bytestream::{FileIo, MemoryIo, SailIoTrait, SailSeekFrom};
use sail_core::common::{CodecFeatures, SailOptions};
use sail_core::features::SaveFeatures;
use sail_core::image::Image;
use sail_core::layout::CodecState;
use sail_core::log::{debug, error, trace};
use sail_core::options::SaveOptions;
use sail_core::pixel_format::PixelFormat;
use sail_core::{SailError, SailResult};

use crate::loader::Codec;
use crate::session::{abandon, close_owned};

/// Check requested save options against what the codec advertises
fn check_save_options(features: &SaveFeatures, options: &SaveOptions) -> SailResult<()> {
    if features.pixel_formats.is_empty() {
        return Err(SailError::UnsupportedPixelFormat(PixelFormat::Unknown));
    }
    let compression = options.get_compression();

    if !features.supports_compression(compression) {
        error!("Compression {} is not supported for saving", compression);
        return Err(SailError::UnsupportedCompression(compression));
    }
    if let Some(level) = features.compression_level {
        let requested = options.get_compression_level();

        if !level.is_empty() && !level.contains(requested) {
            error!(
                "Compression level {} is out of range [{}, {}]",
                requested, level.min, level.max
            );
            return Err(SailError::InvalidArgument("compression level is out of range"));
        }
    }
    if options.get_options().contains(SailOptions::INTERLACED)
        && !features.features.contains(CodecFeatures::INTERLACED)
    {
        return Err(SailError::InterlacingUnsupported);
    }
    Ok(())
}

/// Writes frames into a stream with one codec
///
/// The caller owns the pixels of every frame it writes.
pub struct SaveSession<'a> {
    codec:   Arc<Codec>,
    io:      Box<dyn SailIoTrait + 'a>,
    owns_io: bool,
    state:   Option<CodecState>,
    options: SaveOptions,
    stopped: bool,
    frames:  usize
}

impl<'a> SaveSession<'a> {
    fn start(
        codec: Arc<Codec>, mut io: Box<dyn SailIoTrait + 'a>, owns_io: bool,
        options: Option<SaveOptions>
    ) -> SailResult<SaveSession<'a>> {
        let features = codec.info().save_features();
        let options = options.unwrap_or_else(|| SaveOptions::from_features(features));

        debug!(
            "Starting to save with the {} codec into {}",
            codec.info().name(),
            io.name()
        );
        if let Err(err) = check_save_options(features, &options) {
            return Err(abandon(&mut *io, owns_io, err));
        }
        let state = match (codec.save_entries().init)(&mut *io, &options) {
            Ok(state) => state,
            Err(err) => return Err(abandon(&mut *io, owns_io, err))
        };

        Ok(SaveSession {
            codec,
            io,
            owns_io,
            state: Some(state),
            options,
            stopped: false,
            frames: 0
        })
    }

    /// Save into a caller provided stream, left open on stop
    ///
    /// `None` options use the codec's default compression.
    pub fn start_io(
        codec: Arc<Codec>, io: &'a mut dyn SailIoTrait, options: Option<SaveOptions>
    ) -> SailResult<SaveSession<'a>> {
        SaveSession::start(codec, Box::new(io), false, options)
    }

    /// Save into a fixed size buffer
    ///
    /// [`stop`](Self::stop) reports how many bytes were written.
    pub fn start_memory(
        codec: Arc<Codec>, buffer: &'a mut [u8], options: Option<SaveOptions>
    ) -> SailResult<SaveSession<'a>> {
        SaveSession::start(
            codec,
            Box::new(MemoryIo::new_read_write(buffer)),
            true,
            options
        )
    }

    /// Save into a file, created or truncated
    pub fn start_file<P: AsRef<Path>>(
        codec: Arc<Codec>, path: P, options: Option<SaveOptions>
    ) -> SailResult<SaveSession<'a>> {
        let io = FileIo::open_for_writing(path)?;

        SaveSession::start(codec, Box::new(io), true, options)
    }

    /// Encode one frame
    ///
    /// # Errors
    /// - [`SailError::UnsupportedPixelFormat`] if the codec can't write the image's pixel format
    /// - [`SailError::InvalidArgument`] if rows or the pixel buffer are too short
    /// - [`SailError::ConflictingOperation`] once the session is stopped
    pub fn write_frame(&mut self, image: &Image) -> SailResult<()> {
        if self.stopped {
            return Err(SailError::ConflictingOperation("the save session is stopped"));
        }
        let features = self.codec.info().save_features();

        image.check_geometry()?;

        if !features.supports_pixel_format(image.pixel_format) {
            error!(
                "The {} codec can't save {} pixels",
                self.codec.info().name(),
                image.pixel_format
            );
            return Err(SailError::UnsupportedPixelFormat(image.pixel_format));
        }
        let bytes_per_line = image
            .pixel_format
            .bytes_per_line(image.width)
            .ok_or(SailError::UnsupportedPixelFormat(image.pixel_format))?;

        if image.bytes_per_line < bytes_per_line {
            return Err(SailError::InvalidArgument(
                "bytes per line is too small for the image width"
            ));
        }
        if image.pixels.len() < image.pixels_size()? {
            return Err(SailError::InvalidArgument("pixel buffer is too small"));
        }
        let passes = if self.options.get_options().contains(SailOptions::INTERLACED) {
            features.interlaced_passes
        } else {
            1
        };
        if passes < 1 {
            return Err(SailError::InterlacingUnsupported);
        }
        let entries = *self.codec.save_entries();
        let state = self
            .state
            .as_mut()
            .ok_or(SailError::ConflictingOperation("the save session is stopped"))?;

        (entries.seek_next_frame)(state, &mut *self.io, image)?;

        for pass in 0..passes {
            trace!("Saving pass {} of {}", pass + 1, passes);

            if let Some(seek_next_pass) = entries.seek_next_pass {
                seek_next_pass(state, &mut *self.io, image)?;
            }
            (entries.frame)(state, &mut *self.io, image)?;
        }
        self.frames += 1;

        Ok(())
    }

    /// Finish the codec and close the stream if the session opened it
    ///
    /// Returns the number of bytes written for memory buffers, `None` for
    /// other streams and on repeated calls.
    pub fn stop(&mut self) -> SailResult<Option<u64>> {
        if self.stopped {
            return Ok(None);
        }
        self.stopped = true;

        let mut written = None;
        let mut result = match self.state.take() {
            Some(state) => (self.codec.save_entries().finish)(state, &mut *self.io),
            None => Ok(())
        };
        if result.is_ok() && self.io.is_memory_backed() {
            match self.io.seek(SailSeekFrom::End(0)) {
                Ok(end) => written = Some(end),
                Err(err) => result = Err(err.into())
            }
        }
        trace!(
            "Stopped saving with the {} codec after {} frame(s)",
            self.codec.info().name(),
            self.frames
        );
        close_owned(&mut *self.io, self.owns_io, result)?;

        Ok(written)
    }

    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    pub const fn options(&self) -> &SaveOptions {
        &self.options
    }

    /// Number of frames written so far
    pub const fn frames_written(&self) -> usize {
        self.frames
    }
}

impl Drop for SaveSession<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("Failed to stop the save session: {}", err);
        }
    }
}

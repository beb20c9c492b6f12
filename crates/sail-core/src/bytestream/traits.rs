/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading and writing images in sail
//!
//!
//! This exposes the trait every I/O backend implements and the
//! forwarding implementations that let codecs accept `&mut dyn SailIoTrait`

use bitflags::bitflags;

use crate::bytestream::reader::{SailIoError, SailSeekFrom};

bitflags! {
    /// Capabilities advertised by an I/O backend
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct IoFeatures: u32 {
        /// The stream supports seek and tell
        const SEEKABLE = 1 << 0;
    }
}

/// The de-facto I/O trait implemented by every backend.
///
/// A codec only ever sees this trait, so the same decoder works for
/// files, memory buffers and custom caller provided streams.
///
/// # Considerations
///
/// Methods take `&mut self` and the trait is object safe, the host hands
/// codecs a `&mut dyn SailIoTrait`.
///
/// A backend which can't write (e.g a read only memory view) should
/// return [`SailIoError::Unsupported`] from the write family.
pub trait SailIoTrait {
    /// Read bytes into `buf` returning how many bytes were actually read
    ///
    /// This doesn't guarantee that buf will be filled with bytes for such a guarantee see
    /// [`strict_read`](Self::strict_read)
    ///
    /// ## Returns
    ///  - `Ok(usize)` - Actual bytes read into the buffer
    ///  - `Err(SailIoError::Eof)` - The stream was already at its end
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError>;

    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    fn strict_read(&mut self, buf: &mut [u8]) -> Result<(), SailIoError> {
        let read = self.tolerant_read(buf)?;

        if read != buf.len() {
            return Err(SailIoError::NotEnoughBytes(buf.len(), read));
        }
        Ok(())
    }

    /// Write some bytes into the sink returning number of bytes written
    ///
    /// An implementation is free to write less bytes than are in `buf`,
    /// the returned count is the truth.
    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError>;

    /// Write all bytes or return an error if that isn't possible
    fn strict_write(&mut self, buf: &[u8]) -> Result<(), SailIoError> {
        let written = self.tolerant_write(buf)?;

        if written != buf.len() {
            return Err(SailIoError::NotEnoughBuffer(buf.len(), written));
        }
        Ok(())
    }

    /// Seek into a new position returning the new absolute position
    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError>;

    /// Return the current position of the stream
    fn tell(&mut self) -> Result<u64, SailIoError>;

    /// Ensure written bytes reach the backing store
    fn flush(&mut self) -> Result<(), SailIoError>;

    /// Release backend resources
    ///
    /// Every operation after a close fails with [`SailIoError::Closed`].
    fn close(&mut self) -> Result<(), SailIoError>;

    /// Report whether we are at the end of a stream.
    fn eof(&mut self) -> Result<bool, SailIoError>;

    /// Capabilities of this backend
    fn features(&self) -> IoFeatures;

    /// A short human readable name of the backend, used in logs
    fn name(&self) -> &'static str;

    /// Whether the stream writes into a memory buffer
    ///
    /// Save sessions report the number of bytes written for such streams.
    fn is_memory_backed(&self) -> bool {
        false
    }
}

impl<T: SailIoTrait + ?Sized> SailIoTrait for &mut T {
    #[inline(always)]
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        (**self).tolerant_read(buf)
    }
    #[inline(always)]
    fn strict_read(&mut self, buf: &mut [u8]) -> Result<(), SailIoError> {
        (**self).strict_read(buf)
    }
    #[inline(always)]
    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        (**self).tolerant_write(buf)
    }
    #[inline(always)]
    fn strict_write(&mut self, buf: &[u8]) -> Result<(), SailIoError> {
        (**self).strict_write(buf)
    }
    #[inline(always)]
    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        (**self).seek(from)
    }
    #[inline(always)]
    fn tell(&mut self) -> Result<u64, SailIoError> {
        (**self).tell()
    }
    #[inline(always)]
    fn flush(&mut self) -> Result<(), SailIoError> {
        (**self).flush()
    }
    #[inline(always)]
    fn close(&mut self) -> Result<(), SailIoError> {
        (**self).close()
    }
    #[inline(always)]
    fn eof(&mut self) -> Result<bool, SailIoError> {
        (**self).eof()
    }
    #[inline(always)]
    fn features(&self) -> IoFeatures {
        (**self).features()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn is_memory_backed(&self) -> bool {
        (**self).is_memory_backed()
    }
}

impl<T: SailIoTrait + ?Sized> SailIoTrait for Box<T> {
    #[inline(always)]
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        (**self).tolerant_read(buf)
    }
    #[inline(always)]
    fn strict_read(&mut self, buf: &mut [u8]) -> Result<(), SailIoError> {
        (**self).strict_read(buf)
    }
    #[inline(always)]
    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        (**self).tolerant_write(buf)
    }
    #[inline(always)]
    fn strict_write(&mut self, buf: &[u8]) -> Result<(), SailIoError> {
        (**self).strict_write(buf)
    }
    #[inline(always)]
    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        (**self).seek(from)
    }
    #[inline(always)]
    fn tell(&mut self) -> Result<u64, SailIoError> {
        (**self).tell()
    }
    #[inline(always)]
    fn flush(&mut self) -> Result<(), SailIoError> {
        (**self).flush()
    }
    #[inline(always)]
    fn close(&mut self) -> Result<(), SailIoError> {
        (**self).close()
    }
    #[inline(always)]
    fn eof(&mut self) -> Result<bool, SailIoError> {
        (**self).eof()
    }
    #[inline(always)]
    fn features(&self) -> IoFeatures {
        (**self).features()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn is_memory_backed(&self) -> bool {
        (**self).is_memory_backed()
    }
}

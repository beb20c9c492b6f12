/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::reader::{SailIoError, SailSeekFrom};
use crate::bytestream::traits::{IoFeatures, SailIoTrait};

/// A write target that grows as bytes are written
///
/// Useful when the encoded size isn't known up front. Seeking past the
/// end grows the buffer with zeroes.
#[derive(Default)]
pub struct ExpandingBufferIo {
    buffer:            Vec<u8>,
    accessible_length: usize,
    position:          usize,
    closed:            bool
}

impl ExpandingBufferIo {
    pub fn new() -> ExpandingBufferIo {
        ExpandingBufferIo::default()
    }
    /// Create a writer with `capacity` bytes reserved up front
    pub fn with_capacity(capacity: usize) -> ExpandingBufferIo {
        ExpandingBufferIo {
            buffer: Vec::with_capacity(capacity),
            ..ExpandingBufferIo::default()
        }
    }
    /// Number of bytes written so far (the high water mark)
    pub const fn accessible_length(&self) -> usize {
        self.accessible_length
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.accessible_length]
    }
    /// Consume the stream returning the written bytes
    pub fn into_inner(mut self) -> Vec<u8> {
        self.buffer.truncate(self.accessible_length);
        self.buffer
    }

    fn check_open(&self) -> Result<(), SailIoError> {
        if self.closed {
            return Err(SailIoError::Closed);
        }
        Ok(())
    }
}

impl SailIoTrait for ExpandingBufferIo {
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        self.check_open()?;

        if buf.is_empty() {
            return Ok(0);
        }
        if self.position >= self.accessible_length {
            return Err(SailIoError::Eof);
        }
        let to_read = buf.len().min(self.accessible_length - self.position);
        buf[..to_read].copy_from_slice(&self.buffer[self.position..self.position + to_read]);
        self.position += to_read;

        Ok(to_read)
    }

    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        self.check_open()?;

        let end = self
            .position
            .checked_add(buf.len())
            .ok_or(SailIoError::Generic("expanding buffer size overflow"))?;

        if end > self.buffer.len() {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.position..end].copy_from_slice(buf);
        self.position = end;
        self.accessible_length = self.accessible_length.max(end);

        Ok(buf.len())
    }

    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        self.check_open()?;

        let new_position = match from {
            SailSeekFrom::Start(offset) => i128::from(offset),
            SailSeekFrom::Current(offset) => self.position as i128 + i128::from(offset),
            SailSeekFrom::End(offset) => self.accessible_length as i128 + i128::from(offset)
        };
        if new_position < 0 {
            return Err(SailIoError::SeekError("seek before the start of the buffer"));
        }
        let new_position = usize::try_from(new_position)?;

        if new_position > self.buffer.len() {
            self.buffer.resize(new_position, 0);
        }
        self.accessible_length = self.accessible_length.max(new_position);
        self.position = new_position;

        Ok(new_position as u64)
    }

    fn tell(&mut self) -> Result<u64, SailIoError> {
        self.check_open()?;
        Ok(self.position as u64)
    }

    fn flush(&mut self) -> Result<(), SailIoError> {
        self.check_open()
    }

    fn close(&mut self) -> Result<(), SailIoError> {
        self.check_open()?;
        self.closed = true;
        Ok(())
    }

    fn eof(&mut self) -> Result<bool, SailIoError> {
        self.check_open()?;
        Ok(self.position >= self.accessible_length)
    }

    fn features(&self) -> IoFeatures {
        IoFeatures::SEEKABLE
    }

    fn name(&self) -> &'static str {
        "expanding memory buffer"
    }

    fn is_memory_backed(&self) -> bool {
        true
    }
}

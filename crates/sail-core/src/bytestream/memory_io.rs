/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::reader::{SailIoError, SailSeekFrom};
use crate::bytestream::traits::{IoFeatures, SailIoTrait};

enum MemoryBuffer<'a> {
    ReadOnly(&'a [u8]),
    ReadWrite(&'a mut [u8])
}

impl MemoryBuffer<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            MemoryBuffer::ReadOnly(buf) => buf,
            MemoryBuffer::ReadWrite(buf) => buf
        }
    }
}

/// A memory backed stream over a caller owned buffer
///
/// The stream tracks three numbers
///
/// - `capacity`: size of the backing buffer, never changes
/// - `accessible_length`: how much of the buffer holds valid data.
///    For a read stream this is the whole buffer, for a write stream it
///    starts at zero and grows as bytes are written.
/// - `position`: the cursor
///
/// Reads stop at `accessible_length`, writes stop at `capacity` and report
/// how many bytes actually made it in.
pub struct MemoryIo<'a> {
    buffer:            MemoryBuffer<'a>,
    capacity:          usize,
    accessible_length: usize,
    position:          usize,
    closed:            bool
}

impl<'a> MemoryIo<'a> {
    /// Open a buffer for reading, the whole buffer is accessible
    pub fn new_read(buffer: &'a [u8]) -> MemoryIo<'a> {
        MemoryIo {
            capacity:          buffer.len(),
            accessible_length: buffer.len(),
            position:          0,
            closed:            false,
            buffer:            MemoryBuffer::ReadOnly(buffer)
        }
    }
    /// Open a buffer for writing and reading back
    ///
    /// Nothing is accessible until written.
    pub fn new_read_write(buffer: &'a mut [u8]) -> MemoryIo<'a> {
        MemoryIo {
            capacity:          buffer.len(),
            accessible_length: 0,
            position:          0,
            closed:            false,
            buffer:            MemoryBuffer::ReadWrite(buffer)
        }
    }
    /// Size of the backing buffer
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
    /// Number of bytes considered valid to read
    pub const fn accessible_length(&self) -> usize {
        self.accessible_length
    }
    /// The accessible portion of the buffer
    pub fn accessible_bytes(&self) -> &[u8] {
        &self.buffer.as_slice()[..self.accessible_length]
    }

    fn check_open(&self) -> Result<(), SailIoError> {
        if self.closed {
            return Err(SailIoError::Closed);
        }
        Ok(())
    }
}

impl SailIoTrait for MemoryIo<'_> {
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        self.check_open()?;

        if buf.is_empty() {
            return Ok(0);
        }
        if self.position >= self.accessible_length {
            return Err(SailIoError::Eof);
        }
        let available = self.accessible_length - self.position;
        let to_read = buf.len().min(available);

        buf[..to_read]
            .copy_from_slice(&self.buffer.as_slice()[self.position..self.position + to_read]);
        self.position += to_read;

        Ok(to_read)
    }

    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        self.check_open()?;

        let MemoryBuffer::ReadWrite(storage) = &mut self.buffer else {
            return Err(SailIoError::Unsupported("write to a read only memory buffer"));
        };
        let room = self.capacity.saturating_sub(self.position);
        let to_write = buf.len().min(room);

        storage[self.position..self.position + to_write].copy_from_slice(&buf[..to_write]);
        self.position += to_write;

        if self.position > self.accessible_length {
            self.accessible_length = self.position;
        }
        Ok(to_write)
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
        let mut new_position = usize::try_from(new_position).unwrap_or(usize::MAX);

        if new_position >= self.capacity {
            new_position = self.capacity;
            self.accessible_length = self.capacity;
        } else if new_position > self.accessible_length {
            self.accessible_length = new_position;
        }
        self.position = new_position;

        Ok(self.position as u64)
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
        match self.buffer {
            MemoryBuffer::ReadOnly(_) => "memory (read)",
            MemoryBuffer::ReadWrite(_) => "memory (read/write)"
        }
    }

    fn is_memory_backed(&self) -> bool {
        true
    }
}

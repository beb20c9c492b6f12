/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::reader::SailIoError;
use crate::bytestream::traits::SailIoTrait;

/// Encapsulates a [`SailIoTrait`] stream with
/// support for Endian aware writes
///
/// Every write is strict, a stream that cannot take all bytes returns
/// an error.
pub struct SailWriter<T: SailIoTrait> {
    inner:         T,
    bytes_written: usize
}

impl<T: SailIoTrait> SailWriter<T> {
    /// Create a new writer for the stream
    pub fn new(inner: T) -> SailWriter<T> {
        SailWriter {
            inner,
            bytes_written: 0
        }
    }
    /// Return the number of bytes this writer has pushed into the stream
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), SailIoError> {
        self.inner.strict_write(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }

    /// Write a single byte into the stream or error out
    /// if there is not enough space
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), SailIoError> {
        self.write_all(&[byte])
    }

    /// Write a u32 as a little endian integer
    pub fn write_u32_le_err(&mut self, value: u32) -> Result<(), SailIoError> {
        self.write_all(&value.to_le_bytes())
    }
}

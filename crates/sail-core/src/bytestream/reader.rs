/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::Formatter;

use crate::bytestream::traits::SailIoTrait;

/// Enumeration of possible methods to seek within an I/O object.
///
/// It is analogous to the [SeekFrom](std::io::SeekFrom) in the std library
/// but lets backends with their own clamping rules (memory buffers)
/// implement seeking without going through `std::io`
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum SailSeekFrom {
    /// Sets the offset to the provided number of bytes.
    Start(u64),

    /// Sets the offset to the size of this object plus the specified number of
    /// bytes.
    End(i64),

    /// Sets the offset to the current position plus the specified number of
    /// bytes.
    Current(i64)
}

impl SailSeekFrom {
    /// Convert to [SeekFrom](std::io::SeekFrom) from the `std::io` library
    pub(crate) fn to_std_seek(self) -> std::io::SeekFrom {
        match self {
            SailSeekFrom::Start(pos) => std::io::SeekFrom::Start(pos),
            SailSeekFrom::End(pos) => std::io::SeekFrom::End(pos),
            SailSeekFrom::Current(pos) => std::io::SeekFrom::Current(pos)
        }
    }
}

/// Errors raised by I/O backends
pub enum SailIoError {
    StdIoError(std::io::Error),
    TryFromIntError(core::num::TryFromIntError),
    // requested, read
    NotEnoughBytes(usize, usize),
    // requested, written
    NotEnoughBuffer(usize, usize),
    Eof,
    Closed,
    Unsupported(&'static str),
    Generic(&'static str),
    SeekError(&'static str),
    SeekErrorOwned(String)
}

impl core::fmt::Debug for SailIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SailIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            SailIoError::TryFromIntError(err) => {
                writeln!(f, "Cannot convert to int {}", err)
            }
            SailIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            SailIoError::NotEnoughBuffer(expected, found) => {
                writeln!(
                    f,
                    "Not enough buffer to write {expected} bytes, only {found} bytes were written"
                )
            }
            SailIoError::Eof => writeln!(f, "End of stream"),
            SailIoError::Closed => writeln!(f, "Stream is closed"),
            SailIoError::Unsupported(op) => {
                writeln!(f, "Operation not supported by this stream: {op}")
            }
            SailIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
            SailIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
            SailIoError::SeekErrorOwned(err) => {
                writeln!(f, "Seek error {err}")
            }
        }
    }
}

impl core::fmt::Display for SailIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        // Debug output ends with a newline, strip it for inline use
        let message = format!("{self:?}");
        f.write_str(message.trim_end())
    }
}

impl std::error::Error for SailIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SailIoError::StdIoError(err) => Some(err),
            SailIoError::TryFromIntError(err) => Some(err),
            _ => None
        }
    }
}

impl From<std::io::Error> for SailIoError {
    fn from(value: std::io::Error) -> Self {
        SailIoError::StdIoError(value)
    }
}

impl From<core::num::TryFromIntError> for SailIoError {
    fn from(value: core::num::TryFromIntError) -> Self {
        SailIoError::TryFromIntError(value)
    }
}

impl From<&'static str> for SailIoError {
    fn from(value: &'static str) -> Self {
        SailIoError::Generic(value)
    }
}

/// An endian aware reader over any [`SailIoTrait`]
///
/// Codecs wrap the stream they are handed into this to parse headers.
pub struct SailReader<T: SailIoTrait> {
    inner: T
}

impl<T: SailIoTrait> SailReader<T> {
    pub fn new(source: T) -> SailReader<T> {
        SailReader { inner: source }
    }

    #[inline(always)]
    pub fn skip(&mut self, num: usize) -> Result<u64, SailIoError> {
        self.inner.seek(SailSeekFrom::Current(i64::try_from(num)?))
    }
    #[inline(always)]
    pub fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        self.inner.seek(from)
    }
    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, SailIoError> {
        let mut buf = [0];
        self.inner.strict_read(&mut buf)?;
        Ok(buf[0])
    }
    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], SailIoError> {
        let mut byte_store: [u8; N] = [0; N];
        self.inner.strict_read(&mut byte_store)?;
        Ok(byte_store)
    }
    #[inline(always)]
    pub fn position(&mut self) -> Result<u64, SailIoError> {
        self.inner.tell()
    }

    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), SailIoError> {
        self.inner.strict_read(buf)
    }
}

macro_rules! get_single_type {
    ($name:tt,$int_type:tt) => {
        impl<T:SailIoTrait> SailReader<T>
        {
            #[doc=concat!("Read ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying stream cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name(&mut self) -> Result<$int_type, SailIoError>
            {
                Ok($int_type::from_le_bytes(self.read_fixed_bytes_or_error()?))
            }
        }
    };
}

get_single_type!(get_u16_le_err, u16);
get_single_type!(get_u32_le_err, u32);
get_single_type!(get_i32_le_err, i32);

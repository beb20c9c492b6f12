/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Magic number patterns
//!
//! A pattern is a list of space separated hex bytes where `??` matches
//! any byte, e.g `52 49 46 46 ?? ?? ?? ?? 57 45 42 50`.

use std::fmt::{Display, Formatter};

use sail_core::bytestream::{IoFeatures, SailIoError, SailIoTrait, SailSeekFrom};
use sail_core::SailResult;

/// Number of bytes read from a stream to detect its format
pub const MAGIC_BUFFER_SIZE: usize = 16;

/// Longest pattern text accepted, `MAGIC_BUFFER_SIZE` bytes with separators
pub const MAX_MAGIC_LENGTH: usize = MAGIC_BUFFER_SIZE * 3 - 1;

const WILDCARD: &str = "??";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MagicNumber {
    pattern: String,
    /// `None` is a wildcard
    bytes:   Vec<Option<u8>>
}

impl MagicNumber {
    /// Parse a pattern
    ///
    /// The pattern must not be empty and must fit in [`MAGIC_BUFFER_SIZE`]
    /// bytes.
    pub fn parse(pattern: &str) -> Result<MagicNumber, String> {
        let pattern = pattern.trim().to_ascii_lowercase();

        if pattern.len() > MAX_MAGIC_LENGTH {
            return Err(format!(
                "magic number '{pattern}' is longer than {MAX_MAGIC_LENGTH} characters"
            ));
        }
        let mut bytes = Vec::with_capacity(MAGIC_BUFFER_SIZE);

        for token in pattern.split_ascii_whitespace() {
            if token == WILDCARD {
                bytes.push(None);
                continue;
            }
            if token.len() != 2 {
                return Err(format!("invalid magic byte '{token}' in '{pattern}'"));
            }
            let byte = u8::from_str_radix(token, 16)
                .map_err(|_| format!("invalid magic byte '{token}' in '{pattern}'"))?;
            bytes.push(Some(byte));
        }
        if bytes.is_empty() {
            return Err("empty magic number".to_string());
        }
        Ok(MagicNumber { pattern, bytes })
    }

    /// The lower-cased pattern text
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Number of bytes the pattern spans
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `data` starts with this pattern
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(data)
                .all(|(expected, actual)| expected.map_or(true, |byte| byte == *actual))
    }
}

impl Display for MagicNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Read up to [`MAGIC_BUFFER_SIZE`] bytes from the current position
/// and seek back to it
///
/// Returns the number of bytes placed in `buffer`, which is less than
/// its size for short streams.
pub(crate) fn read_magic(
    io: &mut dyn SailIoTrait, buffer: &mut [u8; MAGIC_BUFFER_SIZE]
) -> SailResult<usize> {
    if !io.features().contains(IoFeatures::SEEKABLE) {
        return Err(SailIoError::Unsupported("magic detection on a non seekable stream").into());
    }
    let start = io.tell()?;

    let mut filled = 0;
    let result = loop {
        if filled == buffer.len() {
            break Ok(());
        }
        match io.tolerant_read(&mut buffer[filled..]) {
            Ok(0) | Err(SailIoError::Eof) => break Ok(()),
            Ok(read) => filled += read,
            Err(err) => break Err(err)
        }
    };
    // restore the position even when the read failed
    io.seek(SailSeekFrom::Start(start))?;
    result?;

    Ok(filled)
}

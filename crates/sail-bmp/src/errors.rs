/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use sail_core::bytestream::SailIoError;
use sail_core::common::Compression;
use sail_core::SailError;

/// BMP errors that can occur during decoding
#[non_exhaustive]
pub enum BmpDecoderErrors {
    /// The file/bytes do not start with `BM` or `02 00`
    InvalidMagicBytes(u16),
    /// The DIB header size matches no known header revision
    UnknownHeaderSize(u32),
    UnsupportedBitDepth(u16),
    /// Only RGB, RLE4 and RLE8 can be decoded
    UnsupportedCompression(u32),
    /// A compression used with a bit depth it doesn't apply to
    InvalidCompression(&'static str),
    /// An indexed image has zero palette entries
    MissingPalette,
    /// Width or height is zero
    ZeroDimensions(u32, u32),
    /// Too large dimensions for a given width or
    /// height
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// Generic message
    GenericStatic(&'static str),
    /// Generic allocated message
    Generic(String),
    /// A calculation overflowed
    OverFlowOccurred,
    IoErrors(SailIoError)
}

impl Debug for BmpDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagicBytes(magic) => {
                writeln!(f, "Invalid magic bytes 0x{magic:04x}, not a BMP file")
            }
            Self::UnknownHeaderSize(size) => {
                writeln!(f, "Unsupported BMP header size {size}")
            }
            Self::UnsupportedBitDepth(depth) => {
                writeln!(f, "Bit depth {depth} is not supported")
            }
            Self::UnsupportedCompression(compression) => {
                writeln!(
                    f,
                    "Compression {compression} is not supported, only RGB, RLE4 and RLE8 are"
                )
            }
            Self::InvalidCompression(reason) => {
                writeln!(f, "{reason}")
            }
            Self::MissingPalette => {
                writeln!(f, "Indexed image has no palette")
            }
            Self::ZeroDimensions(width, height) => {
                writeln!(f, "Invalid image dimensions {width}x{height}")
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            Self::TooSmallBuffer(expected, found) => {
                writeln!(
                    f,
                    "Too small of buffer, expected {} but found {}",
                    expected, found
                )
            }
            Self::GenericStatic(header) => {
                writeln!(f, "{}", header)
            }
            Self::Generic(message) => {
                writeln!(f, "{}", message)
            }
            Self::OverFlowOccurred => {
                writeln!(f, "Overflow occurred")
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl Display for BmpDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let message = format!("{self:?}");
        f.write_str(message.trim_end())
    }
}

impl std::error::Error for BmpDecoderErrors {}

impl From<SailIoError> for BmpDecoderErrors {
    fn from(value: SailIoError) -> Self {
        BmpDecoderErrors::IoErrors(value)
    }
}

impl From<BmpDecoderErrors> for SailError {
    fn from(value: BmpDecoderErrors) -> Self {
        match value {
            BmpDecoderErrors::InvalidMagicBytes(_) | BmpDecoderErrors::UnknownHeaderSize(_) => {
                SailError::UnsupportedFormat(value.to_string())
            }
            BmpDecoderErrors::UnsupportedBitDepth(depth) => {
                SailError::UnsupportedBitDepth(u32::from(depth))
            }
            BmpDecoderErrors::UnsupportedCompression(_) => {
                SailError::UnsupportedCompression(Compression::Unknown)
            }
            BmpDecoderErrors::MissingPalette => SailError::MissingPalette,
            BmpDecoderErrors::ZeroDimensions(width, height) => {
                SailError::IncorrectImageDimensions { width, height }
            }
            BmpDecoderErrors::TooSmallBuffer(_, _) => {
                SailError::InvalidArgument("pixel buffer is too small for the image")
            }
            BmpDecoderErrors::IoErrors(err) => SailError::Io(err),
            BmpDecoderErrors::InvalidCompression(_)
            | BmpDecoderErrors::TooLargeDimensions(..)
            | BmpDecoderErrors::GenericStatic(_)
            | BmpDecoderErrors::Generic(_)
            | BmpDecoderErrors::OverFlowOccurred => SailError::BrokenImage(value.to_string())
        }
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors shared by the host and every codec
//!
//! All fallible operations in the sail family return [`SailResult`],
//! the variants are grouped into broad classes reported by [`SailError::kind`]

use std::path::PathBuf;

use thiserror::Error;

use crate::bytestream::SailIoError;
use crate::common::Compression;
use crate::pixel_format::PixelFormat;

pub type SailResult<T> = Result<T, SailError>;

/// Broad classification of a [`SailError`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Opening, reading, writing, seeking or closing a stream failed
    Io,
    /// The image data itself is broken or uses something we can't handle
    Format,
    /// Descriptors, modules and entry points
    CodecInfrastructure,
    /// The API was driven incorrectly, or an expected terminal signal
    Usage,
    /// Memory could not be obtained
    Resource
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SailError {
    #[error("I/O error: {0}")]
    Io(#[from] SailIoError),
    #[error("cannot open {}: {source}", path.display())]
    OpenFile {
        path:   PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("operation is not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("broken image: {0}")]
    BrokenImage(String),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported pixel format {}", .0.as_str())]
    UnsupportedPixelFormat(PixelFormat),
    #[error("unsupported compression {}", .0.as_str())]
    UnsupportedCompression(Compression),
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u32),
    #[error("indexed image has no palette")]
    MissingPalette,
    #[error("incorrect image dimensions {width}x{height}")]
    IncorrectImageDimensions { width: u32, height: u32 },
    #[error("interlacing is not supported")]
    InterlacingUnsupported,

    #[error("codec {0} was not found")]
    CodecNotFound(String),
    #[error("failed to load codec {name}: {reason}")]
    CodecLoad { name: String, reason: String },
    #[error("failed to resolve codec entry point {0}")]
    CodecSymbolResolve(String),
    #[error("unsupported codec layout version {0}")]
    UnsupportedCodecLayout(u32),
    #[error("malformed codec descriptor {source_name}:{line}: {reason}")]
    ParseDescriptor {
        source_name: String,
        line:        usize,
        reason:      String
    },
    #[error("incomplete codec descriptor {name}: {reason}")]
    IncompleteDescriptor { name: String, reason: &'static str },
    #[error("codec state does not belong to codec {0}")]
    StateMismatch(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("no more frames")]
    NoMoreFrames,
    #[error("conflicting operation: {0}")]
    ConflictingOperation(&'static str),

    #[error("failed to allocate {0} bytes")]
    MemoryAllocation(usize)
}

impl SailError {
    /// Return the broad class this error falls into
    pub const fn kind(&self) -> ErrorKind {
        match self {
            SailError::Io(_) | SailError::OpenFile { .. } | SailError::NotImplemented(_) => {
                ErrorKind::Io
            }
            SailError::BrokenImage(_)
            | SailError::UnsupportedFormat(_)
            | SailError::UnsupportedPixelFormat(_)
            | SailError::UnsupportedCompression(_)
            | SailError::UnsupportedBitDepth(_)
            | SailError::MissingPalette
            | SailError::IncorrectImageDimensions { .. }
            | SailError::InterlacingUnsupported => ErrorKind::Format,
            SailError::CodecNotFound(_)
            | SailError::CodecLoad { .. }
            | SailError::CodecSymbolResolve(_)
            | SailError::UnsupportedCodecLayout(_)
            | SailError::ParseDescriptor { .. }
            | SailError::IncompleteDescriptor { .. }
            | SailError::StateMismatch(_) => ErrorKind::CodecInfrastructure,
            SailError::InvalidArgument(_)
            | SailError::NoMoreFrames
            | SailError::ConflictingOperation(_) => ErrorKind::Usage,
            SailError::MemoryAllocation(_) => ErrorKind::Resource
        }
    }

    /// Whether this is the signal ending a multi-frame read loop
    ///
    /// This is an expected terminal condition rather than a failure.
    pub const fn is_no_more_frames(&self) -> bool {
        matches!(self, SailError::NoMoreFrames)
    }

    /// Whether the underlying stream ran out of data
    pub const fn is_eof(&self) -> bool {
        matches!(
            self,
            SailError::Io(SailIoError::Eof) | SailError::Io(SailIoError::NotEnoughBytes(_, _))
        )
    }
}

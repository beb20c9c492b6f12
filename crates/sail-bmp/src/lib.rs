/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A BMP decoder
//!
//! This crate features a BMP decoder usable on its own through
//! [`BmpDecoder`] or as a codec module of the sail host through
//! [`MODULE`].
//!
//! # Supported formats
//! - Device dependent bitmaps (1 and 4 bit, system palette)
//! - DIB headers of 12, 40, 108 and 124 bytes
//! - Paletted images (1 bit, 4 bits and 8 bits)
//! - RLE (4 bit and 8 bit), including delta and end of bitmap escapes
//! - Uncompressed 16, 24 and 32 bit images, returned as stored
//! - Embedded ICC profiles of V5 headers
//!
//! # Unsupported formats
//! - Bit field masks
//! - Embedded PNG and JPEGs
//! - Encoding
#![macro_use]

pub use crate::codec::{EXPORTS, MODULE};
pub use crate::common::{BmpCompression, BmpVersion};
pub use crate::decoder::{probe_bmp, BmpDecoder, BOTTOM_UP_PROPERTY, VERSION_PROPERTY};
pub use crate::errors::BmpDecoderErrors;

mod codec;
mod common;
mod decoder;
mod errors;
mod rle;
mod utils;

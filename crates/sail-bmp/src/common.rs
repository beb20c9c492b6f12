/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! On-disk header layouts of the BMP family

// headers are read whole, not every field is consulted
#![allow(dead_code)]

/// `BM`, read as a little endian u16
pub(crate) const DIB_IDENTIFIER: u16 = 0x4D42;
/// Device dependent bitmaps start with `02 00`
pub(crate) const DDB_IDENTIFIER: u16 = 0x0002;

/// Colour space type of a V5 header carrying an embedded ICC profile
pub(crate) const PROFILE_EMBEDDED: [u8; 4] = *b"MBED";

pub(crate) const DIB_HEADER_V2_SIZE: u32 = 12;
pub(crate) const DIB_HEADER_V3_SIZE: u32 = 40;
pub(crate) const DIB_HEADER_V4_SIZE: u32 = 108;
pub(crate) const DIB_HEADER_V5_SIZE: u32 = 124;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BmpCompression {
    RGB,
    RLE8,
    RLE4,
    BITFIELDS,
    Unknown(u32)
}

impl BmpCompression {
    pub fn from_u32(num: u32) -> BmpCompression {
        match num {
            0 => BmpCompression::RGB,
            1 => BmpCompression::RLE8,
            2 => BmpCompression::RLE4,
            3 => BmpCompression::BITFIELDS,
            _ => BmpCompression::Unknown(num)
        }
    }

    pub const fn is_rle(self) -> bool {
        matches!(self, BmpCompression::RLE4 | BmpCompression::RLE8)
    }
}

/// Header revision of a BMP file
///
/// Ordered, later revisions carry every field of the earlier ones
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum BmpVersion {
    /// Device dependent bitmap, no colour table
    V1,
    /// OS/2 and Windows 2.x, 12 byte header with 16 bit dimensions
    V2,
    /// The common 40 byte `BITMAPINFOHEADER`
    V3,
    /// Adds colour masks, colour space and gamma
    V4,
    /// Adds rendering intent and ICC profile location
    V5
}

impl BmpVersion {
    pub const fn as_u32(self) -> u32 {
        match self {
            BmpVersion::V1 => 1,
            BmpVersion::V2 => 2,
            BmpVersion::V3 => 3,
            BmpVersion::V4 => 4,
            BmpVersion::V5 => 5
        }
    }
}

/// Bitmap header of a device dependent bitmap
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DdbBitmap {
    pub(crate) kind:       u16,
    pub(crate) width:      u16,
    pub(crate) height:     u16,
    pub(crate) byte_width: u16,
    pub(crate) planes:     u8,
    pub(crate) bit_count:  u8,
    pub(crate) pixels:     u32
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DibFileHeader {
    pub(crate) size:   u32,
    /// Absolute offset of the pixel data
    pub(crate) offset: u32
}

/// Fields every DIB header starts with
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DibHeaderV2 {
    pub(crate) size:      u32,
    pub(crate) width:     i32,
    pub(crate) height:    i32,
    pub(crate) planes:    u16,
    pub(crate) bit_count: u16
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DibHeaderV3 {
    pub(crate) compression:        u32,
    pub(crate) bitmap_size:        u32,
    pub(crate) x_pixels_per_meter: i32,
    pub(crate) y_pixels_per_meter: i32,
    pub(crate) colors_used:        u32,
    pub(crate) colors_important:   u32
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DibHeaderV4 {
    pub(crate) red_mask:         u32,
    pub(crate) green_mask:       u32,
    pub(crate) blue_mask:        u32,
    pub(crate) alpha_mask:       u32,
    pub(crate) color_space_type: [u8; 4],
    /// CIE XYZ endpoints of red, green and blue
    pub(crate) endpoints:        [i32; 9],
    pub(crate) gamma:            [u32; 3]
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DibHeaderV5 {
    pub(crate) intent:       u32,
    /// Offset of the profile from the start of the DIB header
    pub(crate) profile_data: u32,
    pub(crate) profile_size: u32,
    pub(crate) reserved:     u32
}

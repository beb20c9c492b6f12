/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use sail_core::pixel_format::PixelFormat;

use crate::BmpDecoderErrors;

/// Pixel format of stored pixels with the given bit count
pub(crate) fn bit_count_to_pixel_format(bit_count: u16) -> Result<PixelFormat, BmpDecoderErrors> {
    match bit_count {
        1 => Ok(PixelFormat::Bpp1Indexed),
        4 => Ok(PixelFormat::Bpp4Indexed),
        8 => Ok(PixelFormat::Bpp8Indexed),
        16 => Ok(PixelFormat::Bpp16Bgr555),
        24 => Ok(PixelFormat::Bpp24Bgr),
        32 => Ok(PixelFormat::Bpp32Bgra),
        _ => Err(BmpDecoderErrors::UnsupportedBitDepth(bit_count))
    }
}

/// Number of bytes of a stored row, without padding
pub(crate) fn bytes_in_row(width: u32, bit_count: u16) -> Result<u32, BmpDecoderErrors> {
    let bytes = match bit_count {
        1 => width.div_ceil(8),
        4 => width.div_ceil(2),
        8 => width,
        16 => width
            .checked_mul(2)
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?,
        24 => width
            .checked_mul(3)
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?,
        32 => width
            .checked_mul(4)
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?,
        _ => return Err(BmpDecoderErrors::UnsupportedBitDepth(bit_count))
    };
    Ok(bytes)
}

/// Bytes needed to pad a row to a 4 byte boundary
pub(crate) const fn pad_bytes(bytes_in_row: u32) -> u32 {
    (4 - bytes_in_row % 4) % 4
}

/// The fixed palette device dependent bitmaps are displayed with, in RGB
pub(crate) fn system_palette(bit_count: u8) -> Result<Vec<[u8; 3]>, BmpDecoderErrors> {
    match bit_count {
        1 => Ok(vec![[0, 0, 0], [255, 255, 255]]),
        // the 16 colour VGA palette
        4 => Ok(vec![
            [0, 0, 0],
            [128, 0, 0],
            [0, 128, 0],
            [128, 128, 0],
            [0, 0, 128],
            [128, 0, 128],
            [0, 128, 128],
            [192, 192, 192],
            [128, 128, 128],
            [255, 0, 0],
            [0, 255, 0],
            [255, 255, 0],
            [0, 0, 255],
            [255, 0, 255],
            [0, 255, 255],
            [255, 255, 255],
        ]),
        _ => Err(BmpDecoderErrors::UnsupportedBitDepth(u16::from(bit_count)))
    }
}

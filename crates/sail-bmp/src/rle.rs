/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! RLE4 and RLE8 decoding
//!
//! Both variants share the same byte pairs, a non zero count followed by
//! a value is an encoded run, a zero count introduces an escape:
//!
//! | second byte | meaning                                         |
//! |-------------|-------------------------------------------------|
//! | 0           | end of line                                     |
//! | 1           | end of bitmap                                   |
//! | 2           | delta, followed by unsigned dx and dy           |
//! | n >= 3      | absolute run of n pixels, padded to a u16       |
//!
//! RLE4 runs alternate the high and low nibble of their value.
//! Pixels are expanded to one palette index per byte.

use sail_core::bytestream::{SailIoTrait, SailReader};
use sail_core::log::trace;

use crate::common::BmpCompression;
use crate::BmpDecoderErrors;

const ESCAPE: u8 = 0;
const END_OF_LINE: u8 = 0;
const END_OF_BITMAP: u8 = 1;
const DELTA: u8 = 2;

/// Write position inside the output
struct RleCursor {
    x:         usize,
    /// Row in storage order
    row:       usize,
    width:     usize,
    height:    usize,
    stride:    usize,
    bottom_up: bool
}

impl RleCursor {
    /// Store `index` at the cursor, pixels past the row end are dropped
    fn put(&mut self, pixels: &mut [u8], index: u8) {
        if self.x < self.width && self.row < self.height {
            let y = if self.bottom_up {
                self.height - 1 - self.row
            } else {
                self.row
            };
            pixels[y * self.stride + self.x] = index;
        }
        self.x += 1;
    }

    fn next_line(&mut self) {
        self.x = 0;
        self.row += 1;
    }

    fn delta(&mut self, dx: u8, dy: u8) -> Result<(), BmpDecoderErrors> {
        let x = self.x + usize::from(dx);
        let row = self.row + usize::from(dy);

        if x > self.width || row > self.height {
            return Err(BmpDecoderErrors::GenericStatic(
                "RLE delta moves outside of the image"
            ));
        }
        self.x = x;
        self.row = row;
        Ok(())
    }
}

/// Decode a whole RLE compressed image
///
/// `pixels` must hold `stride * height` bytes, skipped pixels
/// are left as index zero.
pub(crate) fn decode_rle<T: SailIoTrait>(
    reader: &mut SailReader<T>, compression: BmpCompression, width: usize, bottom_up: bool,
    pixels: &mut [u8], stride: usize
) -> Result<(), BmpDecoderErrors> {
    let is_rle4 = compression == BmpCompression::RLE4;

    pixels.fill(0);

    let mut cursor = RleCursor {
        x: 0,
        row: 0,
        width,
        height: pixels.len() / stride.max(1),
        stride,
        bottom_up
    };
    // set when a run filled the row and the cursor already moved on,
    // the end of line marker that usually follows is then a no-op
    let mut line_wrapped = false;

    while cursor.row < cursor.height {
        let count = reader.get_u8_err()?;
        let value = reader.get_u8_err()?;

        if count != ESCAPE {
            for k in 0..count {
                let index = if !is_rle4 {
                    value
                } else if k & 1 == 0 {
                    value >> 4
                } else {
                    value & 0x0F
                };
                cursor.put(pixels, index);
            }
        } else {
            match value {
                END_OF_LINE => {
                    if !line_wrapped {
                        cursor.next_line();
                    }
                    line_wrapped = false;
                    continue;
                }
                END_OF_BITMAP => {
                    trace!("RLE: end of bitmap at row {}", cursor.row);
                    return Ok(());
                }
                DELTA => {
                    let dx = reader.get_u8_err()?;
                    let dy = reader.get_u8_err()?;
                    cursor.delta(dx, dy)?;
                    line_wrapped = false;
                    continue;
                }
                count => {
                    if is_rle4 {
                        let mut byte = 0;

                        for k in 0..count {
                            if k & 1 == 0 {
                                byte = reader.get_u8_err()?;
                                cursor.put(pixels, byte >> 4);
                            } else {
                                cursor.put(pixels, byte & 0x0F);
                            }
                        }
                        // absolute runs end on a 16 bit boundary
                        if (usize::from(count) + 1) / 2 % 2 != 0 {
                            reader.skip(1)?;
                        }
                    } else {
                        for _ in 0..count {
                            let byte = reader.get_u8_err()?;
                            cursor.put(pixels, byte);
                        }
                        if count % 2 != 0 {
                            reader.skip(1)?;
                        }
                    }
                }
            }
        }

        line_wrapped = false;

        if cursor.x >= cursor.width {
            cursor.next_line();
            line_wrapped = true;
        }
    }
    Ok(())
}

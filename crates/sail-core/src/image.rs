/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The image frame exchanged between the host and codecs
//!
//! On load the codec fills in geometry and provenance in `seek_next_frame`,
//! the host then allocates [`Image::pixels`] and the codec fills it in one or
//! more passes. On save the caller owns the pixels and the codec only reads them.

use std::collections::BTreeMap;

use crate::common::{Compression, Orientation, Resolution};
use crate::errors::{SailError, SailResult};
use crate::options::Variant;
use crate::pixel_format::PixelFormat;

/// A color palette for indexed images
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    /// Layout of a single palette entry
    pub pixel_format: PixelFormat,
    pub color_count:  u32,
    /// `color_count` entries, packed
    pub data:         Vec<u8>
}

impl Palette {
    /// Create a palette, checking that `data` holds exactly `color_count` entries
    pub fn new(pixel_format: PixelFormat, color_count: u32, data: Vec<u8>) -> SailResult<Palette> {
        let expected = pixel_format
            .bytes_per_line(color_count)
            .ok_or(SailError::UnsupportedPixelFormat(pixel_format))?;

        if data.len() != expected as usize {
            return Err(SailError::InvalidArgument(
                "palette data size does not match its color count"
            ));
        }
        Ok(Palette {
            pixel_format,
            color_count,
            data
        })
    }

    /// Return the bytes of palette entry `index`
    pub fn entry(&self, index: u32) -> Option<&[u8]> {
        if index >= self.color_count {
            return None;
        }
        let size = (self.pixel_format.bits_per_pixel() / 8) as usize;
        let start = index as usize * size;
        self.data.get(start..start + size)
    }
}

/// An embedded ICC profile
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Iccp {
    pub data: Vec<u8>
}

/// What the image looked like before it reached the caller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceImage {
    /// Pixel format as stored in the file
    pub pixel_format:       PixelFormat,
    pub compression:        Compression,
    pub orientation:        Orientation,
    pub interlaced:         bool,
    /// Format specific extras, keys are prefixed with the codec name
    pub special_properties: BTreeMap<String, Variant>
}

/// One image frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub width:             u32,
    pub height:            u32,
    pub bytes_per_line:    u32,
    pub pixel_format:      PixelFormat,
    pub palette:           Option<Palette>,
    /// Animation delay in milliseconds, `None` for still images
    pub delay:             Option<u32>,
    /// Number of passes needed to fill the pixels of an interlaced frame
    pub interlaced_passes: u32,
    pub resolution:        Option<Resolution>,
    pub iccp:              Option<Iccp>,
    pub source_image:      Option<SourceImage>,
    pub pixels:            Vec<u8>
}

impl Image {
    /// Create an image with packed rows, pixels are not allocated
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> SailResult<Image> {
        let bytes_per_line = pixel_format
            .bytes_per_line(width)
            .ok_or(SailError::UnsupportedPixelFormat(pixel_format))?;

        Ok(Image {
            width,
            height,
            bytes_per_line,
            pixel_format,
            interlaced_passes: 1,
            ..Image::default()
        })
    }

    /// Size in bytes the pixel buffer must have
    pub fn pixels_size(&self) -> SailResult<usize> {
        (self.height as usize)
            .checked_mul(self.bytes_per_line as usize)
            .ok_or(SailError::IncorrectImageDimensions {
                width:  self.width,
                height: self.height
            })
    }

    /// Check that geometry and pixel format make sense
    pub fn check_geometry(&self) -> SailResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SailError::IncorrectImageDimensions {
                width:  self.width,
                height: self.height
            });
        }
        if self.pixel_format == PixelFormat::Unknown {
            return Err(SailError::UnsupportedPixelFormat(self.pixel_format));
        }
        Ok(())
    }

    /// Return row `y` of the pixel buffer
    pub fn scan_line(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.bytes_per_line as usize;
        self.pixels.get(start..start + self.bytes_per_line as usize)
    }

    pub fn scan_line_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.bytes_per_line as usize;
        let end = start + self.bytes_per_line as usize;
        self.pixels.get_mut(start..end)
    }

    /// A copy of everything but the pixels
    pub fn clone_skeleton(&self) -> Image {
        Image {
            width:             self.width,
            height:            self.height,
            bytes_per_line:    self.bytes_per_line,
            pixel_format:      self.pixel_format,
            palette:           self.palette.clone(),
            delay:             self.delay,
            interlaced_passes: self.interlaced_passes,
            resolution:        self.resolution,
            iccp:              self.iccp.clone(),
            source_image:      self.source_image.clone(),
            pixels:            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_has_packed_rows() {
        let image = Image::new(3, 2, PixelFormat::Bpp4Indexed).unwrap();
        assert_eq!(image.bytes_per_line, 2);
        assert_eq!(image.pixels_size().unwrap(), 4);
        assert!(image.pixels.is_empty());
    }

    #[test]
    fn zero_sized_images_are_rejected() {
        let image = Image::new(0, 2, PixelFormat::Bpp24Rgb).unwrap();
        assert!(matches!(
            image.check_geometry(),
            Err(SailError::IncorrectImageDimensions { width: 0, height: 2 })
        ));
    }

    #[test]
    fn palette_entries() {
        let palette = Palette::new(PixelFormat::Bpp24Rgb, 2, vec![0, 0, 0, 255, 255, 255]).unwrap();
        assert_eq!(palette.entry(1), Some(&[255_u8, 255, 255][..]));
        assert_eq!(palette.entry(2), None);
        assert!(Palette::new(PixelFormat::Bpp24Rgb, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn scan_lines() {
        let mut image = Image::new(2, 2, PixelFormat::Bpp8Indexed).unwrap();
        image.pixels = vec![1, 2, 3, 4];
        image.scan_line_mut(1).unwrap()[0] = 9;
        assert_eq!(image.scan_line(1), Some(&[9_u8, 4][..]));
        assert_eq!(image.scan_line(2), None);
    }
}

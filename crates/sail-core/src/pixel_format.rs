/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel formats understood by the host and codecs
//!
//! A pixel format names both the memory layout of a pixel and how many bits it
//! occupies, e.g `BPP24-RGB` is three bytes per pixel in red, green, blue order.
//!
//! Names are what appear in codec descriptors, they are matched case-insensitively.

macro_rules! pixel_formats {
    ($($variant:ident => ($name:literal, $bits:literal)),* $(,)?) => {
        /// A pixel format
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
        #[non_exhaustive]
        pub enum PixelFormat {
            #[default]
            Unknown,
            $($variant),*
        }

        impl PixelFormat {
            /// Every known pixel format, `Unknown` excluded
            pub const ALL: &'static [PixelFormat] = &[$(PixelFormat::$variant),*];

            /// The canonical name of this format as used in codec descriptors
            pub const fn as_str(self) -> &'static str {
                match self {
                    PixelFormat::Unknown => "UNKNOWN",
                    $(PixelFormat::$variant => $name),*
                }
            }

            /// Number of bits a single pixel occupies
            ///
            /// Returns zero for `Unknown`
            pub const fn bits_per_pixel(self) -> u32 {
                match self {
                    PixelFormat::Unknown => 0,
                    $(PixelFormat::$variant => $bits),*
                }
            }

            /// Parse a format name, case insensitive
            ///
            /// Returns `None` for names we don't know, `UNKNOWN` included.
            pub fn from_name(name: &str) -> Option<PixelFormat> {
                $(
                    if name.eq_ignore_ascii_case($name) {
                        return Some(PixelFormat::$variant);
                    }
                )*
                None
            }
        }
    };
}

pixel_formats!(
    Bpp1 => ("BPP1", 1),
    Bpp2 => ("BPP2", 2),
    Bpp4 => ("BPP4", 4),
    Bpp8 => ("BPP8", 8),
    Bpp16 => ("BPP16", 16),
    Bpp24 => ("BPP24", 24),
    Bpp32 => ("BPP32", 32),
    Bpp48 => ("BPP48", 48),
    Bpp64 => ("BPP64", 64),

    Bpp1Indexed => ("BPP1-INDEXED", 1),
    Bpp2Indexed => ("BPP2-INDEXED", 2),
    Bpp4Indexed => ("BPP4-INDEXED", 4),
    Bpp8Indexed => ("BPP8-INDEXED", 8),
    Bpp16Indexed => ("BPP16-INDEXED", 16),

    Bpp1Grayscale => ("BPP1-GRAYSCALE", 1),
    Bpp2Grayscale => ("BPP2-GRAYSCALE", 2),
    Bpp4Grayscale => ("BPP4-GRAYSCALE", 4),
    Bpp8Grayscale => ("BPP8-GRAYSCALE", 8),
    Bpp16Grayscale => ("BPP16-GRAYSCALE", 16),

    Bpp4GrayscaleAlpha => ("BPP4-GRAYSCALE-ALPHA", 4),
    Bpp8GrayscaleAlpha => ("BPP8-GRAYSCALE-ALPHA", 8),
    Bpp16GrayscaleAlpha => ("BPP16-GRAYSCALE-ALPHA", 16),
    Bpp32GrayscaleAlpha => ("BPP32-GRAYSCALE-ALPHA", 32),

    Bpp16Rgb555 => ("BPP16-RGB555", 16),
    Bpp16Bgr555 => ("BPP16-BGR555", 16),
    Bpp16Rgb565 => ("BPP16-RGB565", 16),
    Bpp16Bgr565 => ("BPP16-BGR565", 16),

    Bpp24Rgb => ("BPP24-RGB", 24),
    Bpp24Bgr => ("BPP24-BGR", 24),
    Bpp48Rgb => ("BPP48-RGB", 48),
    Bpp48Bgr => ("BPP48-BGR", 48),

    Bpp32Rgbx => ("BPP32-RGBX", 32),
    Bpp32Bgrx => ("BPP32-BGRX", 32),
    Bpp32Xrgb => ("BPP32-XRGB", 32),
    Bpp32Xbgr => ("BPP32-XBGR", 32),
    Bpp32Rgba => ("BPP32-RGBA", 32),
    Bpp32Bgra => ("BPP32-BGRA", 32),
    Bpp32Argb => ("BPP32-ARGB", 32),
    Bpp32Abgr => ("BPP32-ABGR", 32),

    Bpp64Rgba => ("BPP64-RGBA", 64),
    Bpp64Bgra => ("BPP64-BGRA", 64),
    Bpp64Argb => ("BPP64-ARGB", 64),
    Bpp64Abgr => ("BPP64-ABGR", 64),

    Bpp32Cmyk => ("BPP32-CMYK", 32),
    Bpp64Cmyk => ("BPP64-CMYK", 64),
    Bpp24Ycbcr => ("BPP24-YCBCR", 24),
    Bpp32Ycck => ("BPP32-YCCK", 32),
);

impl PixelFormat {
    /// Whether pixels are indices into a palette
    pub const fn is_indexed(self) -> bool {
        matches!(
            self,
            PixelFormat::Bpp1Indexed
                | PixelFormat::Bpp2Indexed
                | PixelFormat::Bpp4Indexed
                | PixelFormat::Bpp8Indexed
                | PixelFormat::Bpp16Indexed
        )
    }

    /// Number of bytes needed to store a row of `width` pixels
    ///
    /// Rows are packed, sub byte formats round up to the next byte.
    ///
    /// Returns `None` for `Unknown` or on overflow
    pub fn bytes_per_line(self, width: u32) -> Option<u32> {
        let bits = self.bits_per_pixel();

        if bits == 0 {
            return None;
        }
        let bits_in_row = u64::from(width).checked_mul(u64::from(bits))?;
        u32::try_from(bits_in_row.div_ceil(8)).ok()
    }
}

impl core::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

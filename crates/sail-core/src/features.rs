/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Load and save capabilities declared by a codec

use crate::common::{CodecFeatures, Compression};
use crate::pixel_format::PixelFormat;

/// What a codec can do when loading
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadFeatures {
    pub features: CodecFeatures,
    /// Tuning keys the codec understands
    pub tuning:   Vec<String>
}

/// Compression level range a codec accepts
///
/// Only meaningful for codecs with a single compression kind
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CompressionLevel {
    pub min:     f64,
    pub max:     f64,
    pub default: f64,
    pub step:    f64
}

impl CompressionLevel {
    /// Whether the range is degenerate, i.e all values are zero
    pub fn is_empty(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    pub fn contains(&self, level: f64) -> bool {
        level >= self.min && level <= self.max
    }
}

/// What a codec can do when saving
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveFeatures {
    pub features:            CodecFeatures,
    /// Pixel formats the codec accepts for writing
    pub pixel_formats:       Vec<PixelFormat>,
    /// Special properties the codec understands
    pub properties:          Vec<String>,
    /// Number of passes used when writing interlaced
    pub interlaced_passes:   u32,
    pub compressions:        Vec<Compression>,
    pub default_compression: Compression,
    pub compression_level:   Option<CompressionLevel>,
    pub tuning:              Vec<String>
}

impl SaveFeatures {
    pub fn supports_pixel_format(&self, format: PixelFormat) -> bool {
        self.pixel_formats.contains(&format)
    }

    pub fn supports_compression(&self, compression: Compression) -> bool {
        self.compressions.contains(&compression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_level_bounds() {
        let level = CompressionLevel {
            min:     1.0,
            max:     9.0,
            default: 6.0,
            step:    1.0
        };
        assert!(level.contains(1.0));
        assert!(!level.contains(9.5));
        assert!(!level.is_empty());
        assert!(CompressionLevel::default().is_empty());
    }
}

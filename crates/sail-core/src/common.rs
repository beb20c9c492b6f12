/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Small vocabulary types shared across the family
//!
//! Compressions, codec feature flags, option flags, orientation
//! and resolution.

use bitflags::bitflags;

macro_rules! compressions {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A compression kind a codec may read or write
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
        #[non_exhaustive]
        pub enum Compression {
            #[default]
            Unknown,
            $($variant),*
        }

        impl Compression {
            pub const fn as_str(self) -> &'static str {
                match self {
                    Compression::Unknown => "UNKNOWN",
                    $(Compression::$variant => $name),*
                }
            }

            /// Parse a compression name, case insensitive
            ///
            /// `UNKNOWN` is parsed too, descriptor validation rejects it later
            pub fn from_name(name: &str) -> Option<Compression> {
                if name.eq_ignore_ascii_case("UNKNOWN") {
                    return Some(Compression::Unknown);
                }
                $(
                    if name.eq_ignore_ascii_case($name) {
                        return Some(Compression::$variant);
                    }
                )*
                None
            }
        }
    };
}

compressions!(
    None => "NONE",
    AdobeDeflate => "ADOBE-DEFLATE",
    CcittFax3 => "CCITT-FAX3",
    CcittFax4 => "CCITT-FAX4",
    CcittRle => "CCITT-RLE",
    Deflate => "DEFLATE",
    Jbig => "JBIG",
    Jpeg => "JPEG",
    Jpeg2000 => "JPEG-2000",
    JpegXl => "JPEG-XL",
    Lzma => "LZMA",
    Lzw => "LZW",
    PackBits => "PACKBITS",
    Qoi => "QOI",
    Rle => "RLE",
    Webp => "WEBP",
    Zstd => "ZSTD",
    Av1 => "AV1",
);

impl core::fmt::Display for Compression {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Features a codec declares for loading or saving
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CodecFeatures: u32 {
        /// Single frame images
        const STATIC      = 1 << 0;
        const ANIMATED    = 1 << 1;
        const MULTI_PAGED = 1 << 2;
        /// Text meta data, EXIF and friends
        const META_DATA   = 1 << 3;
        const INTERLACED  = 1 << 4;
        /// Embedded ICC profiles
        const ICCP        = 1 << 5;
    }
}

impl CodecFeatures {
    /// Parse a single feature name as written in codec descriptors
    pub fn from_descriptor_name(name: &str) -> Option<CodecFeatures> {
        const NAMES: [(&str, CodecFeatures); 6] = [
            ("STATIC", CodecFeatures::STATIC),
            ("ANIMATED", CodecFeatures::ANIMATED),
            ("MULTI-PAGED", CodecFeatures::MULTI_PAGED),
            ("META-DATA", CodecFeatures::META_DATA),
            ("INTERLACED", CodecFeatures::INTERLACED),
            ("ICCP", CodecFeatures::ICCP)
        ];
        NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, feature)| *feature)
    }

    /// Whether the codec can produce or accept image frames at all
    pub const fn handles_frames(self) -> bool {
        self.intersects(
            CodecFeatures::STATIC
                .union(CodecFeatures::ANIMATED)
                .union(CodecFeatures::MULTI_PAGED)
        )
    }
}

bitflags! {
    /// Flags requesting optional behaviour from a codec
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct SailOptions: u32 {
        const META_DATA  = 1 << 0;
        /// Load or save interlaced data pass by pass
        const INTERLACED = 1 << 1;
        const ICCP       = 1 << 2;
    }
}

impl SailOptions {
    /// Options that correspond to the given codec features
    ///
    /// Features with no option counterpart are dropped
    pub fn from_features(features: CodecFeatures) -> SailOptions {
        let mut options = SailOptions::empty();

        if features.contains(CodecFeatures::META_DATA) {
            options |= SailOptions::META_DATA;
        }
        if features.contains(CodecFeatures::INTERLACED) {
            options |= SailOptions::INTERLACED;
        }
        if features.contains(CodecFeatures::ICCP) {
            options |= SailOptions::ICCP;
        }
        options
    }
}

/// Orientation of the delivered pixels relative to how they
/// should be displayed
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
    MirroredHorizontally,
    MirroredVertically,
    MirroredHorizontallyRotated90,
    MirroredHorizontallyRotated270
}

impl Orientation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Orientation::Normal => "NORMAL",
            Orientation::Rotated90 => "ROTATED-90",
            Orientation::Rotated180 => "ROTATED-180",
            Orientation::Rotated270 => "ROTATED-270",
            Orientation::MirroredHorizontally => "MIRRORED-HORIZONTALLY",
            Orientation::MirroredVertically => "MIRRORED-VERTICALLY",
            Orientation::MirroredHorizontallyRotated90 => "MIRRORED-HORIZONTALLY-ROTATED-90",
            Orientation::MirroredHorizontallyRotated270 => "MIRRORED-HORIZONTALLY-ROTATED-270"
        }
    }
}

/// Unit of an image [`Resolution`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ResolutionUnit {
    #[default]
    Unknown,
    Micrometer,
    Centimeter,
    Meter,
    Inch
}

impl ResolutionUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResolutionUnit::Unknown => "UNKNOWN",
            ResolutionUnit::Micrometer => "MICROMETER",
            ResolutionUnit::Centimeter => "CENTIMETER",
            ResolutionUnit::Meter => "METER",
            ResolutionUnit::Inch => "INCH"
        }
    }
}

/// Physical pixel density
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Resolution {
    pub unit: ResolutionUnit,
    pub x:    f64,
    pub y:    f64
}

impl Resolution {
    pub const fn new(unit: ResolutionUnit, x: f64, y: f64) -> Resolution {
        Resolution { unit, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_names() {
        assert_eq!(Compression::from_name("rle"), Some(Compression::Rle));
        assert_eq!(Compression::from_name("UNKNOWN"), Some(Compression::Unknown));
        assert_eq!(Compression::from_name("brotli"), None);
        assert_eq!(Compression::PackBits.as_str(), "PACKBITS");
    }

    #[test]
    fn feature_names() {
        assert_eq!(
            CodecFeatures::from_descriptor_name("multi-paged"),
            Some(CodecFeatures::MULTI_PAGED)
        );
        assert_eq!(CodecFeatures::from_descriptor_name("SOURCE-IMAGE"), None);
        // descriptor names use dashes, the flag constants underscores
        assert_eq!(CodecFeatures::from_descriptor_name("MULTI_PAGED"), None);
        assert_eq!(
            CodecFeatures::from_name("MULTI_PAGED"),
            Some(CodecFeatures::MULTI_PAGED)
        );
        assert!(CodecFeatures::ANIMATED.handles_frames());
        assert!(!CodecFeatures::ICCP.handles_frames());
    }

    #[test]
    fn options_follow_features() {
        let features = CodecFeatures::STATIC | CodecFeatures::ICCP | CodecFeatures::INTERLACED;
        assert_eq!(
            SailOptions::from_features(features),
            SailOptions::ICCP | SailOptions::INTERLACED
        );
    }
}

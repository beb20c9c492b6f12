/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Options respected when saving images

use crate::common::{Compression, SailOptions};
use crate::features::SaveFeatures;
use crate::options::{Tuning, Variant};

/// Save options
///
/// The compression and pixel formats requested here are checked against the
/// codec's save features before the codec ever sees them.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    options:           SailOptions,
    tuning:            Tuning,
    compression:       Compression,
    compression_level: f64
}

impl SaveOptions {
    /// Create options from the defaults a codec advertises
    ///
    /// Takes the default compression and compression level, option
    /// flags are derived from the save features
    pub fn from_features(features: &SaveFeatures) -> SaveOptions {
        SaveOptions {
            options: SailOptions::from_features(features.features),
            compression: features.default_compression,
            compression_level: features
                .compression_level
                .map(|level| level.default)
                .unwrap_or(0.0),
            ..SaveOptions::default()
        }
    }

    pub const fn get_options(&self) -> SailOptions {
        self.options
    }

    pub fn set_options(mut self, options: SailOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the frame should be written interlaced
    ///
    /// The number of passes is the codec's `interlaced-passes`
    pub fn set_interlaced(mut self, yes: bool) -> Self {
        self.options.set(SailOptions::INTERLACED, yes);
        self
    }

    pub const fn get_compression(&self) -> Compression {
        self.compression
    }

    /// Set the compression to write with
    ///
    /// Must be one of the compressions the codec lists
    pub fn set_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub const fn get_compression_level(&self) -> f64 {
        self.compression_level
    }

    /// Set the compression level, only meaningful for codecs
    /// declaring a compression level range
    pub fn set_compression_level(mut self, level: f64) -> Self {
        self.compression_level = level;
        self
    }

    pub fn set_tuning<K: Into<String>, V: Into<Variant>>(mut self, key: K, value: V) -> Self {
        self.tuning.insert(key.into(), value.into());
        self
    }

    pub fn get_tuning(&self, key: &str) -> Option<&Variant> {
        self.tuning.get(key)
    }

    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

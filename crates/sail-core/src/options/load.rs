/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Options respected when loading images

use crate::common::SailOptions;
use crate::features::LoadFeatures;
use crate::options::{Tuning, Variant};

/// Load options
///
/// Not all options are respected by every codec, each option
/// documents who respects it.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    options:    SailOptions,
    tuning:     Tuning,
    max_width:  usize,
    max_height: usize
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            options:    SailOptions::empty(),
            tuning:     Tuning::new(),
            max_width:  1 << 14,
            max_height: 1 << 14
        }
    }
}

impl LoadOptions {
    /// Create options that enable everything the codec advertises
    /// and the host knows how to request
    ///
    /// Features other than meta data, interlacing and ICC profiles are
    /// dropped.
    pub fn from_features(features: &LoadFeatures) -> LoadOptions {
        LoadOptions::default().set_options(SailOptions::from_features(features.features))
    }

    pub const fn get_options(&self) -> SailOptions {
        self.options
    }

    /// Replace the option flags
    pub fn set_options(mut self, options: SailOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the ICC profile should be extracted
    ///
    /// - Default value: false
    /// - Respected by: `bmp`
    pub fn set_iccp(mut self, yes: bool) -> Self {
        self.options.set(SailOptions::ICCP, yes);
        self
    }

    /// Whether interlaced frames are delivered pass by pass
    pub fn set_interlaced(mut self, yes: bool) -> Self {
        self.options.set(SailOptions::INTERLACED, yes);
        self
    }

    pub fn set_meta_data(mut self, yes: bool) -> Self {
        self.options.set(SailOptions::META_DATA, yes);
        self
    }

    /// Get maximum width configured for which the codec
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the codec should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }

    /// Set maximum width for which the codec should not try
    /// decoding images greater than that width
    ///
    /// - Default value: 16384
    /// - Respected by: `bmp`
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the codec should not try
    /// decoding images greater than that height
    ///
    /// - Default value: 16384
    /// - Respected by: `bmp`
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Add a codec specific tuning value, replacing any earlier value for the key
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CodecFeatures;

    #[test]
    fn from_features_masks_unrelated_flags() {
        let features = LoadFeatures {
            features: CodecFeatures::STATIC | CodecFeatures::ICCP,
            tuning:   vec![]
        };
        let options = LoadOptions::from_features(&features);

        assert_eq!(options.get_options(), SailOptions::ICCP);
        assert_eq!(options.get_max_width(), 16384);
    }

    #[test]
    fn tuning_is_replaced() {
        let options = LoadOptions::default()
            .set_tuning("bmp-strict", true)
            .set_tuning("bmp-strict", false);

        assert_eq!(
            options.get_tuning("bmp-strict").and_then(Variant::as_bool),
            Some(false)
        );
        assert_eq!(options.tuning().len(), 1);
    }
}

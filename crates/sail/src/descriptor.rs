/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Codec descriptors
//!
//! Every codec ships a `<name>.codec.info` file next to its module,
//! an INI style description of what the codec is and what it can do.
//!
//! ```ini
//! [codec]
//! layout=8
//! version=1.0.0
//! priority=medium
//! name=QOI
//! description=Quite OK Image format
//! magic-numbers=71 6F 69 66
//! extensions=qoi
//! mime-types=image/qoi
//!
//! [load-features]
//! features=STATIC
//!
//! [save-features]
//! features=STATIC
//! output-pixel-formats=BPP24-RGB;BPP32-RGBA
//! compression-types=QOI
//! default-compression=QOI
//! ```
//!
//! Lists are separated by `;`, lines starting with `;` or `#` are comments
//! and keys with empty values are ignored. `layout` must be the first key.
use std::path::{Path, PathBuf};

use sail_core::common::{CodecFeatures, Compression};
use sail_core::features::{CompressionLevel, LoadFeatures, SaveFeatures};
use sail_core::layout::SUPPORTED_LAYOUT;
use sail_core::log::{error, warn};
use sail_core::pixel_format::PixelFormat;
use sail_core::{SailError, SailResult};

use crate::magic::{MagicNumber, MAX_MAGIC_LENGTH};

/// Descriptor file suffix
pub const DESCRIPTOR_SUFFIX: &str = ".codec.info";

/// Order in which codecs are probed, common formats come first
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CodecPriority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
    Lowest
}

impl CodecPriority {
    pub fn from_name(name: &str) -> Option<CodecPriority> {
        match name.to_ascii_lowercase().as_str() {
            "highest" => Some(CodecPriority::Highest),
            "high" => Some(CodecPriority::High),
            "medium" => Some(CodecPriority::Medium),
            "low" => Some(CodecPriority::Low),
            "lowest" => Some(CodecPriority::Lowest),
            _ => None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CodecPriority::Highest => "highest",
            CodecPriority::High => "high",
            CodecPriority::Medium => "medium",
            CodecPriority::Low => "low",
            CodecPriority::Lowest => "lowest"
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Section {
    Codec,
    LoadFeatures,
    SaveFeatures
}

impl Section {
    fn from_name(name: &str) -> Option<Section> {
        match name {
            "codec" => Some(Section::Codec),
            "load-features" => Some(Section::LoadFeatures),
            "save-features" => Some(Section::SaveFeatures),
            _ => None
        }
    }
}

/// Static description of a codec, parsed from its descriptor
///
/// Immutable once parsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodecInfo {
    layout:        u32,
    version:       String,
    priority:      CodecPriority,
    name:          String,
    description:   String,
    magic_numbers: Vec<MagicNumber>,
    extensions:    Vec<String>,
    mime_types:    Vec<String>,
    load_features: LoadFeatures,
    save_features: SaveFeatures,
    /// Module on disk, absent for modules linked into the process
    path:          Option<PathBuf>,
    /// Position in the owning context
    pub(crate) index: usize
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|item| !item.is_empty())
}

fn lowercase_list(value: &str) -> Vec<String> {
    split_list(value).map(str::to_ascii_lowercase).collect()
}

fn parse_features(value: &str) -> Result<CodecFeatures, String> {
    split_list(value).try_fold(CodecFeatures::empty(), |features, name| {
        CodecFeatures::from_descriptor_name(name)
            .map(|feature| features | feature)
            .ok_or_else(|| format!("unknown codec feature '{name}'"))
    })
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("invalid value '{value}' for '{key}'"))
}

impl CodecInfo {
    /// Parse and validate a descriptor
    ///
    /// `source_name` names the descriptor in errors, usually its path.
    pub fn parse(text: &str, source_name: &str) -> SailResult<CodecInfo> {
        let mut info = CodecInfo::default();
        let mut section = None;
        let mut seen_key = false;

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            let parse_error = |reason: String| SailError::ParseDescriptor {
                source_name: source_name.to_string(),
                line: index + 1,
                reason
            };

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| parse_error("unterminated section header".to_string()))?
                    .trim();

                section = Some(
                    Section::from_name(name)
                        .ok_or_else(|| parse_error(format!("unsupported section [{name}]")))?
                );
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| parse_error(format!("expected key=value, found '{line}'")))?;
            let (key, value) = (key.trim(), value.trim());

            let section =
                section.ok_or_else(|| parse_error(format!("key '{key}' outside of a section")))?;

            if !seen_key && (section != Section::Codec || key != "layout") {
                return Err(parse_error("'layout' must be the first key".to_string()));
            }
            seen_key = true;

            if value.is_empty() {
                continue;
            }
            info.apply(section, key, value).map_err(parse_error)?;
        }

        if info.layout != SUPPORTED_LAYOUT {
            error!(
                "Unsupported codec layout version {} in {}, expected {}",
                info.layout, source_name, SUPPORTED_LAYOUT
            );
            return Err(SailError::UnsupportedCodecLayout(info.layout));
        }
        info.validate()?;

        Ok(info)
    }

    fn apply(&mut self, section: Section, key: &str, value: &str) -> Result<(), String> {
        match (section, key) {
            (Section::Codec, "layout") => self.layout = parse_number(key, value)?,
            (Section::Codec, "version") => self.version = value.to_string(),
            (Section::Codec, "priority") => {
                self.priority = CodecPriority::from_name(value)
                    .ok_or_else(|| format!("unknown codec priority '{value}'"))?;
            }
            (Section::Codec, "name") => self.name = value.to_string(),
            (Section::Codec, "description") => self.description = value.to_string(),
            (Section::Codec, "magic-numbers") => {
                self.magic_numbers.clear();

                for pattern in split_list(value) {
                    if pattern.len() > MAX_MAGIC_LENGTH {
                        // the codec stays usable through extensions and mime types
                        error!(
                            "Magic number '{}' is too long. Magic numbers for the '{}' codec are disabled",
                            pattern, self.name
                        );
                        self.magic_numbers.clear();
                        break;
                    }
                    self.magic_numbers.push(MagicNumber::parse(pattern)?);
                }
            }
            (Section::Codec, "extensions") => self.extensions = lowercase_list(value),
            (Section::Codec, "mime-types") => self.mime_types = lowercase_list(value),

            (Section::LoadFeatures, "features") => {
                self.load_features.features = parse_features(value)?;
            }
            (Section::LoadFeatures, "tuning") => {
                self.load_features.tuning = split_list(value).map(str::to_string).collect();
            }

            (Section::SaveFeatures, "features") => {
                self.save_features.features = parse_features(value)?;
            }
            (Section::SaveFeatures, "output-pixel-formats" | "pixel-formats") => {
                self.save_features.pixel_formats = split_list(value)
                    .map(|name| {
                        PixelFormat::from_name(name)
                            .ok_or_else(|| format!("unknown pixel format '{name}'"))
                    })
                    .collect::<Result<_, _>>()?;
            }
            (Section::SaveFeatures, "properties") => {
                self.save_features.properties = split_list(value).map(str::to_string).collect();
            }
            (Section::SaveFeatures, "interlaced-passes") => {
                self.save_features.interlaced_passes = parse_number(key, value)?;
            }
            (Section::SaveFeatures, "compression-types" | "compressions") => {
                self.save_features.compressions = split_list(value)
                    .map(|name| {
                        Compression::from_name(name)
                            .ok_or_else(|| format!("unknown compression '{name}'"))
                    })
                    .collect::<Result<_, _>>()?;
            }
            (Section::SaveFeatures, "default-compression") => {
                self.save_features.default_compression = Compression::from_name(value)
                    .ok_or_else(|| format!("unknown compression '{value}'"))?;
            }
            (Section::SaveFeatures, "compression-level-min") => {
                self.compression_level().min = parse_number(key, value)?;
            }
            (Section::SaveFeatures, "compression-level-max") => {
                self.compression_level().max = parse_number(key, value)?;
            }
            (Section::SaveFeatures, "compression-level-default") => {
                self.compression_level().default = parse_number(key, value)?;
            }
            (Section::SaveFeatures, "compression-level-step") => {
                self.compression_level().step = parse_number(key, value)?;
            }
            (Section::SaveFeatures, "tuning") => {
                self.save_features.tuning = split_list(value).map(str::to_string).collect();
            }
            (_, key) => return Err(format!("unsupported key '{key}'"))
        }
        Ok(())
    }

    fn compression_level(&mut self) -> &mut CompressionLevel {
        self.save_features
            .compression_level
            .get_or_insert_with(CompressionLevel::default)
    }

    fn incomplete(&self, reason: &'static str) -> SailError {
        error!("Codec validation error: {} codec {}", self.name, reason);

        SailError::IncompleteDescriptor {
            name: self.name.clone(),
            reason
        }
    }

    /// Reject descriptors a host could not use safely
    fn validate(&self) -> SailResult<()> {
        if self.name.is_empty() {
            return Err(self.incomplete("has an empty name"));
        }
        if self.name.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(self.incomplete("has lowercase letters in its name"));
        }
        if self.version.is_empty() {
            return Err(self.incomplete("has an empty version"));
        }
        if self.description.is_empty() {
            return Err(self.incomplete("has an empty description"));
        }
        if self.magic_numbers.is_empty() && self.extensions.is_empty() && self.mime_types.is_empty()
        {
            return Err(self.incomplete(
                "has no identification method (magic number or extension or mime type)"
            ));
        }
        let save = &self.save_features;

        if save.features.handles_frames() && save.pixel_formats.is_empty() {
            return Err(self.incomplete(
                "is able to save images, but output pixel formats are not specified"
            ));
        }
        if !save.features.is_empty() && save.compressions.is_empty() {
            return Err(self.incomplete("has an empty compressions list"));
        }
        if save.compressions.len() > 1
            && save
                .compression_level
                .is_some_and(|level| !level.is_empty())
        {
            return Err(self.incomplete(
                "has more than one compression type and non-zero compression levels"
            ));
        }
        if save.compressions.contains(&Compression::Unknown) {
            return Err(self.incomplete("has UNKNOWN compression"));
        }
        if !save.compressions.is_empty() && !save.supports_compression(save.default_compression) {
            return Err(self.incomplete("has a default compression outside of its compressions"));
        }
        if let Some(level) = save.compression_level {
            if level.min > level.max {
                return Err(self.incomplete("has a minimum compression level above the maximum"));
            }
            if !level.is_empty() && !level.contains(level.default) {
                warn!(
                    "{} codec has a default compression level {} outside of [{}, {}]",
                    self.name, level.default, level.min, level.max
                );
            }
        }
        if save.features.contains(CodecFeatures::INTERLACED) && save.interlaced_passes < 1 {
            return Err(self.incomplete("is able to save interlaced images, but has no passes"));
        }
        Ok(())
    }

    pub(crate) fn with_path(mut self, path: PathBuf) -> CodecInfo {
        self.path = Some(path);
        self
    }

    /// Codec layout version the module was built for
    pub const fn layout(&self) -> u32 {
        self.layout
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub const fn priority(&self) -> CodecPriority {
        self.priority
    }

    /// Short upper-case name, e.g `BMP`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn magic_numbers(&self) -> &[MagicNumber] {
        &self.magic_numbers
    }

    /// Lower-cased extensions without a leading dot
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    pub const fn load_features(&self) -> &LoadFeatures {
        &self.load_features
    }

    pub const fn save_features(&self) -> &SaveFeatures {
        &self.save_features
    }

    /// Path of the module on disk
    ///
    /// `None` for codecs linked into the process image
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether any magic number of the codec matches the start of `data`
    pub fn matches_magic(&self, data: &[u8]) -> bool {
        self.magic_numbers.iter().any(|magic| magic.matches(data))
    }

    /// Case insensitive extension match, a leading dot is ignored
    pub fn matches_extension(&self, extension: &str) -> bool {
        let extension = extension.strip_prefix('.').unwrap_or(extension);

        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    pub fn matches_mime_type(&self, mime_type: &str) -> bool {
        self.mime_types
            .iter()
            .any(|known| known.eq_ignore_ascii_case(mime_type.trim()))
    }
}

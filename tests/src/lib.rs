/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::path::{Path, PathBuf};

use sail::{Context, ContextConfig, ModuleTable};
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

pub mod raw;

mod bmp;
mod interlace;

/// A synthesized BMP and what decoding it must produce
#[derive(Clone, Deserialize, Debug)]
pub struct TestEntry {
    pub name:           String,
    pub header_size:    u32,
    pub width:          i32,
    pub height:         i32,
    pub bit_count:      u16,
    pub compression:    u32,
    #[serde(default)]
    pub palette:        Vec<[u8; 4]>,
    /// Pixel data as stored in the file
    pub stored:         Vec<u8>,
    pub pixel_format:   String,
    pub bytes_per_line: u32,
    /// Decoded pixels, top row first
    pub expected:       Vec<u8>,
    pub comment:        Option<String>
}

pub fn manifest_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(name)
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}

/// A registry with the built-in codecs and the RAW test codec
pub fn test_context() -> Context {
    Context::new_with_config(
        ContextConfig::new()
            .set_modules(ModuleTable::builtin().with_module(&raw::MODULE))
            .set_client_codecs_paths(vec![])
    )
}

/// Build a DIB file, header bytes past the 40 byte header are zero
pub fn synthesize_bmp(entry: &TestEntry) -> Vec<u8> {
    let offset = 14 + entry.header_size + entry.palette.len() as u32 * 4;
    let file_size = offset + entry.stored.len() as u32;

    let mut out = vec![];
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&offset.to_le_bytes());

    out.extend_from_slice(&entry.header_size.to_le_bytes());
    out.extend_from_slice(&entry.width.to_le_bytes());
    out.extend_from_slice(&entry.height.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&entry.bit_count.to_le_bytes());
    out.extend_from_slice(&entry.compression.to_le_bytes());
    out.extend_from_slice(&(entry.stored.len() as u32).to_le_bytes());
    out.extend_from_slice(&2835_i32.to_le_bytes());
    out.extend_from_slice(&2835_i32.to_le_bytes());
    out.extend_from_slice(&(entry.palette.len() as u32).to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.resize(14 + entry.header_size as usize, 0);

    for color in &entry.palette {
        out.extend_from_slice(color);
    }
    out.extend_from_slice(&entry.stored);
    out
}

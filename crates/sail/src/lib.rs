/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An extensible image codec host
//!
//! Image formats are handled by codec modules, each described by a
//! `.codec.info` descriptor. This crate finds the descriptors, loads codecs
//! on demand and drives them through load and save sessions.
//!
//! # Example
//! ```no_run
//! use sail::Context;
//!
//! let context = Context::new();
//! let image = context.load_from_file("image.bmp").unwrap();
//!
//! println!("{}x{} {}", image.width, image.height, image.pixel_format);
//! ```
//!
//! # Features
//! - `bmp`: Link the BMP codec into the process image. Enabled by default
//! - `log`: Log through the `log` crate. Enabled by default
//! - `serde-support`: Serialize core data structures
//!
//! # Codec discovery
//! In combined mode (the default) descriptors come from the modules linked into
//! the process, see [`ModuleTable`]. Otherwise descriptors are read from
//! `SAIL_CODECS_PATH` or the install location. Directories in
//! `SAIL_MY_CODECS_PATH` are scanned in both modes.
#![macro_use]

pub use sail_core::{ErrorKind, SailError, SailResult};

pub use crate::config::{ContextConfig, ContextFlags};
pub use crate::context::Context;
pub use crate::descriptor::{CodecInfo, CodecPriority};
pub use crate::loader::{Codec, LoadEntries, ModuleTable, SaveEntries};
pub use crate::magic::{MagicNumber, MAGIC_BUFFER_SIZE};
pub use crate::session::{LoadSession, SaveSession};

pub mod config;
mod context;
pub mod descriptor;
mod loader;
pub mod magic;
pub mod session;

/// The shared vocabulary of hosts and codecs
pub use sail_core;

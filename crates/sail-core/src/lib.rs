/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the sail host and codecs
//!
//! This crate provides the vocabulary both sides of the codec
//! boundary agree on
//!
//! It currently contains
//!
//! - An I/O abstraction with file, memory and expanding-buffer backends
//!   and endian aware readers and writers on top of it
//! - Pixel formats, compressions, codec feature flags and orientation
//! - The image frame handed between the host and a codec
//! - Load and save options with codec specific tuning
//! - The versioned codec entry point layout
//! - The error taxonomy shared by every crate in the family
//!
//! # Features
//!  - `log`: Forward the macros in [`log`](crate::log) to the `log` crate.
//!     Enabled by default.
//!
//!  - `serde-support`: Enables serializing of some of the data structures
//!     present in the crate
//!
#![macro_use]

pub mod bytestream;
pub mod common;
pub mod errors;
pub mod features;
pub mod image;
pub mod layout;
pub mod log;
pub mod options;
pub mod pixel_format;
pub mod serde;

pub use crate::errors::{ErrorKind, SailError, SailResult};

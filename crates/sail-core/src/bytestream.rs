/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The I/O abstraction consumed by every codec
//!
//! Codecs never see files or buffers directly, they talk to a
//! [`SailIoTrait`] implementation, which may be
//!
//! - [`FileIo`]: backed by a file on disk
//! - [`MemoryIo`]: a bounds tracked view over a caller owned buffer
//! - [`ExpandingBufferIo`]: a write target that grows as needed
//! - anything a caller implements the trait for
//!
//! [`SailReader`] and [`SailWriter`] add endian aware helpers on top.
pub use expanding_io::ExpandingBufferIo;
pub use file_io::FileIo;
pub use memory_io::MemoryIo;
pub use reader::{SailIoError, SailReader, SailSeekFrom};
pub use traits::{IoFeatures, SailIoTrait};
pub use writer::SailWriter;

mod expanding_io;
mod file_io;
mod memory_io;
mod reader;
mod traits;
mod writer;

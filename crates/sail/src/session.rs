/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Load and save sessions
//!
//! A session drives one codec over one stream
//!
//! ```text
//! start -> next_frame/write_frame (repeated) -> stop
//! ```
//!
//! Sessions opened from a path own the stream and close it on stop,
//! sessions given a stream only borrow it. Dropping a session stops it.
pub use load::LoadSession;
pub use save::SaveSession;

mod load;
mod save;

use sail_core::bytestream::SailIoTrait;
use sail_core::log::error;
use sail_core::{SailError, SailResult};

/// Close a stream the session opened, keeping the first error
fn close_owned(io: &mut dyn SailIoTrait, owns_io: bool, result: SailResult<()>) -> SailResult<()> {
    if !owns_io {
        return result;
    }
    match (result, io.close()) {
        (Err(err), Err(close_err)) => {
            error!("Failed to close {}: {}", io.name(), close_err);
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), close_result) => close_result.map_err(Into::into)
    }
}

/// Close a stream the session opened after a failed start
///
/// The stream must not outlive the failure, a close error is only logged.
fn abandon(io: &mut dyn SailIoTrait, owns_io: bool, err: SailError) -> SailError {
    if owns_io {
        if let Err(close_err) = io.close() {
            error!("Failed to close {}: {}", io.name(), close_err);
        }
    }
    err
}

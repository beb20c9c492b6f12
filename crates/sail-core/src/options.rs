/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Load and save options
//!
//! Options are handed to a codec when a session starts. Beside a few
//! common knobs they carry codec specific tuning, a map of string keys to
//! [`Variant`] values the codec may interpret as it sees fit.
//!
//! Keys a codec doesn't know are ignored.

use std::collections::BTreeMap;

pub use load::LoadOptions;
pub use save::SaveOptions;

mod load;
mod save;

/// A dynamically typed value
///
/// Used for tuning values and for format specific properties
/// reported by codecs
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    Bool(bool),
    Int(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Data(Vec<u8>)
}

impl Variant {
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(value) => Some(*value),
            _ => None
        }
    }
    /// Return the value as a signed integer, unsigned values that fit are converted
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Variant::Int(value) => Some(*value),
            Variant::Unsigned(value) => i64::try_from(*value).ok(),
            _ => None
        }
    }
    /// Return the value as an unsigned integer, non negative signed values are converted
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Variant::Unsigned(value) => Some(*value),
            Variant::Int(value) => u64::try_from(*value).ok(),
            _ => None
        }
    }
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Variant::Float(value) => Some(*value),
            _ => None
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(value) => Some(value),
            _ => None
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Int(value)
    }
}

impl From<u64> for Variant {
    fn from(value: u64) -> Self {
        Variant::Unsigned(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

/// Codec specific tuning, ordered by key
pub type Tuning = BTreeMap<String, Variant>;

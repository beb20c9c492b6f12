/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Context configuration
//!
//! Search paths come from, in order of preference,
//! the values set on [`ContextConfig`], the `SAIL_CODECS_PATH` and
//! `SAIL_MY_CODECS_PATH` environment variables and the
//! build time default.
use std::path::PathBuf;
use std::sync::OnceLock;

use bitflags::bitflags;

use crate::loader::ModuleTable;

/// Environment variable overriding the main codecs directories
pub const CODECS_PATH_ENV: &str = "SAIL_CODECS_PATH";
/// Environment variable adding client codecs directories
pub const MY_CODECS_PATH_ENV: &str = "SAIL_MY_CODECS_PATH";

/// Directory searched when no override is present
///
/// Packagers may set `SAIL_CODECS_DEFAULT_PATH` at build time
pub const DEFAULT_CODECS_PATH: &str = match option_env!("SAIL_CODECS_DEFAULT_PATH") {
    Some(path) => path,
    None => "/usr/local/lib/sail/codecs"
};

bitflags! {
    /// Context initialization flags
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ContextFlags: u32 {
        /// Load every codec while initializing the context
        const PRELOAD_CODECS  = 1 << 0;
        /// Codecs are linked into the process image,
        /// descriptors are read from the modules instead of the disk
        const COMBINED_CODECS = 1 << 1;
    }
}

impl Default for ContextFlags {
    fn default() -> Self {
        ContextFlags::COMBINED_CODECS
    }
}

/// Split a `;` separated list of directories, empty entries are dropped
pub fn split_search_path(list: &str) -> Vec<PathBuf> {
    list.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

// environment lookups happen once per process
fn env_codecs_path() -> Option<&'static str> {
    static VALUE: OnceLock<Option<String>> = OnceLock::new();

    VALUE
        .get_or_init(|| std::env::var(CODECS_PATH_ENV).ok())
        .as_deref()
}

fn env_my_codecs_path() -> Option<&'static str> {
    static VALUE: OnceLock<Option<String>> = OnceLock::new();

    VALUE
        .get_or_init(|| std::env::var(MY_CODECS_PATH_ENV).ok())
        .as_deref()
}

/// Options for creating a [`Context`](crate::Context)
///
/// # Example
/// ```
/// use sail::{ContextConfig, ModuleTable};
///
/// let config = ContextConfig::new()
///     .set_combined(false)
///     .set_codecs_paths(vec!["/opt/codecs".into()])
///     .set_modules(ModuleTable::builtin());
///
/// assert!(!config.is_combined());
/// ```
#[derive(Clone, Debug)]
pub struct ContextConfig {
    flags:               ContextFlags,
    codecs_paths:        Option<Vec<PathBuf>>,
    client_codecs_paths: Option<Vec<PathBuf>>,
    modules:             ModuleTable
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            flags:               ContextFlags::default(),
            codecs_paths:        None,
            client_codecs_paths: None,
            modules:             ModuleTable::builtin()
        }
    }
}

impl ContextConfig {
    pub fn new() -> ContextConfig {
        ContextConfig::default()
    }

    pub const fn get_flags(&self) -> ContextFlags {
        self.flags
    }

    pub fn set_flags(mut self, flags: ContextFlags) -> Self {
        self.flags = flags;
        self
    }

    pub const fn is_preload(&self) -> bool {
        self.flags.contains(ContextFlags::PRELOAD_CODECS)
    }

    /// Load every codec up front
    pub fn set_preload(mut self, yes: bool) -> Self {
        self.flags.set(ContextFlags::PRELOAD_CODECS, yes);
        self
    }

    pub const fn is_combined(&self) -> bool {
        self.flags.contains(ContextFlags::COMBINED_CODECS)
    }

    /// Read descriptors from linked modules instead of scanning directories
    pub fn set_combined(mut self, yes: bool) -> Self {
        self.flags.set(ContextFlags::COMBINED_CODECS, yes);
        self
    }

    /// Replace the main codecs directories
    ///
    /// Ignored in combined mode
    pub fn set_codecs_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.codecs_paths = Some(paths);
        self
    }

    /// Replace the client codecs directories
    pub fn set_client_codecs_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.client_codecs_paths = Some(paths);
        self
    }

    /// Set the modules the loader may bind
    pub fn set_modules(mut self, modules: ModuleTable) -> Self {
        self.modules = modules;
        self
    }

    pub const fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    pub(crate) fn into_modules(self) -> ModuleTable {
        self.modules
    }

    /// Main codecs directories after applying overrides
    pub fn codecs_paths(&self) -> Vec<PathBuf> {
        if let Some(paths) = &self.codecs_paths {
            return paths.clone();
        }
        match env_codecs_path() {
            Some(list) => split_search_path(list),
            None => split_search_path(DEFAULT_CODECS_PATH)
        }
    }

    /// Client codecs directories after applying overrides
    pub fn client_codecs_paths(&self) -> Vec<PathBuf> {
        if let Some(paths) = &self.client_codecs_paths {
            return paths.clone();
        }
        env_my_codecs_path()
            .map(split_search_path)
            .unwrap_or_default()
    }
}

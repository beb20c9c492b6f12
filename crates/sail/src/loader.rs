/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Binding codec modules
//!
//! A [`ModuleTable`] lists the modules present in the process image.
//! [`Codec::load`] finds the module a descriptor names, checks its layout
//! and resolves every entry point by its versioned symbol name.
use std::fmt::{Debug, Formatter};

use sail_core::layout::{
    symbol_name, CodecModule, EntryPoint, LoadFinishFn, LoadFrameFn, LoadInitFn,
    LoadSeekNextFrameFn, LoadSeekNextPassFn, SaveFinishFn, SaveFrameFn, SaveInitFn,
    SaveSeekNextFrameFn, SaveSeekNextPassFn, Stage, SUPPORTED_LAYOUT
};
use sail_core::log::{debug, error, trace};
use sail_core::{SailError, SailResult};

use crate::descriptor::CodecInfo;

/// Codec modules the loader may bind
#[derive(Clone, Default)]
pub struct ModuleTable {
    modules: Vec<&'static CodecModule>
}

impl ModuleTable {
    /// A table without modules
    pub fn new() -> ModuleTable {
        ModuleTable::default()
    }

    /// Modules compiled into this build
    pub fn builtin() -> ModuleTable {
        #[allow(unused_mut)]
        let mut table = ModuleTable::new();

        #[cfg(feature = "bmp")]
        {
            table.register(&sail_bmp::MODULE);
        }
        table
    }

    pub fn with_module(mut self, module: &'static CodecModule) -> ModuleTable {
        self.register(module);
        self
    }

    /// Add a module, replacing a module of the same name
    pub fn register(&mut self, module: &'static CodecModule) {
        self.modules
            .retain(|known| !known.name.eq_ignore_ascii_case(module.name));
        self.modules.push(module);
    }

    /// Find a module by codec name, case insensitive
    pub fn find(&self, name: &str) -> Option<&'static CodecModule> {
        self.modules
            .iter()
            .copied()
            .find(|module| module.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CodecModule> + '_ {
        self.modules.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Debug for ModuleTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.modules.iter().map(|module| module.name))
            .finish()
    }
}

/// Resolved loading entry points
#[derive(Copy, Clone)]
pub struct LoadEntries {
    pub init:            LoadInitFn,
    pub seek_next_frame: LoadSeekNextFrameFn,
    /// Absent when the module doesn't export it
    pub seek_next_pass:  Option<LoadSeekNextPassFn>,
    pub frame:           LoadFrameFn,
    pub finish:          LoadFinishFn
}

/// Resolved saving entry points
#[derive(Copy, Clone)]
pub struct SaveEntries {
    pub init:            SaveInitFn,
    pub seek_next_frame: SaveSeekNextFrameFn,
    pub seek_next_pass:  Option<SaveSeekNextPassFn>,
    pub frame:           SaveFrameFn,
    pub finish:          SaveFinishFn
}

/// A loaded codec, its descriptor and bound entry points
///
/// Sessions keep the codec alive while they run, it is unloaded
/// when the last reference goes away.
pub struct Codec {
    info: CodecInfo,
    load: LoadEntries,
    save: SaveEntries
}

fn find_symbol(module: &CodecModule, stage: Stage, name: &str) -> Option<EntryPoint> {
    let symbol = symbol_name(stage, SUPPORTED_LAYOUT, name);

    let entry = module.find_symbol(&symbol);
    trace!("Resolving {}: {}", symbol, entry.is_some());
    entry.filter(|entry| entry.stage() == stage)
}

fn resolve(module: &CodecModule, stage: Stage, name: &str) -> SailResult<EntryPoint> {
    find_symbol(module, stage, name).ok_or_else(|| {
        let symbol = symbol_name(stage, SUPPORTED_LAYOUT, name);
        error!("Failed to resolve '{}' in the {} codec", symbol, name);

        SailError::CodecSymbolResolve(symbol)
    })
}

macro_rules! bind {
    ($module:expr, $name:expr, $variant:ident) => {
        match resolve($module, Stage::$variant, $name)? {
            EntryPoint::$variant(entry) => entry,
            _ => {
                return Err(SailError::CodecSymbolResolve(symbol_name(
                    Stage::$variant,
                    SUPPORTED_LAYOUT,
                    $name
                )))
            }
        }
    };
}

macro_rules! bind_optional {
    ($module:expr, $name:expr, $variant:ident) => {
        match find_symbol($module, Stage::$variant, $name) {
            Some(EntryPoint::$variant(entry)) => Some(entry),
            _ => None
        }
    };
}

impl Codec {
    /// Bind the module described by `info`
    ///
    /// # Errors
    /// - [`SailError::UnsupportedCodecLayout`] if the descriptor targets another layout
    /// - [`SailError::CodecLoad`] if the module file or module is missing
    /// - [`SailError::CodecNotFound`] if no linked module carries the codec
    /// - [`SailError::CodecSymbolResolve`] if a required entry point is missing
    pub fn load(info: &CodecInfo, modules: &ModuleTable) -> SailResult<Codec> {
        let name = info.name();

        if info.layout() != SUPPORTED_LAYOUT {
            error!(
                "Unsupported layout version {} of the {} codec, expected {}",
                info.layout(),
                name,
                SUPPORTED_LAYOUT
            );
            return Err(SailError::UnsupportedCodecLayout(info.layout()));
        }
        if let Some(path) = info.path() {
            if !path.is_file() {
                error!("Codec module {} is missing", path.display());

                return Err(SailError::CodecLoad {
                    name:   name.to_string(),
                    reason: format!("module file {} does not exist", path.display())
                });
            }
        }
        let module = match (modules.find(name), info.path()) {
            (Some(module), _) => module,
            (None, None) => return Err(SailError::CodecNotFound(name.to_string())),
            (None, Some(path)) => {
                error!("Codec module {} is not present in the process image", path.display());

                return Err(SailError::CodecLoad {
                    name:   name.to_string(),
                    reason: format!("module {} is not present in the process image", path.display())
                });
            }
        };
        debug!("Loading the {} codec", name);

        let load = LoadEntries {
            init:            bind!(module, name, LoadInit),
            seek_next_frame: bind!(module, name, LoadSeekNextFrame),
            seek_next_pass:  bind_optional!(module, name, LoadSeekNextPass),
            frame:           bind!(module, name, LoadFrame),
            finish:          bind!(module, name, LoadFinish)
        };
        let save = SaveEntries {
            init:            bind!(module, name, SaveInit),
            seek_next_frame: bind!(module, name, SaveSeekNextFrame),
            seek_next_pass:  bind_optional!(module, name, SaveSeekNextPass),
            frame:           bind!(module, name, SaveFrame),
            finish:          bind!(module, name, SaveFinish)
        };

        Ok(Codec {
            info: info.clone(),
            load,
            save
        })
    }

    pub const fn info(&self) -> &CodecInfo {
        &self.info
    }

    pub const fn load_entries(&self) -> &LoadEntries {
        &self.load
    }

    pub const fn save_entries(&self) -> &SaveEntries {
        &self.save
    }
}

impl Debug for Codec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.info.name())
            .field("version", &self.info.version())
            .finish()
    }
}

impl Drop for Codec {
    fn drop(&mut self) {
        debug!("Unloading the {} codec", self.info.name());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The codec registry
//!
//! A [`Context`] discovers codec descriptors once, keeps them sorted by
//! priority and loads codecs on demand. Loaded codecs are cached until
//! [`Context::unload_all`] or until the context is dropped.
//!
//! Each thread is expected to create its own context, nothing here is global.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use sail_core::bytestream::{FileIo, MemoryIo, SailIoTrait};
use sail_core::image::Image;
use sail_core::log::{debug, error, info, trace};
use sail_core::{SailError, SailResult};

use crate::config::{ContextConfig, ContextFlags};
use crate::descriptor::{CodecInfo, DESCRIPTOR_SUFFIX};
use crate::loader::{Codec, ModuleTable};
use crate::magic::{read_magic, MAGIC_BUFFER_SIZE};
use crate::session::LoadSession;

/// Registry of codecs available to this process
///
/// # Example
/// ```no_run
/// use sail::Context;
///
/// let context = Context::new();
/// let info = context.resolve_by_extension("bmp").unwrap();
/// let codec = context.load_handle(info).unwrap();
///
/// assert_eq!(codec.info().name(), "BMP");
/// ```
pub struct Context {
    /// Sorted by priority, `CodecInfo::index` is the position here
    codecs:  Vec<CodecInfo>,
    modules: ModuleTable,
    flags:   ContextFlags,
    cache:   Mutex<HashMap<usize, Arc<Codec>>>
}

/// Read every `*.codec.info` file in `dir`
fn scan_directory(dir: &Path, codecs: &mut Vec<CodecInfo>) {
    debug!("Looking for codecs in {}", dir.display());

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Skipping {}: {}", dir.display(), err);
            return;
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(DESCRIPTOR_SUFFIX))
        })
        .collect();
    // directory order is unspecified
    files.sort();

    for file in files {
        match read_descriptor(&file) {
            Ok(info) => {
                trace!("Found the {} codec in {}", info.name(), file.display());
                codecs.push(info);
            }
            Err(err) => {
                error!("Skipping codec descriptor {}: {}", file.display(), err);
            }
        }
    }
}

fn read_descriptor(file: &Path) -> SailResult<CodecInfo> {
    let text = fs::read_to_string(file).map_err(|err| SailError::OpenFile {
        path:   file.to_path_buf(),
        source: err
    })?;
    let info = CodecInfo::parse(&text, &file.to_string_lossy())?;

    Ok(info.with_path(module_path(file)))
}

/// `dir/sail-codec-bmp.codec.info` is served by `dir/sail-codec-bmp.so`
fn module_path(descriptor: &Path) -> PathBuf {
    let file_name = descriptor
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(DESCRIPTOR_SUFFIX)
        .unwrap_or(file_name);

    descriptor.with_file_name(format!("{stem}.{}", std::env::consts::DLL_EXTENSION))
}

fn discover(config: &ContextConfig) -> Vec<CodecInfo> {
    let mut codecs = Vec::new();

    if config.is_combined() {
        for module in config.modules().iter() {
            let source_name = format!("{} (built-in)", module.name);

            match CodecInfo::parse(module.descriptor, &source_name) {
                Ok(info) => codecs.push(info),
                Err(err) => error!("Skipping codec descriptor {}: {}", source_name, err)
            }
        }
    } else {
        for dir in config.codecs_paths() {
            scan_directory(&dir, &mut codecs);
        }
    }
    for dir in config.client_codecs_paths() {
        scan_directory(&dir, &mut codecs);
    }
    codecs
}

impl Context {
    /// Create a context with the default configuration
    ///
    /// Discovery failures are logged, a context without codecs
    /// is still usable and resolves nothing.
    pub fn new() -> Context {
        Context::new_with_config(ContextConfig::default())
    }

    pub fn new_with_config(config: ContextConfig) -> Context {
        let start = Instant::now();

        let mut codecs = discover(&config);
        // stable, codecs of one tier keep their discovery order
        codecs.sort_by_key(|info| info.priority());

        for (index, info) in codecs.iter_mut().enumerate() {
            info.index = index;
        }
        if codecs.is_empty() {
            error!("No codecs were found");
        } else {
            info!("Enumerated codecs:");
            for info in &codecs {
                info!(
                    "{}. [p{}] {} [{}] {}",
                    info.index + 1,
                    info.priority() as u8,
                    info.name(),
                    info.description(),
                    info.version()
                );
            }
        }
        let flags = config.get_flags();
        let context = Context {
            codecs,
            modules: config.into_modules(),
            flags,
            cache: Mutex::new(HashMap::new())
        };

        if flags.contains(ContextFlags::PRELOAD_CODECS) {
            context.preload();
        }
        debug!(
            "Initialized the context in {} ms",
            start.elapsed().as_millis()
        );
        context
    }

    fn preload(&self) {
        debug!("Preloading codecs");

        for info in &self.codecs {
            // a broken codec must not take the others down
            if let Err(err) = self.load_handle(info) {
                error!("Failed to preload the {} codec: {}", info.name(), err);
            }
        }
    }

    pub const fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Every discovered codec, highest priority first
    pub fn codec_infos(&self) -> &[CodecInfo] {
        &self.codecs
    }

    /// Find a codec by one of its extensions, a leading `.` is ignored
    pub fn resolve_by_extension(&self, extension: &str) -> SailResult<&CodecInfo> {
        self.codecs
            .iter()
            .find(|info| info.matches_extension(extension))
            .ok_or_else(|| SailError::CodecNotFound(format!("extension '{extension}'")))
    }

    pub fn resolve_by_mime_type(&self, mime_type: &str) -> SailResult<&CodecInfo> {
        self.codecs
            .iter()
            .find(|info| info.matches_mime_type(mime_type))
            .ok_or_else(|| SailError::CodecNotFound(format!("mime type '{mime_type}'")))
    }

    pub fn resolve_by_name(&self, name: &str) -> SailResult<&CodecInfo> {
        self.codecs
            .iter()
            .find(|info| info.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SailError::CodecNotFound(name.to_string()))
    }

    /// Find a codec by the extension of `path`
    ///
    /// The file is not touched.
    pub fn resolve_by_path<P: AsRef<Path>>(&self, path: P) -> SailResult<&CodecInfo> {
        let extension = path
            .as_ref()
            .extension()
            .ok_or(SailError::InvalidArgument("path has no extension"))?
            .to_str()
            .ok_or(SailError::InvalidArgument("path extension is not valid UTF-8"))?;

        self.resolve_by_extension(extension)
    }

    /// Find a codec by the magic number at the current position of `io`
    ///
    /// The position of `io` is restored afterwards, the stream must be seekable.
    pub fn resolve_by_magic(&self, io: &mut dyn SailIoTrait) -> SailResult<&CodecInfo> {
        let mut buffer = [0; MAGIC_BUFFER_SIZE];
        let read = read_magic(io, &mut buffer)?;

        self.resolve_by_magic_bytes(&buffer[..read])
    }

    /// Find a codec whose magic number matches the start of `data`
    pub fn resolve_by_magic_bytes(&self, data: &[u8]) -> SailResult<&CodecInfo> {
        let data = &data[..data.len().min(MAGIC_BUFFER_SIZE)];

        self.codecs
            .iter()
            .find(|info| info.matches_magic(data))
            .ok_or_else(|| {
                let hex = data
                    .iter()
                    .map(|byte| format!("{byte:02x}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                debug!("No codec matches the magic number {}", hex);

                SailError::CodecNotFound(format!("magic number '{hex}'"))
            })
    }

    /// Open `path` and find a codec by its magic number
    pub fn resolve_by_file_magic<P: AsRef<Path>>(&self, path: P) -> SailResult<&CodecInfo> {
        let mut io = FileIo::open_for_reading(path)?;

        let result = self.resolve_by_magic(&mut io);
        io.close()?;

        result
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<usize, Arc<Codec>>> {
        // the map is consistent between statements, a panic elsewhere can't break it
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the loaded codec for `info`, loading it on first use
    ///
    /// Concurrent callers observe one load per codec. `info` must describe
    /// a codec of this context, either a reference from
    /// [`codec_infos`](Self::codec_infos) or the copy a loaded [`Codec`]
    /// carries.
    pub fn load_handle(&self, info: &CodecInfo) -> SailResult<Arc<Codec>> {
        let known = self
            .codecs
            .get(info.index)
            .filter(|known| known.name() == info.name() && known.path() == info.path())
            .ok_or(SailError::InvalidArgument(
                "codec info does not belong to this context"
            ))?;

        let mut cache = self.lock_cache();

        if let Some(codec) = cache.get(&known.index) {
            return Ok(Arc::clone(codec));
        }
        let codec = Arc::new(Codec::load(known, &self.modules)?);
        cache.insert(known.index, Arc::clone(&codec));

        Ok(codec)
    }

    /// Whether the codec for `info` is currently cached
    pub fn is_loaded(&self, info: &CodecInfo) -> bool {
        self.lock_cache().contains_key(&info.index)
    }

    /// Drop every cached codec
    ///
    /// Descriptors stay, the next [`load_handle`](Self::load_handle) loads
    /// again. Running sessions keep their codec until they finish.
    pub fn unload_all(&self) {
        debug!("Unloading cached codecs");

        self.lock_cache().clear();
    }

    /// Decode the first frame of the file at `path`
    ///
    /// The codec is picked by the magic number of the file.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> SailResult<Image> {
        let path = path.as_ref();
        let info = self.resolve_by_file_magic(path)?;
        let codec = self.load_handle(info)?;

        let mut session = LoadSession::start_file(codec, path, None)?;
        let image = session.next_frame()?;
        session.stop()?;

        Ok(image)
    }

    /// Decode the first frame of an in-memory image
    pub fn load_from_memory(&self, data: &[u8]) -> SailResult<Image> {
        let info = self.resolve_by_magic_bytes(data)?;
        let codec = self.load_handle(info)?;

        let mut io = MemoryIo::new_read(data);
        let mut session = LoadSession::start_io(codec, &mut io, None)?;
        let image = session.next_frame()?;
        session.stop()?;

        Ok(image)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        trace!("Destroying the context");
    }
}

#[cfg(test)]
mod tests {
    use sail_core::bytestream::SailSeekFrom;

    use super::*;

    fn empty_context() -> Context {
        Context::new_with_config(
            ContextConfig::new()
                .set_modules(ModuleTable::new())
                .set_client_codecs_paths(vec![])
        )
    }

    #[test]
    fn module_paths_replace_the_suffix() {
        let path = module_path(Path::new("/codecs/sail-codec-bmp.codec.info"));
        let expected = format!("/codecs/sail-codec-bmp.{}", std::env::consts::DLL_EXTENSION);

        assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn empty_context_resolves_nothing() {
        let context = empty_context();

        assert!(context.codec_infos().is_empty());
        assert!(matches!(
            context.resolve_by_extension("bmp"),
            Err(SailError::CodecNotFound(_))
        ));
        assert!(matches!(
            context.resolve_by_path("image"),
            Err(SailError::InvalidArgument(_))
        ));
    }

    #[test]
    fn foreign_infos_are_rejected() {
        let context = empty_context();
        let info = CodecInfo::parse(
            "[codec]\nlayout=8\nversion=1\nname=X\ndescription=x\nextensions=x",
            "x"
        )
        .unwrap();

        assert!(matches!(
            context.load_handle(&info),
            Err(SailError::InvalidArgument(_))
        ));
    }

    #[cfg(feature = "bmp")]
    #[test]
    fn builtin_bmp_is_resolvable() {
        let context = Context::new_with_config(ContextConfig::new().set_client_codecs_paths(vec![]));

        let by_ext = context.resolve_by_extension(".DIB").unwrap();
        let by_mime = context.resolve_by_mime_type("image/bmp").unwrap();
        assert!(std::ptr::eq(by_ext, by_mime));

        let data = b"BM\x00\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00\x28\x00";
        let mut io = MemoryIo::new_read(data);
        io.seek(SailSeekFrom::Start(0)).unwrap();
        assert_eq!(context.resolve_by_magic(&mut io).unwrap().name(), "BMP");
        assert_eq!(io.tell().unwrap(), 0);

        let first = context.load_handle(by_ext).unwrap();
        let second = context.load_handle(by_ext).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        context.unload_all();
        assert!(!context.is_loaded(by_ext));
        let third = context.load_handle(by_ext).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[cfg(feature = "bmp")]
    #[test]
    fn loaded_codecs_hand_back_their_info() {
        let context = Context::new_with_config(ContextConfig::new().set_client_codecs_paths(vec![]));
        let codec = context.load_handle(context.resolve_by_name("BMP").unwrap()).unwrap();

        // the codec holds its own copy of the descriptor
        let again = context.load_handle(codec.info()).unwrap();
        assert!(Arc::ptr_eq(&codec, &again));

        // same slot, different codec
        let other = CodecInfo::parse(
            "[codec]\nlayout=8\nversion=1\nname=X\ndescription=x\nextensions=x",
            "x"
        )
        .unwrap();
        assert_eq!(other.index, codec.info().index);
        assert!(matches!(
            context.load_handle(&other),
            Err(SailError::InvalidArgument(_))
        ));
    }
}

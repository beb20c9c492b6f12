/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use crate::bytestream::reader::{SailIoError, SailSeekFrom};
use crate::bytestream::traits::{IoFeatures, SailIoTrait};
use crate::errors::{SailError, SailResult};
use crate::log::debug;

enum FileHandle {
    Reader(BufReader<File>),
    Writer(BufWriter<File>)
}

/// A file backed stream
///
/// Files are opened either for reading or for writing, the other half of
/// the operations fail with [`SailIoError::Unsupported`].
pub struct FileIo {
    handle: Option<FileHandle>,
    path:   PathBuf
}

impl FileIo {
    /// Open an existing file for reading
    pub fn open_for_reading<P: AsRef<Path>>(path: P) -> SailResult<FileIo> {
        let path = path.as_ref();
        debug!("Opening file {:?} for reading", path);

        let file = File::open(path).map_err(|source| SailError::OpenFile {
            path: path.to_path_buf(),
            source
        })?;

        Ok(FileIo {
            handle: Some(FileHandle::Reader(BufReader::new(file))),
            path:   path.to_path_buf()
        })
    }
    /// Create (or truncate) a file for writing
    pub fn open_for_writing<P: AsRef<Path>>(path: P) -> SailResult<FileIo> {
        let path = path.as_ref();
        debug!("Opening file {:?} for writing", path);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| SailError::OpenFile {
                path: path.to_path_buf(),
                source
            })?;

        Ok(FileIo {
            handle: Some(FileHandle::Writer(BufWriter::new(file))),
            path:   path.to_path_buf()
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn handle(&mut self) -> Result<&mut FileHandle, SailIoError> {
        self.handle.as_mut().ok_or(SailIoError::Closed)
    }
}

impl SailIoTrait for FileIo {
    fn tolerant_read(&mut self, buf: &mut [u8]) -> Result<usize, SailIoError> {
        let FileHandle::Reader(reader) = self.handle()? else {
            return Err(SailIoError::Unsupported("read from a file opened for writing"));
        };
        if buf.is_empty() {
            return Ok(0);
        }
        // a single read may return less than is available, keep going
        // until the buffer is full or the file ends
        let mut total = 0;
        while total < buf.len() {
            match reader.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(read) => total += read,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(SailIoError::from(e))
            }
        }
        if total == 0 {
            return Err(SailIoError::Eof);
        }
        Ok(total)
    }

    fn tolerant_write(&mut self, buf: &[u8]) -> Result<usize, SailIoError> {
        let FileHandle::Writer(writer) = self.handle()? else {
            return Err(SailIoError::Unsupported("write to a file opened for reading"));
        };
        // a file has no capacity limit, anything short is an error
        writer.write_all(buf)?;
        Ok(buf.len())
    }

    fn seek(&mut self, from: SailSeekFrom) -> Result<u64, SailIoError> {
        let position = match (self.handle()?, from) {
            // keeps the read buffer, row padding skips stay in memory
            (FileHandle::Reader(reader), SailSeekFrom::Current(offset)) => {
                reader.seek_relative(offset)?;
                reader.stream_position()?
            }
            (FileHandle::Reader(reader), _) => reader.seek(from.to_std_seek())?,
            (FileHandle::Writer(writer), _) => writer.seek(from.to_std_seek())?
        };
        Ok(position)
    }

    fn tell(&mut self) -> Result<u64, SailIoError> {
        let position = match self.handle()? {
            FileHandle::Reader(reader) => reader.stream_position()?,
            FileHandle::Writer(writer) => writer.stream_position()?
        };
        Ok(position)
    }

    fn flush(&mut self) -> Result<(), SailIoError> {
        match self.handle()? {
            FileHandle::Reader(_) => Ok(()),
            FileHandle::Writer(writer) => writer.flush().map_err(SailIoError::from)
        }
    }

    fn close(&mut self) -> Result<(), SailIoError> {
        match self.handle.take() {
            None => Err(SailIoError::Closed),
            Some(FileHandle::Reader(_)) => Ok(()),
            Some(FileHandle::Writer(mut writer)) => writer.flush().map_err(SailIoError::from)
        }
    }

    fn eof(&mut self) -> Result<bool, SailIoError> {
        match self.handle()? {
            FileHandle::Reader(reader) => reader
                .fill_buf()
                .map(|b| b.is_empty())
                .map_err(SailIoError::from),
            FileHandle::Writer(writer) => {
                let position = writer.stream_position()?;
                writer.flush()?;
                let length = writer.get_ref().metadata()?.len();
                Ok(position >= length)
            }
        }
    }

    fn features(&self) -> IoFeatures {
        IoFeatures::SEEKABLE
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");

        let mut writer = FileIo::open_for_writing(&path).unwrap();
        writer.strict_write(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(writer.tell().unwrap(), 5);
        writer.close().unwrap();

        let mut reader = FileIo::open_for_reading(&path).unwrap();
        reader.seek(SailSeekFrom::Start(3)).unwrap();

        let mut out = [0; 8];
        assert_eq!(reader.tolerant_read(&mut out).unwrap(), 2);
        assert_eq!(&out[..2], &[4, 5]);
        assert!(reader.eof().unwrap());
        assert!(matches!(reader.tolerant_read(&mut out), Err(SailIoError::Eof)));
    }

    #[test]
    fn relative_seeks_within_the_read_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.bin");
        std::fs::write(&path, [10, 11, 12, 13, 14, 15, 16, 17]).unwrap();

        let mut reader = FileIo::open_for_reading(&path).unwrap();
        let mut byte = [0; 1];
        reader.strict_read(&mut byte).unwrap();

        assert_eq!(reader.seek(SailSeekFrom::Current(3)).unwrap(), 4);
        reader.strict_read(&mut byte).unwrap();
        assert_eq!(byte, [14]);

        assert_eq!(reader.seek(SailSeekFrom::Current(-4)).unwrap(), 1);
        reader.strict_read(&mut byte).unwrap();
        assert_eq!(byte, [11]);

        // past the end of the file
        assert_eq!(reader.seek(SailSeekFrom::Current(20)).unwrap(), 22);
        assert!(reader.strict_read(&mut byte).is_err());
        assert!(reader.seek(SailSeekFrom::Current(-30)).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bmp");

        match FileIo::open_for_reading(&path) {
            Err(SailError::OpenFile { path: reported, .. }) => assert_eq!(reported, path),
            _ => panic!("expected an open error")
        }
    }

    #[test]
    fn closed_file_rejects_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut reader = FileIo::open_for_reading(&path).unwrap();
        reader.close().unwrap();
        let mut out = [0; 1];
        assert!(matches!(reader.strict_read(&mut out), Err(SailIoError::Closed)));
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

// BMP is a format that has been extended multiple times, the decoder
// follows the header revisions
//
// DDB (V1)
// - `02 00` identifier, then a 14 byte bitmap header: type, width, height,
//   bytes per row (|byte_width|), planes, bit count and a pixel pointer that must be zero.
// - No colour table, the system palette is used. Rows are stored top-down.
//
// DIB V2 (OS/2, Windows 2.x)
// - 14 byte file header with the `BM` magic and the absolute offset of the pixel data.
// - 12 byte info header with 16 bit width and height.
// - Colour table of 1 << bit_count entries, 3 bytes each (BGR).
//
// DIB V3
// - 40 byte info header, 32 bit signed width and height, compression,
//   resolution and the number of colours used.
// - Colour table entries are 4 bytes (BGR0), |colors_used| of them or 1 << bit_count.
//
// DIB V4 and V5
// - 108 and 124 byte headers adding masks, colour space, gamma and for V5
//   the location of an ICC profile relative to the start of the info header.
//
// A positive height means rows are stored bottom-up, a negative height top-down.
// Rows are padded to 4 bytes, except for DDBs which pad to |byte_width|.

use sail_core::bytestream::{SailIoTrait, SailReader, SailSeekFrom};
use sail_core::common::{Compression, Orientation, Resolution, ResolutionUnit, SailOptions};
use sail_core::image::{Iccp, Image, Palette, SourceImage};
use sail_core::log::{debug, trace, warn};
use sail_core::options::{LoadOptions, Variant};
use sail_core::pixel_format::PixelFormat;

use crate::common::{
    BmpCompression, BmpVersion, DdbBitmap, DibFileHeader, DibHeaderV2, DibHeaderV3, DibHeaderV4,
    DibHeaderV5, DDB_IDENTIFIER, DIB_HEADER_V2_SIZE, DIB_HEADER_V3_SIZE, DIB_HEADER_V4_SIZE,
    DIB_HEADER_V5_SIZE, DIB_IDENTIFIER, PROFILE_EMBEDDED
};
use crate::rle::decode_rle;
use crate::utils::{bit_count_to_pixel_format, bytes_in_row, pad_bytes, system_palette};
use crate::BmpDecoderErrors;

/// Name of the special property telling whether rows were stored bottom-up
pub const BOTTOM_UP_PROPERTY: &str = "bmp-bottom-up";
/// Name of the special property carrying the header revision
pub const VERSION_PROPERTY: &str = "bmp-version";

/// Probe some bytes to see
/// if they consist of a BMP image
pub fn probe_bmp(bytes: &[u8]) -> bool {
    if let Some(magic_bytes) = bytes.get(0..2) {
        if magic_bytes == b"BM" {
            // skip file_size   -> 4
            // skip reserved    -> 4
            // skip data offset -> 4
            // read header size
            if let Some(size) = bytes.get(14..18) {
                let size = u32::from_le_bytes([size[0], size[1], size[2], size[3]]);

                return size == DIB_HEADER_V2_SIZE
                    || size == DIB_HEADER_V3_SIZE
                    || size == DIB_HEADER_V4_SIZE
                    || size == DIB_HEADER_V5_SIZE;
            }
        } else if magic_bytes == [2, 0] {
            // ddb: type must be zero, planes one
            if let (Some(kind), Some(planes), Some(bits)) =
                (bytes.get(2..4), bytes.get(10), bytes.get(11))
            {
                return kind == [0, 0] && *planes == 1 && matches!(bits, 1 | 4 | 8);
            }
        }
    }
    false
}

/// Everything known about a BMP image once its headers are read
///
/// Parsing leaves the stream somewhere after the colour table,
/// [`seek_to_pixels`](Self::seek_to_pixels) positions it for reading rows.
#[derive(Clone, Debug)]
pub(crate) struct BmpHeaders {
    pub(crate) version:             BmpVersion,
    /// Stream position of the first byte of the file
    base:                           u64,
    file_header:                    Option<DibFileHeader>,
    ddb:                            DdbBitmap,
    v2:                             DibHeaderV2,
    v3:                             DibHeaderV3,
    v4:                             DibHeaderV4,
    v5:                             DibHeaderV5,
    pub(crate) width:               u32,
    pub(crate) height:              u32,
    pub(crate) bit_count:           u16,
    pub(crate) compression:         BmpCompression,
    pub(crate) bottom_up:           bool,
    pub(crate) source_pixel_format: PixelFormat,
    /// RGB entries
    palette:                        Vec<[u8; 3]>,
    iccp:                           Option<Vec<u8>>,
    bytes_in_row:                   u32,
    pad_bytes:                      u32
}

impl BmpHeaders {
    /// Read and validate every header and the colour table
    pub(crate) fn parse<T: SailIoTrait>(
        reader: &mut SailReader<T>, options: &LoadOptions
    ) -> Result<BmpHeaders, BmpDecoderErrors> {
        let base = reader.position()?;

        let mut headers = BmpHeaders {
            version: BmpVersion::V3,
            base,
            file_header: None,
            ddb: DdbBitmap::default(),
            v2: DibHeaderV2::default(),
            v3: DibHeaderV3::default(),
            v4: DibHeaderV4::default(),
            v5: DibHeaderV5::default(),
            width: 0,
            height: 0,
            bit_count: 0,
            compression: BmpCompression::RGB,
            bottom_up: false,
            source_pixel_format: PixelFormat::Unknown,
            palette: vec![],
            iccp: None,
            bytes_in_row: 0,
            pad_bytes: 0
        };

        let magic = reader.get_u16_le_err()?;

        match magic {
            DDB_IDENTIFIER => {
                headers.version = BmpVersion::V1;
                headers.ddb = read_ddb_bitmap(reader)?;
                headers.check_ddb()?;
            }
            DIB_IDENTIFIER => {
                headers.file_header = Some(read_dib_file_header(reader)?);
                headers.read_dib_headers(reader, options)?;
                headers.check_dib()?;
            }
            _ => return Err(BmpDecoderErrors::InvalidMagicBytes(magic))
        }
        headers.source_pixel_format = bit_count_to_pixel_format(headers.bit_count)?;

        if headers.width == 0 || headers.height == 0 {
            return Err(BmpDecoderErrors::ZeroDimensions(headers.width, headers.height));
        }
        if headers.width as usize > options.get_max_width() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "width",
                options.get_max_width(),
                headers.width as usize
            ));
        }
        if headers.height as usize > options.get_max_height() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "height",
                options.get_max_height(),
                headers.height as usize
            ));
        }

        if headers.version < BmpVersion::V3 {
            debug!("BMP: Version({:?})", headers.version);
        } else {
            debug!(
                "BMP: Version({:?}), compression({:?})",
                headers.version, headers.compression
            );
        }
        trace!("Width: {}", headers.width);
        trace!("Height: {}", headers.height);
        trace!("Bit count: {}", headers.bit_count);

        headers.read_palette(reader)?;

        headers.bytes_in_row = bytes_in_row(headers.width, headers.bit_count)?;

        if headers.version == BmpVersion::V1 {
            let byte_width = u32::from(headers.ddb.byte_width);
            headers.pad_bytes = byte_width.checked_sub(headers.bytes_in_row).ok_or(
                BmpDecoderErrors::GenericStatic("DDB byte width is smaller than a row")
            )?;
        } else {
            headers.pad_bytes = pad_bytes(headers.bytes_in_row);
        }

        Ok(headers)
    }

    fn read_dib_headers<T: SailIoTrait>(
        &mut self, reader: &mut SailReader<T>, options: &LoadOptions
    ) -> Result<(), BmpDecoderErrors> {
        let offset_of_bitmap_header = reader.position()?;

        self.v2 = read_v2(reader)?;

        match self.v2.size {
            DIB_HEADER_V2_SIZE => {
                self.version = BmpVersion::V2;
            }
            DIB_HEADER_V3_SIZE => {
                self.version = BmpVersion::V3;
                self.v3 = read_v3(reader)?;
            }
            DIB_HEADER_V4_SIZE => {
                self.version = BmpVersion::V4;
                self.v3 = read_v3(reader)?;
                self.v4 = read_v4(reader)?;
            }
            DIB_HEADER_V5_SIZE => {
                self.version = BmpVersion::V5;
                self.v3 = read_v3(reader)?;
                self.v4 = read_v4(reader)?;
                self.v5 = read_v5(reader)?;

                if self.v4.color_space_type == PROFILE_EMBEDDED
                    && options.get_options().contains(SailOptions::ICCP)
                {
                    let profile_at = offset_of_bitmap_header + u64::from(self.v5.profile_data);
                    self.iccp = Some(read_iccp(reader, profile_at, self.v5.profile_size)?);
                    // colour table follows the header
                    reader.seek(SailSeekFrom::Start(
                        offset_of_bitmap_header + u64::from(self.v2.size)
                    ))?;
                }
            }
            size => return Err(BmpDecoderErrors::UnknownHeaderSize(size))
        }

        // If the height is negative, the bitmap is top-to-bottom.
        self.bottom_up = self.v2.height > 0;
        self.width = u32::try_from(self.v2.width)
            .map_err(|_| BmpDecoderErrors::GenericStatic("Negative image width"))?;
        self.height = self.v2.height.unsigned_abs();
        self.bit_count = self.v2.bit_count;

        if self.version >= BmpVersion::V3 {
            self.compression = BmpCompression::from_u32(self.v3.compression);
        }
        Ok(())
    }

    fn check_ddb(&mut self) -> Result<(), BmpDecoderErrors> {
        if self.ddb.kind != 0 {
            return Err(BmpDecoderErrors::GenericStatic("DDB type must always be 0"));
        }
        if self.ddb.planes != 1 {
            return Err(BmpDecoderErrors::GenericStatic("DDB planes must always be 1"));
        }
        if self.ddb.pixels != 0 {
            return Err(BmpDecoderErrors::GenericStatic("DDB pixels must always be 0"));
        }
        if !matches!(self.ddb.bit_count, 1 | 4 | 8) {
            return Err(BmpDecoderErrors::GenericStatic("DDB bpp must be 1, 4, or 8"));
        }
        self.width = u32::from(self.ddb.width);
        self.height = u32::from(self.ddb.height);
        self.bit_count = u16::from(self.ddb.bit_count);
        self.bottom_up = false;

        Ok(())
    }

    fn check_dib(&self) -> Result<(), BmpDecoderErrors> {
        if self.version < BmpVersion::V3 {
            return Ok(());
        }
        let bit_count = self.bit_count;

        match self.compression {
            BmpCompression::BITFIELDS if bit_count != 16 && bit_count != 32 => Err(
                BmpDecoderErrors::InvalidCompression(
                    "BitFields compression is allowed only for 16 or 32 bpp"
                )
            ),
            BmpCompression::BITFIELDS => Err(BmpDecoderErrors::UnsupportedCompression(
                self.v3.compression
            )),
            BmpCompression::Unknown(value) => Err(BmpDecoderErrors::UnsupportedCompression(value)),
            BmpCompression::RLE4 if bit_count != 4 => Err(BmpDecoderErrors::InvalidCompression(
                "RLE4 compression must only be used with 4 bpp"
            )),
            BmpCompression::RLE8 if bit_count != 8 => Err(BmpDecoderErrors::InvalidCompression(
                "RLE8 compression must only be used with 8 bpp"
            )),
            _ => Ok(())
        }
    }

    fn read_palette<T: SailIoTrait>(
        &mut self, reader: &mut SailReader<T>
    ) -> Result<(), BmpDecoderErrors> {
        if self.version == BmpVersion::V1 {
            self.palette = system_palette(self.ddb.bit_count)?;
            return Ok(());
        }
        if self.bit_count >= 16 {
            return Ok(());
        }
        let max_colors = 1_u32 << self.bit_count;

        let colors = if self.version == BmpVersion::V2 || self.v3.colors_used == 0 {
            max_colors
        } else {
            self.v3.colors_used
        };

        if colors == 0 {
            return Err(BmpDecoderErrors::MissingPalette);
        }
        if colors > max_colors {
            warn!(
                "BMP: {} palette entries declared for a {} bpp image",
                colors, self.bit_count
            );
            if colors > 256 {
                return Err(BmpDecoderErrors::GenericStatic("Too many palette entries"));
            }
        }
        self.palette.reserve_exact(colors as usize);

        for _ in 0..colors {
            // stored as BGR, V3 and later add a reserved byte
            let [b, g, r] = reader.read_fixed_bytes_or_error::<3>()?;
            if self.version != BmpVersion::V2 {
                reader.get_u8_err()?;
            }
            self.palette.push([r, g, b]);
        }
        trace!("Palette entries: {}", self.palette.len());

        Ok(())
    }

    /// Size of a single output row
    pub(crate) fn bytes_per_line(&self) -> u32 {
        if self.compression == BmpCompression::RLE4 {
            // expanded to one index per byte
            self.bytes_in_row * 2
        } else {
            self.bytes_in_row
        }
    }

    pub(crate) fn pixel_format(&self) -> PixelFormat {
        if self.compression == BmpCompression::RLE4 {
            PixelFormat::Bpp8Indexed
        } else {
            self.source_pixel_format
        }
    }

    /// Create the image description, pixels are left empty
    pub(crate) fn image_skeleton(&self) -> Image {
        let mut special_properties = std::collections::BTreeMap::new();
        special_properties.insert(BOTTOM_UP_PROPERTY.to_string(), Variant::Bool(self.bottom_up));
        special_properties.insert(
            VERSION_PROPERTY.to_string(),
            Variant::Unsigned(u64::from(self.version.as_u32()))
        );

        let source_image = SourceImage {
            pixel_format: self.source_pixel_format,
            compression: if self.compression.is_rle() {
                Compression::Rle
            } else {
                Compression::None
            },
            // rows are always delivered top-down
            orientation: Orientation::Normal,
            interlaced: false,
            special_properties
        };

        let palette = (!self.palette.is_empty()).then(|| Palette {
            pixel_format: PixelFormat::Bpp24Rgb,
            color_count:  self.palette.len() as u32,
            data:         self.palette.iter().flatten().copied().collect()
        });

        let resolution = (self.version >= BmpVersion::V3).then(|| {
            Resolution::new(
                ResolutionUnit::Meter,
                f64::from(self.v3.x_pixels_per_meter),
                f64::from(self.v3.y_pixels_per_meter)
            )
        });

        Image {
            width: self.width,
            height: self.height,
            bytes_per_line: self.bytes_per_line(),
            pixel_format: self.pixel_format(),
            palette,
            delay: None,
            interlaced_passes: 1,
            resolution,
            iccp: self.iccp.clone().map(|data| Iccp { data }),
            source_image: Some(source_image),
            pixels: vec![]
        }
    }

    /// Position the stream on the first stored row
    pub(crate) fn seek_to_pixels<T: SailIoTrait>(
        &self, reader: &mut SailReader<T>
    ) -> Result<(), BmpDecoderErrors> {
        // ddb pixels follow the header directly
        if let Some(file_header) = self.file_header {
            reader.seek(SailSeekFrom::Start(self.base + u64::from(file_header.offset)))?;
        }
        Ok(())
    }

    /// Read all rows into `pixels`, top row first
    ///
    /// `stride` is the distance between output rows and must hold at
    /// least [`bytes_per_line`](Self::bytes_per_line) bytes.
    pub(crate) fn read_pixels<T: SailIoTrait>(
        &self, reader: &mut SailReader<T>, pixels: &mut [u8], stride: usize
    ) -> Result<(), BmpDecoderErrors> {
        let height = self.height as usize;
        let row_size = self.bytes_per_line() as usize;

        if stride < row_size {
            return Err(BmpDecoderErrors::TooSmallBuffer(row_size, stride));
        }
        let needed = stride
            .checked_mul(height)
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?;

        if pixels.len() < needed {
            return Err(BmpDecoderErrors::TooSmallBuffer(needed, pixels.len()));
        }
        let pixels = &mut pixels[..needed];

        if self.compression.is_rle() {
            return decode_rle(
                reader,
                self.compression,
                self.width as usize,
                self.bottom_up,
                pixels,
                stride
            );
        }
        let bytes_in_row = self.bytes_in_row as usize;

        for stored_row in 0..height {
            let y = if self.bottom_up {
                height - 1 - stored_row
            } else {
                stored_row
            };
            let start = y * stride;
            reader.read_exact_bytes(&mut pixels[start..start + bytes_in_row])?;

            if self.pad_bytes != 0 {
                reader.skip(self.pad_bytes as usize)?;
            }
        }
        Ok(())
    }
}

fn read_ddb_bitmap<T: SailIoTrait>(
    reader: &mut SailReader<T>
) -> Result<DdbBitmap, BmpDecoderErrors> {
    Ok(DdbBitmap {
        kind:       reader.get_u16_le_err()?,
        width:      reader.get_u16_le_err()?,
        height:     reader.get_u16_le_err()?,
        byte_width: reader.get_u16_le_err()?,
        planes:     reader.get_u8_err()?,
        bit_count:  reader.get_u8_err()?,
        pixels:     reader.get_u32_le_err()?
    })
}

fn read_dib_file_header<T: SailIoTrait>(
    reader: &mut SailReader<T>
) -> Result<DibFileHeader, BmpDecoderErrors> {
    let size = reader.get_u32_le_err()?;
    // reserved1 and reserved2
    reader.skip(4)?;
    let offset = reader.get_u32_le_err()?;

    Ok(DibFileHeader { size, offset })
}

fn read_v2<T: SailIoTrait>(reader: &mut SailReader<T>) -> Result<DibHeaderV2, BmpDecoderErrors> {
    let size = reader.get_u32_le_err()?;

    let (width, height) = if size == DIB_HEADER_V2_SIZE {
        // unsigned 16 bit dimensions, rows are always bottom-up
        let width = reader.get_u16_le_err()?;
        let height = reader.get_u16_le_err()?;
        (i32::from(width), i32::from(height))
    } else {
        (reader.get_i32_le_err()?, reader.get_i32_le_err()?)
    };

    Ok(DibHeaderV2 {
        size,
        width,
        height,
        planes: reader.get_u16_le_err()?,
        bit_count: reader.get_u16_le_err()?
    })
}

fn read_v3<T: SailIoTrait>(reader: &mut SailReader<T>) -> Result<DibHeaderV3, BmpDecoderErrors> {
    Ok(DibHeaderV3 {
        compression:        reader.get_u32_le_err()?,
        bitmap_size:        reader.get_u32_le_err()?,
        x_pixels_per_meter: reader.get_i32_le_err()?,
        y_pixels_per_meter: reader.get_i32_le_err()?,
        colors_used:        reader.get_u32_le_err()?,
        colors_important:   reader.get_u32_le_err()?
    })
}

fn read_v4<T: SailIoTrait>(reader: &mut SailReader<T>) -> Result<DibHeaderV4, BmpDecoderErrors> {
    let mut header = DibHeaderV4 {
        red_mask: reader.get_u32_le_err()?,
        green_mask: reader.get_u32_le_err()?,
        blue_mask: reader.get_u32_le_err()?,
        alpha_mask: reader.get_u32_le_err()?,
        color_space_type: reader.read_fixed_bytes_or_error::<4>()?,
        ..DibHeaderV4::default()
    };
    // the colour space type is stored as a little endian fourcc
    header.color_space_type.reverse();

    for endpoint in header.endpoints.iter_mut() {
        *endpoint = reader.get_i32_le_err()?;
    }
    for gamma in header.gamma.iter_mut() {
        *gamma = reader.get_u32_le_err()?;
    }
    Ok(header)
}

fn read_v5<T: SailIoTrait>(reader: &mut SailReader<T>) -> Result<DibHeaderV5, BmpDecoderErrors> {
    Ok(DibHeaderV5 {
        intent:       reader.get_u32_le_err()?,
        profile_data: reader.get_u32_le_err()?,
        profile_size: reader.get_u32_le_err()?,
        reserved:     reader.get_u32_le_err()?
    })
}

fn read_iccp<T: SailIoTrait>(
    reader: &mut SailReader<T>, position: u64, size: u32
) -> Result<Vec<u8>, BmpDecoderErrors> {
    let stream_length = reader.seek(SailSeekFrom::End(0))?;
    let profile_end = position
        .checked_add(u64::from(size))
        .ok_or(BmpDecoderErrors::OverFlowOccurred)?;

    if profile_end > stream_length {
        return Err(BmpDecoderErrors::TooLargeDimensions(
            "ICC profile",
            usize::try_from(stream_length.saturating_sub(position)).unwrap_or(usize::MAX),
            size as usize
        ));
    }
    reader.seek(SailSeekFrom::Start(position))?;

    let mut data = Vec::new();
    data.try_reserve_exact(size as usize)
        .map_err(|_| BmpDecoderErrors::Generic(format!("Cannot allocate {size} bytes for ICC profile")))?;
    data.resize(size as usize, 0);

    reader.read_exact_bytes(&mut data)?;
    trace!("ICC profile: {} bytes", size);

    Ok(data)
}

/// A BMP decoder.
///
/// # Usage
/// The decoder can be used to read image information and or get the pixels out of a valid bmp
/// image.
///
/// Pixels are returned as stored, indexed images stay indexed and come with
/// their palette, rows are always top-down.
///
/// ## Extracting image metadata
/// ```no_run
/// use sail_bmp::BmpDecoder;
/// use sail_core::bytestream::MemoryIo;
///
/// fn main() -> Result<(), sail_bmp::BmpDecoderErrors> {
///     let data = std::fs::read("image.bmp").unwrap();
///     let mut decoder = BmpDecoder::new(MemoryIo::new_read(&data));
///     decoder.decode_headers()?;
///     // after decoding headers, we can safely access the image metadata
///     let (w, h) = decoder.dimensions().unwrap();
///     println!("Image width: {}\t Image height: {}", w, h);
///     println!("Pixel format: {}", decoder.pixel_format().unwrap());
///     Ok(())
/// }
/// ```
///
/// ## Just getting the pixels
///
/// ```no_run
/// use sail_bmp::BmpDecoder;
/// use sail_core::bytestream::FileIo;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut decoder = BmpDecoder::new(FileIo::open_for_reading("image.bmp")?);
///     let image = decoder.decode()?;
///     println!("Pixels length:{}", image.pixels.len());
///     Ok(())
/// }
/// ```
pub struct BmpDecoder<T>
where
    T: SailIoTrait
{
    bytes:   SailReader<T>,
    options: LoadOptions,
    headers: Option<BmpHeaders>
}

impl<T> BmpDecoder<T>
where
    T: SailIoTrait
{
    /// Create a new bmp decoder that reads data from
    /// `data`
    pub fn new(data: T) -> BmpDecoder<T> {
        BmpDecoder::new_with_options(data, LoadOptions::default())
    }

    /// Create a new decoder instance with specified options
    pub fn new_with_options(data: T, options: LoadOptions) -> BmpDecoder<T> {
        BmpDecoder {
            bytes: SailReader::new(data),
            options,
            headers: None
        }
    }

    /// Decode headers stored in the bmp file and store
    /// information in the decode context
    ///
    /// After calling this, most information fields will be filled
    /// except the actual decoding bytes
    pub fn decode_headers(&mut self) -> Result<(), BmpDecoderErrors> {
        if self.headers.is_some() {
            return Ok(());
        }
        self.headers = Some(BmpHeaders::parse(&mut self.bytes, &self.options)?);
        Ok(())
    }

    /// Get dimensions of the image
    ///
    /// Returns `None` if headers weren't decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.headers
            .as_ref()
            .map(|h| (h.width as usize, h.height as usize))
    }

    /// Pixel format of the decoded pixels
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.headers.as_ref().map(BmpHeaders::pixel_format)
    }

    /// Header revision of the file
    pub fn version(&self) -> Option<BmpVersion> {
        self.headers.as_ref().map(|h| h.version)
    }

    /// Image description without pixels
    pub fn image_info(&self) -> Option<Image> {
        self.headers.as_ref().map(BmpHeaders::image_skeleton)
    }

    /// Return the expected size of the output buffer
    ///
    /// Returns `None` if headers haven't been decoded or if calculation overflows
    pub fn output_buf_size(&self) -> Option<usize> {
        let headers = self.headers.as_ref()?;
        (headers.bytes_per_line() as usize).checked_mul(headers.height as usize)
    }

    /// Decode an image returning it with allocated pixels
    pub fn decode(&mut self) -> Result<Image, BmpDecoderErrors> {
        self.decode_headers()?;

        let size = self
            .output_buf_size()
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?;

        let mut image = self
            .image_info()
            .ok_or(BmpDecoderErrors::GenericStatic("Headers were not decoded"))?;
        image.pixels = vec![0; size];

        self.decode_into(&mut image.pixels)?;

        Ok(image)
    }

    /// Decode an encoded image into a buffer or return an error
    /// if something bad occurred
    pub fn decode_into(&mut self, buf: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        self.decode_headers()?;

        let headers = self
            .headers
            .as_ref()
            .ok_or(BmpDecoderErrors::GenericStatic("Headers were not decoded"))?;

        headers.seek_to_pixels(&mut self.bytes)?;
        headers.read_pixels(
            &mut self.bytes,
            buf,
            headers.bytes_per_line() as usize
        )
    }
}

//! Outer container handling
//!
//! `WaypointData.dat` may be stored as raw NBT or wrapped in GZIP, ZLIB or a
//! ZIP archive depending on the JourneyMap version and on how the file was
//! copied around. The wrapper is detected from magic bytes, never from the
//! file extension.

use flate2::read::{MultiGzDecoder, ZlibDecoder};
use std::fmt;
use std::io::{Cursor, Read};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::config::ZipEntryMatch;
use crate::error::{Error, Result};
use crate::utils::hex_preview;

/// Number of leading bytes inspected for magic numbers
pub const SNIFF_LEN: usize = 12;

/// Container formats recognised by [`ContainerFormat::detect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Already-decoded bytes
    Raw,
    /// `1F 8B`
    Gzip,
    /// `PK`
    Zip,
    /// `78 ??`
    Zlib,
}

impl ContainerFormat {
    pub fn detect(data: &[u8]) -> Self {
        let head = &data[..data.len().min(SNIFF_LEN)];
        if head.starts_with(&[0x1F, 0x8B]) {
            ContainerFormat::Gzip
        } else if head.len() >= 4 && head.starts_with(b"PK") {
            ContainerFormat::Zip
        } else if head.len() >= 2 && head[0] == 0x78 {
            ContainerFormat::Zlib
        } else {
            ContainerFormat::Raw
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerFormat::Raw => "raw",
            ContainerFormat::Gzip => "gzip",
            ContainerFormat::Zip => "zip",
            ContainerFormat::Zlib => "zlib",
        };
        f.write_str(name)
    }
}

/// Decompressed payload and the container it actually came from
#[derive(Debug, Clone)]
pub struct Container {
    /// `Raw` when a ZLIB-looking input failed to inflate
    pub format: ContainerFormat,
    pub data: Vec<u8>,
}

/// Strip the outer container and return the fully drained payload
pub fn decompress(data: &[u8], entry: &ZipEntryMatch) -> Result<Vec<u8>> {
    open(data, entry).map(|c| c.data)
}

/// Like [`decompress`] but also reports the resolved format
pub fn open(data: &[u8], entry: &ZipEntryMatch) -> Result<Container> {
    debug!("First bytes: {}", hex_preview(&data[..data.len().min(SNIFF_LEN)]));

    let format = ContainerFormat::detect(data);
    match format {
        ContainerFormat::Gzip => {
            debug!("Detected GZIP");
            let mut decoder = MultiGzDecoder::new(data);
            let mut out = Vec::with_capacity(data.len() * 4);
            decoder
                .read_to_end(&mut out)
                .map_err(|e| Error::Decompression(format!("GZIP error: {}", e)))?;
            Ok(Container { format, data: out })
        }
        ContainerFormat::Zip => {
            debug!("Detected ZIP");
            Ok(Container {
                format,
                data: read_zip_entry(data, entry)?,
            })
        }
        ContainerFormat::Zlib => {
            debug!("Detected ZLIB/DEFLATE");
            let mut decoder = ZlibDecoder::new(data);
            let mut out = Vec::with_capacity(data.len() * 4);
            match decoder.read_to_end(&mut out) {
                Ok(_) => Ok(Container { format, data: out }),
                Err(e) => {
                    warn!("Inflate failed, falling back to raw: {}", e);
                    Ok(Container {
                        format: ContainerFormat::Raw,
                        data: data.to_vec(),
                    })
                }
            }
        }
        ContainerFormat::Raw => {
            debug!("Treating as raw NBT");
            Ok(Container {
                format,
                data: data.to_vec(),
            })
        }
    }
}

/// First entry in directory order whose name matches wins
fn read_zip_entry(data: &[u8], entry_match: &ZipEntryMatch) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        debug!("ZIP entry: {}", entry.name());
        if entry.is_dir() || !entry_match.matches(entry.name()) {
            continue;
        }

        // declared size is untrusted input
        let mut out = Vec::with_capacity(entry.size().min(data.len() as u64 * 4) as usize);
        entry
            .read_to_end(&mut out)
            .map_err(|e| Error::Decompression(format!("ZIP entry {}: {}", entry.name(), e)))?;
        return Ok(out);
    }

    Err(Error::ContainerFormat(format!(
        "ZIP did not contain {}",
        entry_match.file_name
    )))
}

//! NBT (Named Binary Tag) decoding
//!
//! NBT is the tagged binary tree format Minecraft and its mods use for
//! persisted data. JourneyMap stores its waypoints in `WaypointData.dat` as a
//! single NBT document.
//!
//! ## Format Overview
//!
//! Every value is framed big-endian:
//! - A document is one named TAG_Compound (id 10)
//! - Scalars: Byte, Short, Int, Long, Float, Double (fixed width)
//! - String: u16 length + UTF-8 bytes
//! - ByteArray / IntArray / LongArray: i32 length + fixed-width elements
//! - List: element tag id + i32 length + homogeneous payloads
//! - Compound: `(tag id, name, payload)*` terminated by TAG_End (id 0)
//!
//! ## Example
//!
//! ```rust,no_run
//! use waypoint_dump::nbt;
//!
//! let data = std::fs::read("WaypointData.dat")?;
//! let root = nbt::decode(&data)?;
//! for key in root.compound().into_iter().flat_map(|m| m.keys()) {
//!     println!("{}", key);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod reader;
mod types;
#[cfg(test)]
pub(crate) mod writer;

pub use reader::{decode, NbtReader, MAX_DEPTH};
pub use types::{Compound, NamedTag, Tag, TagType};

//! # waypoint-dump
//!
//! A Rust library for decoding JourneyMap `WaypointData.dat` files and turning
//! them into portable exports.
//!
//! ## Overview
//!
//! JourneyMap stores client-side waypoints as a binary NBT document, sometimes
//! wrapped in GZIP, ZLIB or a ZIP archive. This library provides:
//!
//! - Container detection and decompression (raw, GZIP, ZLIB, ZIP)
//! - A strict NBT decoder producing a typed [`Tag`] tree
//! - A schema-free [`Value`] view with a stable JSON-style text rendering
//! - Heuristic extraction of flat [`WaypointRecord`] rows and CSV output
//! - Generation of `/waypoint create` commands grouped by waypoint group
//!
//! ## Example - Exporting
//!
//! ```rust,no_run
//! use std::path::Path;
//! use waypoint_dump::{dump_waypoints, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let summary = dump_waypoints(
//!         Path::new("WaypointData.dat"),
//!         Path::new("export"),
//!         &Config::default(),
//!     )?;
//!     println!("{} waypoints, {} commands", summary.record_count, summary.command_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Decoding
//!
//! ```rust,no_run
//! use waypoint_dump::{decompress, nbt, to_generic, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let raw = std::fs::read("WaypointData.dat")?;
//!     let data = decompress(&raw, &config.zip_entry)?;
//!
//!     let root = nbt::decode(&data)?;
//!     print!("{}", to_generic(&root).to_pretty_string());
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod commands;
pub mod config;
pub mod container;
pub mod error;
pub mod export;
pub mod generic;
pub mod nbt;
pub mod records;
pub mod utils;

pub use color::{map_color, nearest_named};
pub use commands::{build_commands, render_commands, GroupedCommands};
pub use config::{Config, NamedColor, Palette, ZipEntryMatch};
pub use container::{decompress, ContainerFormat};
pub use error::{DecodeError, Error, Result};
pub use export::{derive_artifacts, dump_waypoints, inspect_file, Artifacts, ExportSummary};
pub use generic::{to_generic, Value};
pub use nbt::{NamedTag, Tag, TagType};
pub use records::{extract_records, to_csv, WaypointRecord};
pub use utils::title_case;

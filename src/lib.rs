//! Monochrome bitmap compiler
//!
//! This crate converts raster images into packed 1-bit bitmaps emitted as
//! static C arrays, either as standalone named constants or as an indexed
//! glyph table usable as a bitmap font.
//!
//! # Example
//!
//! ```rust,no_run
//! use c_bitmap::{convert_files, Config};
//! use std::path::Path;
//!
//! let config = Config::default();
//! convert_files(
//!     &[Path::new("smiley.png")],
//!     Path::new("bitmaps.c"),
//!     Path::new("bitmaps.h"),
//!     &config,
//! )
//! .unwrap();
//! ```

mod bitmap;
mod config;
mod emitter;
mod error;
mod glyph_table;
mod identifier;
mod utils;

#[cfg(test)]
mod testing;

use log::info;
use std::path::Path;

pub use crate::{
    bitmap::{BitmapRecord, NO_NAME},
    config::Config,
    emitter::{ensure_ascii, SourceEmitter},
    error::Error,
    glyph_table::{DirectorySource, GlyphSource, GlyphTable, MemorySource, EMPTY_BITMAP},
    identifier::{to_camel_case_identifier, uniquify_identifiers, DEFAULT_IDENTIFIER},
    utils::{aligned_width, pack_words, pad_to_alignment, threshold, unpack_words, BitGrid},
};

/// Row width granularity in pixels.
///
/// Every emitted bitmap is padded horizontally to a multiple of this, so
/// rows always start on a byte boundary.
pub const DEFAULT_ALIGNMENT: u32 = 8;

/// Number of slots in a glyph table, one per 7-bit character code.
pub const GLYPH_TABLE_SIZE: usize = 128;

/// Highest character code loaded from a glyph directory.
pub const MAX_GLYPH_CODE: u32 = 255;

/// Directory scanned by the font packager.
pub const GLYPH_DIR: &str = "./out/";

/// Output file written by the font packager.
pub const FONT_OUTPUT: &str = "depixel.c";

/// Convert every input image and write the definitions and declarations
/// units.
///
/// Any input that fails to load aborts the run before anything is written.
pub fn convert_files<P: AsRef<Path>>(
    inputs: &[P],
    c_output: &Path,
    h_output: &Path,
    config: &Config,
) -> Result<Vec<BitmapRecord>, Error> {
    config.validate()?;

    let records = inputs
        .iter()
        .map(|path| BitmapRecord::open(path, config))
        .collect::<Result<Vec<_>, _>>()?;
    info!("converted {} images", records.len());

    let records = uniquify_identifiers(records, config.is_unique_identifiers());
    SourceEmitter::new(config).write_outputs(c_output, h_output, &records)?;
    Ok(records)
}

/// Package the `<code>.png` glyph images of `dir` into a font table source.
pub fn package_font(dir: &Path, output: &Path, config: &Config) -> Result<GlyphTable, Error> {
    let source = DirectorySource::scan(dir)?;
    let table = GlyphTable::build(&source, config)?;
    table.write(&SourceEmitter::new(config), output)?;
    info!(
        "wrote {} of {} loaded glyphs to {:?}",
        table.slots().iter().filter(|slot| slot.is_some()).count(),
        table.glyphs().count(),
        output
    );
    Ok(table)
}

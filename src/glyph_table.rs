//! Packaging of per-glyph images into an indexed bitmap font table.

use image::DynamicImage;
use log::debug;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use crate::{
    bitmap::BitmapRecord,
    config::Config,
    emitter::{ensure_ascii, write_file, SourceEmitter},
    error::Error,
};

/// Placeholder emitted for table slots without a glyph.
pub const EMPTY_BITMAP: &str = "EMPTY_BITMAP";

/// Provider of glyph images keyed by character code.
pub trait GlyphSource {
    /// Character codes available, in scan order.
    fn codes(&self) -> Result<Vec<u32>, Error>;

    fn load(&self, code: u32) -> Result<DynamicImage, Error>;
}

/// Glyph images stored as `<code>.png` in one directory.
#[derive(Debug)]
pub struct DirectorySource {
    entries: Vec<(u32, PathBuf)>,
}

impl DirectorySource {
    /// List the directory. Files whose stem is not a non-negative integer
    /// are left out, as are codes too large for a `u32`. When several files
    /// name the same code, the last one listed wins.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "png") {
                continue;
            }

            let stem = path.file_stem().and_then(|stem| stem.to_str());
            match stem.map(parse_code) {
                Some(StemCode::Code(code)) => insert_entry(&mut entries, code, path),
                Some(StemCode::OutOfRange) => continue,
                _ => debug!("skipping {:?}: not a character code", path),
            }
        }

        Ok(DirectorySource { entries })
    }
}

#[derive(Debug, PartialEq)]
enum StemCode {
    Code(u32),
    OutOfRange,
    NotACode,
}

fn parse_code(stem: &str) -> StemCode {
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return StemCode::NotACode;
    }
    match stem.parse::<u32>() {
        Ok(code) => StemCode::Code(code),
        Err(_) => StemCode::OutOfRange,
    }
}

/// Keep one path per code, replacing the path of a code already listed
/// while keeping its position.
fn insert_entry(entries: &mut Vec<(u32, PathBuf)>, code: u32, path: PathBuf) {
    match entries.iter_mut().find(|(c, _)| *c == code) {
        Some(entry) => {
            debug!("{:?} replaces {:?} for code {}", path, entry.1, code);
            entry.1 = path;
        }
        None => entries.push((code, path)),
    }
}

impl GlyphSource for DirectorySource {
    fn codes(&self) -> Result<Vec<u32>, Error> {
        Ok(self.entries.iter().map(|(code, _)| *code).collect())
    }

    fn load(&self, code: u32) -> Result<DynamicImage, Error> {
        let path = self
            .entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, path)| path)
            .ok_or(Error::MissingGlyph(code))?;

        image::open(path).map_err(|source| Error::LoadImage {
            path: path.clone(),
            source,
        })
    }
}

/// In-memory glyph set, mostly useful for tests and generated glyphs.
#[derive(Debug, Default)]
pub struct MemorySource {
    codes: Vec<u32>,
    images: HashMap<u32, DynamicImage>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: u32, image: DynamicImage) {
        if self.images.insert(code, image).is_none() {
            self.codes.push(code);
        }
    }
}

impl GlyphSource for MemorySource {
    fn codes(&self) -> Result<Vec<u32>, Error> {
        Ok(self.codes.clone())
    }

    fn load(&self, code: u32) -> Result<DynamicImage, Error> {
        self.images.get(&code).cloned().ok_or(Error::MissingGlyph(code))
    }
}

///
/// Fixed-size table mapping character codes to glyph bitmaps.
///
/// Every code up to the configured maximum is loaded, but only codes below
/// the table size get a slot; the others are emitted as arrays only.
///
#[derive(Debug)]
pub struct GlyphTable {
    glyphs: BTreeMap<u32, BitmapRecord>,
    size: usize,
}

impl GlyphTable {
    pub fn build(source: &impl GlyphSource, config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let mut glyphs = BTreeMap::new();
        for code in source.codes()? {
            if code > config.get_max_glyph_code() {
                continue;
            }
            let image = source.load(code)?;
            let record = BitmapRecord::from_image(Some(&code.to_string()), &image, config)?;
            glyphs.insert(code, record);
        }

        Ok(GlyphTable {
            glyphs,
            size: config.get_table_size(),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn glyph(&self, code: u32) -> Option<&BitmapRecord> {
        self.glyphs.get(&code)
    }

    /// Glyph per slot, `None` for the empty ones.
    pub fn slots(&self) -> Vec<Option<&BitmapRecord>> {
        (0..self.size as u32).map(|code| self.glyph(code)).collect()
    }

    /// All loaded glyphs in ascending code order, including the ones
    /// outside of the table.
    pub fn glyphs(&self) -> impl Iterator<Item = &BitmapRecord> {
        self.glyphs.values()
    }

    /// Font source: preamble, one array per glyph, then the table.
    pub fn render(&self, emitter: &SourceEmitter) -> String {
        let config = emitter.config();
        let mut out = String::from(config.get_font_preamble());
        if !out.ends_with('\n') {
            out.push('\n');
        }

        for record in self.glyphs() {
            out.push('\n');
            out.push_str(&emitter.array_definition(record));
            out.push('\n');
        }

        out.push_str(&format!("\nBitMap {}[] = {{\n", config.get_table_name()));
        for slot in self.slots() {
            match slot {
                Some(record) => out.push_str(&emitter.struct_literal(record)),
                None => out.push_str(EMPTY_BITMAP),
            }
            out.push_str(",\n");
        }
        out.push_str("};\n");
        out
    }

    pub fn write(&self, emitter: &SourceEmitter, path: &Path) -> Result<(), Error> {
        let text = self.render(emitter);
        ensure_ascii(&path.to_string_lossy(), &text)?;
        write_file(path, &text)
    }
}

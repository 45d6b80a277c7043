use image::DynamicImage;
use log::debug;
use std::path::Path;

use crate::{
    config::Config,
    error::Error,
    identifier::to_camel_case_identifier,
    utils::{pack_words, pad_to_alignment, threshold, BitGrid},
};

/// Label used in diagnostics for records built without a name.
pub const NO_NAME: &str = "<no name>";

///
/// A named bitmap converted from one input image, ready for emission.
///
/// `width` is the padded width and always a multiple of the configured
/// alignment. `words` holds the packed pixels, `ceil(width * height / 32)`
/// of them.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapRecord {
    name: Option<String>,
    identifier: String,
    width: u32,
    height: u32,
    words: Vec<u32>,
}

impl BitmapRecord {
    /// Load an image file and convert it. The record is named after the
    /// file stem.
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());

        debug!("loading {:?}", path);
        let image = image::open(path).map_err(|source| Error::LoadImage {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_image(name.as_deref(), &image, config)
    }

    pub fn from_image(
        name: Option<&str>,
        image: &DynamicImage,
        config: &Config,
    ) -> Result<Self, Error> {
        Self::from_grid(name, &threshold(image), config)
    }

    /// Pad and pack an already thresholded grid.
    ///
    /// Fails with [`Error::InvalidConfig`] when the configured alignment
    /// would not keep rows byte aligned.
    pub fn from_grid(name: Option<&str>, grid: &BitGrid, config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let padded = pad_to_alignment(grid, config.get_alignment(), name);
        let words = pack_words(&padded);

        debug!(
            "{}: {}x{} with {} foreground pixels -> {}x{}, {} words",
            name.unwrap_or(NO_NAME),
            grid.width(),
            grid.height(),
            grid.count_foreground(),
            padded.width(),
            padded.height(),
            words.len()
        );

        Ok(BitmapRecord {
            name: name.map(str::to_string),
            identifier: to_camel_case_identifier(name.unwrap_or("")),
            width: padded.width(),
            height: padded.height(),
            words,
        })
    }

    /// Same bitmap under a different symbol name.
    pub fn with_identifier(self, identifier: String) -> Self {
        BitmapRecord { identifier, ..self }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for diagnostics, with a placeholder for unnamed records.
    pub fn label(&self) -> &str {
        self.name().unwrap_or(NO_NAME)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

use crate::error::Error;

const HEADER_PREAMBLE: &str = r#"
/**
 * @file bitmaps.h
 * @brief Declares external bitmap objects.
 */

#ifndef BITMAPS_H
#define BITMAPS_H

#include "bitmap.h"
#include "global.h"
#include "raster.h"
"#;

const HEADER_POSTAMBLE: &str = "#endif";

const FONT_PREAMBLE: &str = r#"
#include "../bitmap.h"
#include "../global.h"

#define EMPTY_BITMAP {(const u32 *)(0l), 0, 0}
"#;

/// Conversion and emission settings.
///
/// Built once and handed to every component by reference.
///
/// # Example
///
/// ```
/// use c_bitmap::Config;
///
/// let config = Config::default().alignment(16).unique_identifiers(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    alignment: u32,
    table_size: usize,
    max_glyph_code: u32,
    header_preamble: String,
    header_postamble: String,
    font_preamble: String,
    table_name: String,
    unique_identifiers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            alignment: crate::DEFAULT_ALIGNMENT,
            table_size: crate::GLYPH_TABLE_SIZE,
            max_glyph_code: crate::MAX_GLYPH_CODE,
            header_preamble: HEADER_PREAMBLE.to_string(),
            header_postamble: HEADER_POSTAMBLE.to_string(),
            font_preamble: FONT_PREAMBLE.to_string(),
            table_name: "depixel".to_string(),
            unique_identifiers: false,
        }
    }
}

impl Config {
    /// Row width granularity in pixels. Must be a non-zero multiple of 8.
    pub fn alignment(self, alignment: u32) -> Self {
        Config { alignment, ..self }
    }

    /// Number of slots in the glyph table.
    pub fn table_size(self, table_size: usize) -> Self {
        Config { table_size, ..self }
    }

    /// Glyph codes above this value are never loaded.
    pub fn max_glyph_code(self, max_glyph_code: u32) -> Self {
        Config {
            max_glyph_code,
            ..self
        }
    }

    pub fn header_preamble(self, text: &str) -> Self {
        Config {
            header_preamble: text.to_string(),
            ..self
        }
    }

    pub fn header_postamble(self, text: &str) -> Self {
        Config {
            header_postamble: text.to_string(),
            ..self
        }
    }

    pub fn font_preamble(self, text: &str) -> Self {
        Config {
            font_preamble: text.to_string(),
            ..self
        }
    }

    pub fn table_name(self, name: &str) -> Self {
        Config {
            table_name: name.to_string(),
            ..self
        }
    }

    /// Suffix colliding identifiers instead of emitting duplicate symbols.
    pub fn unique_identifiers(self, flag: bool) -> Self {
        Config {
            unique_identifiers: flag,
            ..self
        }
    }

    /// Check the settings against the constraints the packer and the
    /// glyph table rely on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.alignment == 0 || self.alignment % 8 != 0 {
            return Err(Error::InvalidConfig(format!(
                "alignment must be a non-zero multiple of 8, got {}",
                self.alignment
            )));
        }
        if self.table_size == 0 {
            return Err(Error::InvalidConfig(
                "glyph table size must not be zero".to_string(),
            ));
        }
        if self.table_size > self.max_glyph_code as usize + 1 {
            return Err(Error::InvalidConfig(format!(
                "glyph table size {} exceeds the code range 0..={}",
                self.table_size, self.max_glyph_code
            )));
        }
        if !self.table_name.is_ascii() || self.table_name.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "invalid table name {:?}",
                self.table_name
            )));
        }
        Ok(())
    }

    pub fn get_alignment(&self) -> u32 {
        self.alignment
    }

    pub fn get_table_size(&self) -> usize {
        self.table_size
    }

    pub fn get_max_glyph_code(&self) -> u32 {
        self.max_glyph_code
    }

    pub fn get_header_preamble(&self) -> &str {
        &self.header_preamble
    }

    pub fn get_header_postamble(&self) -> &str {
        &self.header_postamble
    }

    pub fn get_font_preamble(&self) -> &str {
        &self.font_preamble
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    pub fn is_unique_identifiers(&self) -> bool {
        self.unique_identifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.get_alignment(), 8);
        assert_eq!(config.get_table_size(), 128);
        assert_eq!(config.get_max_glyph_code(), 255);
        assert_eq!(config.get_table_name(), "depixel");
        assert!(!config.is_unique_identifiers());
        assert!(config.get_header_preamble().contains("#ifndef BITMAPS_H"));
        assert_eq!(config.get_header_postamble(), "#endif");
    }

    #[test]
    fn rejects_unaligned_alignment() {
        assert!(Config::default().alignment(0).validate().is_err());
        assert!(Config::default().alignment(12).validate().is_err());
        assert!(Config::default().alignment(32).validate().is_ok());
    }

    #[test]
    fn rejects_table_larger_than_code_range() {
        let config = Config::default().table_size(300);
        match config.validate() {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("300")),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(Config::default().table_size(0).validate().is_err());
    }
}

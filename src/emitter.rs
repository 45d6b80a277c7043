//! Rendering of bitmap records as C source.
//!
//! Every record becomes a static `u32` array named `_<identifier>` and a
//! `BitMap` constant named `<identifier>` pointing at it. The header unit
//! carries one `extern` declaration per record between the configured
//! preamble and postamble.

use log::{debug, info};
use std::{fs, path::Path};

use crate::{bitmap::BitmapRecord, config::Config, error::Error};

pub struct SourceEmitter<'a> {
    config: &'a Config,
}

impl<'a> SourceEmitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        SourceEmitter { config }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// `static const u32 _<ident>[<count>] = { <hex>, ... };`
    pub fn array_definition(&self, record: &BitmapRecord) -> String {
        let words = record
            .words()
            .iter()
            .map(|word| format!("{:#x}", word))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "static const u32 _{}[{}] = {{ {} }};",
            record.identifier(),
            record.words().len(),
            words
        )
    }

    /// `{ _<ident>,<width>,<height> }` without terminator.
    pub fn struct_literal(&self, record: &BitmapRecord) -> String {
        format!(
            "{{ _{},{},{} }}",
            record.identifier(),
            record.width(),
            record.height()
        )
    }

    pub fn definition(&self, record: &BitmapRecord) -> String {
        format!(
            "{}\nconst BitMap {} = {};\n",
            self.array_definition(record),
            record.identifier(),
            self.struct_literal(record)
        )
    }

    pub fn declaration(&self, record: &BitmapRecord) -> String {
        format!("extern const BitMap {};", record.identifier())
    }

    /// Definitions unit, starting with an include of `header_name`.
    pub fn render_definitions(&self, records: &[BitmapRecord], header_name: &str) -> String {
        let mut out = format!("#include \"{}\"\n", header_name);
        for record in records {
            out.push('\n');
            out.push_str(&self.definition(record));
        }
        out
    }

    /// Declarations unit wrapped in the configured preamble and postamble.
    pub fn render_declarations(&self, records: &[BitmapRecord]) -> String {
        let mut out = String::from(self.config.get_header_preamble());
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
        for record in records {
            out.push_str(&self.declaration(record));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(self.config.get_header_postamble());
        out.push('\n');
        out
    }

    /// Render both units and write them, definitions first.
    ///
    /// Both texts are checked before the first write, so an encoding
    /// failure leaves the disk untouched.
    pub fn write_outputs(
        &self,
        c_path: &Path,
        h_path: &Path,
        records: &[BitmapRecord],
    ) -> Result<(), Error> {
        let header_name = h_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| h_path.to_string_lossy().into_owned());

        let definitions = self.render_definitions(records, &header_name);
        let declarations = self.render_declarations(records);

        ensure_ascii(&c_path.to_string_lossy(), &definitions)?;
        ensure_ascii(&h_path.to_string_lossy(), &declarations)?;

        write_file(c_path, &definitions)?;
        write_file(h_path, &declarations)?;
        info!(
            "wrote {} bitmaps to {:?} and {:?}",
            records.len(),
            c_path,
            h_path
        );
        Ok(())
    }
}

/// Fail on the first byte outside 7-bit ASCII.
pub fn ensure_ascii(artifact: &str, text: &str) -> Result<(), Error> {
    match text.bytes().position(|b| !b.is_ascii()) {
        Some(offset) => Err(Error::NonAscii {
            artifact: artifact.to_string(),
            offset,
        }),
        None => Ok(()),
    }
}

pub(crate) fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    debug!("writing {} bytes to {:?}", text.len(), path);
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

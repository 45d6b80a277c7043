use clap::Parser;
use log::error;
use std::path::Path;

use c_bitmap::{package_font, Config, FONT_OUTPUT, GLYPH_DIR};

/// Package the glyph images in ./out/ into depixel.c
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let _args = Args::parse();

    let config = Config::default();
    if let Err(err) = package_font(Path::new(GLYPH_DIR), Path::new(FONT_OUTPUT), &config) {
        error!("{}", err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

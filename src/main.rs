use clap::Parser;
use log::error;
use std::path::PathBuf;

use c_bitmap::{convert_files, Config};

//
// cargo run -- -c bitmaps.c -H bitmaps.h smiley.png arrow.png
//
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Definitions unit to write
    #[arg(short = 'c', long = "c-output", alias = "c_output", default_value = "bitmaps.c")]
    c_output: PathBuf,

    /// Declarations unit to write
    #[arg(short = 'H', long = "h-output", alias = "h_output", default_value = "bitmaps.h")]
    h_output: PathBuf,

    /// Suffix identifiers that collide instead of emitting duplicates
    #[arg(long)]
    unique: bool,

    #[arg(help = "Input images", required = true)]
    input_files: Vec<PathBuf>,
}

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

    let args = Args::parse();
    let config = Config::default().unique_identifiers(args.unique);

    if let Err(err) = convert_files(&args.input_files, &args.c_output, &args.h_output, &config) {
        error!("{}", err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sketch_ngin::{flow, sketches};

#[derive(Parser, Debug)]
#[command(about = "Run or export one of the bundled sketches")]
pub struct Args {
    #[arg(short, long, default_value = "sphere")]
    /// Sketch to run, see `--list`
    sketch: String,

    #[arg(long)]
    /// Fixed seed; the same seed always draws the same picture.
    seed: Option<u64>,

    #[arg(short, long)]
    /// Render the first frame at full size to this PNG instead of opening a window
    export: Option<PathBuf>,

    #[arg(short, long)]
    /// Print the available sketches and exit
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        for entry in sketches::registry() {
            let (width, height) = entry.settings.pixel_size((0, 0));
            let size = if width == 0 {
                "window".to_string()
            } else {
                format!("{}x{}", width, height)
            };
            let mode = if entry.settings.is_animated() {
                "animated"
            } else {
                "static"
            };
            println!("{:<18} {:<10} {}", entry.name, size, mode);
        }
        return Ok(());
    }

    let entry = sketches::find(&args.sketch)?;
    match args.export {
        Some(path) => flow::export(entry, args.seed, &path),
        None => flow::run(entry, args.seed),
    }
}

//! Writes a green gradient image.
//!
//! ```
//! $ cargo run --example gradient -- --width 1920 --height 1080 example_img.png
//! ```

use std::path::PathBuf;

use clap::Parser;
use gpng::{BlockSize, Encoder, PixelBuffer, GREEN};

#[derive(Parser)]
#[clap(about = "Writes a green gradient PNG")]
struct Args {
    /// Output file
    #[clap(default_value = "example_img.png")]
    output: PathBuf,
    #[clap(long, default_value_t = 1920)]
    width: u32,
    #[clap(long, default_value_t = 1080)]
    height: u32,
    /// Split the image data into 32763 byte blocks like earlier gpng releases
    #[clap(long)]
    legacy_blocks: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut image = PixelBuffer::new(args.width, args.height)?;
    for y in 0..args.height {
        for x in 0..args.width {
            image[(x, y, GREEN)] = 255u32.wrapping_sub(x).wrapping_sub(y) as u8;
        }
    }

    if args.legacy_blocks {
        let mut encoder = Encoder::new(Vec::new(), args.width, args.height);
        encoder.set_block_size(BlockSize::LEGACY.get())?;
        let png = encoder.write_image_data(image.as_bytes())?;
        gpng::save_bytes(&args.output, &png)?;
    } else {
        image.output_png(&args.output)?;
    }
    image.release();

    println!("wrote {}", args.output.display());
    Ok(())
}

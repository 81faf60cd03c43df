use anyhow::Result;
use app_icon_gen::{
    config::{DEFAULT_OUTPUT_DIR, DEFAULT_SIZES},
    generate_icons, parse_color, IconConfig, SystemFontProvider,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "app-icon-gen",
    about = "Draw the gradient letter app icon at every macOS asset catalog size"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Icon sizes in pixels to generate.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Option<Vec<u32>>,

    /// Letter drawn in the middle of the icon.
    #[clap(long, default_value_t = 'Y')]
    letter: char,

    /// Gradient top color and letter color (CSS color format)
    #[clap(long, value_name = "COLOR")]
    color: Option<String>,

    /// Gradient bottom color (CSS color format)
    #[clap(long, value_name = "COLOR")]
    dark_color: Option<String>,

    /// Font file to try before the built-in candidate list
    #[clap(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Also write an asset catalog Contents.json
    #[clap(long)]
    contents_json: bool,
}

impl Args {
    fn into_config(self) -> Result<(IconConfig, SystemFontProvider)> {
        let mut config = IconConfig {
            sizes: self.sizes.unwrap_or_else(|| DEFAULT_SIZES.to_vec()),
            output_dir: self.output,
            letter: self.letter,
            write_contents_json: self.contents_json,
            ..IconConfig::default()
        };
        if let Some(color) = &self.color {
            config.base_color = parse_color(color)?;
        }
        if let Some(color) = &self.dark_color {
            config.dark_color = parse_color(color)?;
        }

        let fonts = match self.font {
            Some(path) => SystemFontProvider::with_preferred(path),
            None => SystemFontProvider::default(),
        };
        Ok((config, fonts))
    }
}

fn run(args: Args) -> Result<()> {
    let (config, fonts) = args.into_config()?;
    generate_icons(&config, &fonts)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("❌ Error generating icons: {e:#}");
        eprintln!("\nMake sure the output directory is writable, or pick another one:");
        eprintln!("   app-icon-gen --output <DIR>");
        std::process::exit(1);
    }
}

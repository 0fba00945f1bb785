use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use easysocial::commands::{self, RenderShotsRequest};
use easysocial::palette::ImageSource;
use easysocial::studio::{EncodedImage, Language};

#[derive(Parser, Debug)]
#[command(name = "easysocial", version, about = "Studio product shots from any angle")]
struct Cli {
    /// Studio config TOML (default: <config dir>/easysocial/studio.toml).
    #[arg(long, global = true, env = "EASYSOCIAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render four studio shots of a product.
    Render(RenderArgs),
    /// Extract a brand palette from an image.
    Palette {
        /// Image file (PNG, JPEG, WebP, ...).
        image: PathBuf,
    },
    /// Darken a hex color by a percentage.
    Darken {
        hex: String,
        #[arg(allow_negative_numbers = true)]
        percent: f64,
    },
    /// List background color presets.
    Colors,
    /// Show configuration and credential status.
    Health,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Front photo (required).
    #[arg(long)]
    front: PathBuf,

    /// Back photo; switches to front/back angle set.
    #[arg(long)]
    back: Option<PathBuf>,

    /// Background color, #RRGGBB.
    #[arg(long, conflicts_with = "transparent")]
    background: Option<String>,

    /// Pure white background with contact shadows.
    #[arg(long)]
    transparent: bool,

    /// Output directory for rendered PNGs.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Label language.
    #[arg(long, value_enum)]
    lang: Option<LangChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LangChoice {
    En,
    Bn,
}

impl From<LangChoice> for Language {
    fn from(choice: LangChoice) -> Self {
        match choice {
            LangChoice::En => Language::En,
            LangChoice::Bn => Language::Bn,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    easysocial::init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.cmd {
        Command::Render(args) => cmd_render(config, args).await,
        Command::Palette { image } => {
            let resp = commands::extract_brand_palette(ImageSource::Path(image)).await;
            for (color, shade) in resp.colors.iter().zip(&resp.shades) {
                println!("{}  (shade {})", color, shade);
            }
            Ok(())
        }
        Command::Darken { hex, percent } => {
            println!("{}", commands::darken(&hex, percent));
            Ok(())
        }
        Command::Colors => {
            for color in commands::list_studio_colors() {
                println!("{:<14} {}", color.name, color.value);
            }
            Ok(())
        }
        Command::Health => {
            let report = commands::run_health_check(config);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn cmd_render(config: Option<&Path>, args: RenderArgs) -> anyhow::Result<()> {
    let request = RenderShotsRequest {
        front_image: read_data_url(&args.front)?,
        back_image: args.back.as_deref().map(read_data_url).transpose()?,
        background_color: args.background,
        transparent: args.transparent,
        language: args.lang.map(Language::from),
    };

    let response = match commands::render_studio_shots(config, request).await {
        Ok(r) => r,
        Err(err) => {
            eprintln!("{}", err);
            if err.needs_new_credential() {
                eprintln!("Set a different key in GEMINI_API_KEY and try again.");
            } else if err.is_retryable() {
                eprintln!("Try again.");
            }
            bail!("render failed");
        }
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output directory '{}'", args.out.display()))?;

    for (image, name) in response.images.iter().zip(&response.download_names) {
        let bytes = EncodedImage::parse(&image.image_data)?.decode_bytes()?;
        let path = args.out.join(name);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        info!("Saved {} ({})", path.display(), image.angle_label);
        println!("{}", path.display());
    }
    Ok(())
}

fn read_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let mime = image::guess_format(&bytes)
        .map(|f| f.to_mime_type())
        .with_context(|| format!("'{}' is not a recognized image", path.display()))?;
    Ok(EncodedImage::from_bytes(mime, &bytes)?.to_data_url())
}

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use image::RgbImage;
use pixel_digest::{
    config::{OutputFormat, Settings},
    encode_file_with, logging, render, DigestError, GridPolicy, ImageDigest,
};
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;
use tracing::{error, info};

fn cli() -> Command {
    Command::new("pixel-digest")
        .version("0.1")
        .about("Turns images into block digests and renders digests back into images.")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Settings file to use instead of ./pixel-digest.toml"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Prints debug information verbosely."),
        )
        .subcommand(
            Command::new("inspect")
                .about("Prints the digest of each input image, one line per image.")
                .arg(
                    Arg::new("input")
                        .help("Images to inspect")
                        .required(true)
                        .num_args(1..)
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .value_parser(value_parser!(OutputFormat))
                        .help("Output format, overrides the configured one."),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Draws the blocky image described by a JSON digest.")
                .arg(
                    Arg::new("input")
                        .help("JSON digest as printed by `inspect --format json`")
                        .required(true)
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Sets the output image, defaults to <input>_digest.png"),
                )
                .arg(
                    Arg::new("show")
                        .long("show")
                        .action(ArgAction::SetTrue)
                        .help("Display the result in another window."),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            Settings::load_from(path)
        }
        None => Settings::load(),
    }
    .map_err(|e| anyhow!("failed to load configuration: {e}"))?;
    if matches.get_flag("verbose") {
        settings.log.level = "debug".to_owned();
    }
    settings.validate().map_err(anyhow::Error::msg)?;
    logging::init(&settings.log).map_err(anyhow::Error::msg)?;

    match matches.subcommand() {
        Some(("inspect", sub)) => inspect(sub, &settings),
        Some(("render", sub)) => render_digest(sub),
        Some((other, _)) => bail!("unknown command `{other}`"),
        None => bail!("no command given"),
    }
}

#[cfg(feature = "multithreaded")]
fn inspect_all(inputs: &[&PathBuf], policy: &GridPolicy) -> Vec<Result<ImageDigest, DigestError>> {
    inputs
        .par_iter()
        .map(|path| encode_file_with(path, policy))
        .collect()
}

#[cfg(not(feature = "multithreaded"))]
fn inspect_all(inputs: &[&PathBuf], policy: &GridPolicy) -> Vec<Result<ImageDigest, DigestError>> {
    inputs
        .iter()
        .map(|path| encode_file_with(path, policy))
        .collect()
}

fn format_digest(digest: &ImageDigest, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => digest.to_text(),
        OutputFormat::Json => serde_json::to_string(digest)?,
    })
}

fn inspect(matches: &ArgMatches, settings: &Settings) -> Result<()> {
    let inputs: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("input")
        .context("no input files given")?
        .collect();
    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or(settings.output);
    info!(files = inputs.len(), ?format, "inspecting");

    let results = inspect_all(&inputs, &settings.grid);

    let mut failures = 0;
    let mut out = io::stdout().lock();
    for (path, result) in inputs.iter().zip(results) {
        match result {
            Ok(digest) => writeln!(out, "{}", format_digest(&digest, format)?)?,
            Err(e) => {
                failures += 1;
                error!(path = %path.display(), "{:#}", anyhow::Error::new(e));
            }
        }
    }
    out.flush()?;

    if failures > 0 {
        bail!("{failures} of {} images could not be inspected", inputs.len());
    }
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let file_stem = input.file_stem().unwrap_or_default();
    let mut new_name = file_stem.to_os_string();
    new_name.push("_digest.png");
    input.with_file_name(new_name)
}

fn render_digest(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("no digest file given")?;
    let text = fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let digest: ImageDigest = serde_json::from_str(text.trim())
        .with_context(|| format!("{} is not a valid digest", input.display()))?;
    info!(
        width = digest.width(),
        height = digest.height(),
        blocks = digest.blocks().len(),
        "rendering"
    );

    let img = render(&digest);
    let output = match matches.get_one::<PathBuf>("output") {
        Some(path) => path.clone(),
        None => default_output_path(input),
    };
    img.save(&output)
        .with_context(|| format!("cannot write {}", output.display()))?;
    info!(output = %output.display(), "saved");

    if matches.get_flag("show") {
        show(&img, &output)?;
    }
    Ok(())
}

#[cfg(feature = "preview")]
fn show(img: &RgbImage, output: &Path) -> Result<()> {
    use minifb::{Key, Window, WindowOptions};

    println!("Press ESC to quit.");
    let (width, height) = img.dimensions();
    let buffer: Vec<u32> = img
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (r as u32) << 16 | (g as u32) << 8 | (b as u32) | 0xFF000000
        })
        .collect();

    let title = format!("pixel-digest: {}", output.display());
    let mut window = Window::new(&title, width as usize, height as usize, WindowOptions::default())
        .map_err(|e| anyhow!("failed to create window: {e}"))?;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width as usize, height as usize)
            .map_err(|e| anyhow!("failed to update window: {e}"))?;
    }
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn show(_img: &RgbImage, _output: &Path) -> Result<()> {
    tracing::warn!("built without the `preview` feature, ignoring --show");
    Ok(())
}

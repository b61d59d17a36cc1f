//! jpxfilter CLI - run the JPXDecode filter over files.
//!
//! Useful for checking how a JPEG 2000 image embedded in a document decodes,
//! and whether JPX output is available in this build.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use jpx_filter::jp2::{self, Jp2Color, JpxFormat};
use jpx_filter::{
    CodecRegistry, DecodeOptions, DecodeResult, Filter, JpxFilter, JpxFilterConfig, Parameters,
};

/// Run the JPXDecode stream filter on JPEG 2000 files
#[derive(Parser)]
#[command(name = "jpxfilter")]
#[command(version)]
#[command(about = "Decode JPEG 2000 to RGB and encode bitmaps to JPEG 2000", long_about = None)]
#[command(after_help = "EXAMPLES:
    jpxfilter decode -i image.jp2 -o pixels.raw
    jpxfilter decode -i image.j2k -o image.ppm -f ppm
    jpxfilter encode -i photo.png -o photo.jp2
    jpxfilter info -i image.jp2

Set RUST_LOG=debug for diagnostics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a JPEG 2000 image to interleaved RGB bytes
    #[command(visible_alias = "d")]
    Decode {
        /// Input file path (JP2 or raw codestream)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: raw (RGB bytes) or ppm (Portable PixMap)
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,

        /// Pixels buffered per write to the output
        #[arg(long, default_value = "1024")]
        buffer_pixels: usize,
    },

    /// Encode a raster image (PNG, JPEG, BMP, ...) to JPEG 2000
    #[command(visible_alias = "e")]
    Encode {
        /// Input raster image
        #[arg(short, long)]
        input: PathBuf,

        /// Output JPEG 2000 file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Display JPEG 2000 header information
    #[command(visible_alias = "i")]
    Info {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the codecs registered in this build
    #[command(visible_alias = "l")]
    List,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw RGB bytes
    Raw,
    /// Portable PixMap (P6)
    Ppm,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            format,
            buffer_pixels,
        } => decode_image(&input, &output, &format, buffer_pixels),
        Commands::Encode { input, output } => encode_image(&input, &output),
        Commands::Info { input } => show_info(&input),
        Commands::List => list_codecs(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_image(
    input: &PathBuf,
    output: &PathBuf,
    format: &OutputFormat,
    buffer_pixels: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let config = JpxFilterConfig {
        buffer_pixels,
        ..JpxFilterConfig::default()
    };
    let filter = JpxFilter::with_config(CodecRegistry::global(), config)?;

    let result = match write_decoded(&filter, &data, output, format) {
        Ok(result) => result,
        Err(e) => {
            // No partial image is left behind.
            let _ = fs::remove_file(output);
            return Err(e);
        }
    };
    let params = result.parameters();
    let width = params.get_int("Width").unwrap_or(0);
    let height = params.get_int("Height").unwrap_or(0);

    println!("✓ Decoded {}x{} image to {:?}", width, height, output);
    println!("  Parameters: {}", params);
    Ok(())
}

/// Decodes straight into the output file; each transcoder batch is one write.
fn write_decoded(
    filter: &JpxFilter,
    data: &[u8],
    output: &PathBuf,
    format: &OutputFormat,
) -> Result<DecodeResult, Box<dyn std::error::Error>> {
    let mut file = fs::File::create(output)?;
    if let OutputFormat::Ppm = format {
        let header = jp2::read_header(data)?;
        write!(file, "P6\n{} {}\n255\n", header.width, header.height)?;
    }
    let result = filter.decode(
        &mut &data[..],
        &mut file,
        &Parameters::new(),
        0,
        &DecodeOptions::default(),
    )?;
    file.flush()?;
    Ok(result)
}

fn encode_image(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let filter = JpxFilter::new();

    // Encode into memory first so a failure leaves no partial output file.
    let mut encoded = Vec::new();
    filter.encode(&mut data.as_slice(), &mut encoded, &Parameters::new())?;
    fs::write(output, &encoded)?;

    println!("✓ Encoded {:?} to {:?} ({} bytes)", input, output, encoded.len());
    Ok(())
}

fn show_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());
    println!();

    let header = jp2::read_header(&data)?;
    println!(
        "Format: {}",
        match header.format {
            JpxFormat::Jp2 => "JP2 Container (JPEG 2000)",
            JpxFormat::Codestream => "JPEG 2000 Codestream",
        }
    );
    println!("  Dimensions: {}x{}", header.width, header.height);
    println!("  Components: {}", header.component_count);
    match header.bits_per_component {
        Some(bpc) => println!("  Bit depth:  {} bits", bpc),
        None => println!("  Bit depth:  varies per component"),
    }
    match &header.color {
        Some(Jp2Color::Enumerated(cs)) => println!("  Color:      {:?}", cs),
        Some(Jp2Color::UnknownEnumerated(v)) => println!("  Color:      enumerated #{}", v),
        Some(Jp2Color::Icc(len)) => println!("  Color:      ICC profile ({} bytes)", len),
        None => println!("  Color:      {:?} (from component count)", header.color_space()),
    }
    Ok(())
}

fn list_codecs() -> Result<(), Box<dyn std::error::Error>> {
    let registry = CodecRegistry::global();
    println!("Registered codecs:");
    println!();
    match registry.decoder() {
        Some(decoder) => println!("  Decoder: {}", decoder.name()),
        None => println!("  Decoder: none (built without the openjpeg feature)"),
    }
    let mut names = registry.encoder_names().collect::<Vec<_>>();
    names.sort();
    if names.is_empty() {
        println!("  Encoder: none (JPEG 2000 output unavailable)");
    } else {
        for name in names {
            println!("  Encoder: {}", name);
        }
    }
    Ok(())
}

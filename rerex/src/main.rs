use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use librex_audio::RexFile;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

mod rexwav;
mod wav;

#[derive(Parser)]
#[command(name = "rerex")]
#[command(version)]
#[command(about = "REX2 loop inspector and converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a REX2 or REXWAV file
    Info {
        /// Input .rx2 or .rexwav file
        input: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode to a 16-bit PCM WAV file
    Decode {
        /// Input .rx2 or .rexwav file
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Also write one WAV per slice next to the output
        #[arg(long)]
        slices: bool,
    },
    /// Convert a REX2 file to the pre-decoded .rexwav sidecar format
    Convert {
        /// Input .rx2 file
        input: PathBuf,
        /// Output .rexwav file
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env("REREX_LOG").init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Decode {
            input,
            output,
            slices,
        } => cmd_decode(&input, &output, slices),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
    }
}

/// read and parse either container format, picked by extension
fn load(input: &Path) -> Result<RexFile> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let is_sidecar = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("rexwav"))
        .unwrap_or(false);

    let parsed = if is_sidecar {
        librex_audio::rexwav::parse(&data)
    } else {
        librex_audio::parse(&data)
    };

    let file = parsed.with_context(|| format!("Failed to parse {}", input.display()))?;
    info!(
        "{}: {} frames, {} slices",
        input.display(),
        file.pcm_frames,
        file.slices.len()
    );
    Ok(file)
}

#[derive(Serialize)]
struct InfoOut<'a> {
    tempo_bpm: f32,
    time_sig_num: u8,
    time_sig_den: u8,
    bars: u16,
    beats: u8,
    sample_rate: u32,
    channels: u8,
    frames: usize,
    duration_secs: f64,
    slices: &'a [librex_audio::Slice],
}

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let file = load(input)?;

    if json {
        let out = InfoOut {
            tempo_bpm: file.tempo_bpm,
            time_sig_num: file.time_sig_num,
            time_sig_den: file.time_sig_den,
            bars: file.bars,
            beats: file.beats,
            sample_rate: file.sample_rate,
            channels: file.channels,
            frames: file.pcm_frames,
            duration_secs: file.duration_secs(),
            slices: &file.slices,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Tempo:       {:.1} BPM", file.tempo_bpm);
    println!("Time Sig:    {}/{}", file.time_sig_num, file.time_sig_den);
    println!("Bars:        {}", file.bars);
    println!("Beats:       {}", file.beats);
    println!("Sample Rate: {} Hz", file.sample_rate);
    println!("Channels:    {}", file.channels);
    println!(
        "Length:      {} frames ({:.2} s)",
        file.pcm_frames,
        file.duration_secs()
    );
    println!("Slices:      {}", file.slices.len());

    for (i, slice) in file.slices.iter().enumerate() {
        let dur_ms = slice.sample_length as f64 / file.sample_rate as f64 * 1000.0;
        println!(
            "  Slice {:2}: offset={:6}  length={:6}  ({:.1} ms)",
            i, slice.sample_offset, slice.sample_length, dur_ms
        );
    }

    Ok(())
}

fn cmd_decode(input: &Path, output: &Path, slices: bool) -> Result<()> {
    let file = load(input)?;

    wav::write_wav(output, &file.pcm, file.sample_rate, file.channels as u16)?;
    println!(
        "Wrote {} ({} frames, {} Hz)",
        output.display(),
        file.pcm_frames,
        file.sample_rate
    );

    if slices {
        let stem = output
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("slice");
        let dir = output.parent().unwrap_or_else(|| Path::new("."));

        for i in 0..file.slices.len() {
            let audio = match file.slice_audio(i) {
                Some(audio) if !audio.is_empty() => audio,
                _ => continue,
            };
            let path = dir.join(format!("{}_slice_{:02}.wav", stem, i));
            wav::write_wav(&path, audio, file.sample_rate, file.channels as u16)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> Result<()> {
    let file = load(input)?;

    let bytes = rexwav::to_bytes(&file);
    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Wrote {} ({} bytes, {} slices)",
        output.display(),
        bytes.len(),
        file.slices.len()
    );

    Ok(())
}

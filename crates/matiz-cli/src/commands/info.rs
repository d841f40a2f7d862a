//! Display WAV file metadata.

use clap::Args;
use matiz_io::{WavFormat, read_wav_info};

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;
    let size = std::fs::metadata(&args.file)?.len();

    let encoding = match info.format {
        WavFormat::Pcm => format!("{}-bit PCM", info.bits_per_sample),
        WavFormat::IeeeFloat => format!("{}-bit float", info.bits_per_sample),
    };
    let layout = match info.channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{n} channels"),
    };

    println!("{}", args.file.display());
    println!("  Encoding:    {encoding}, {layout}");
    println!("  Sample rate: {} Hz", info.sample_rate);
    println!(
        "  Duration:    {:.3} s ({} frames)",
        info.duration_secs, info.num_frames
    );
    println!("  File size:   {}", human_size(size));

    Ok(())
}

fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }
}

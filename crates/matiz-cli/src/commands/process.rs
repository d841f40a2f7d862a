//! File-based effect processing command.

use crate::effects::create_effect;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use matiz_core::math::linear_to_db;
use matiz_effects::Progress;
use matiz_io::{read_wav, write_wav};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect to apply
    #[arg(short, long)]
    effect: String,

    /// Effect parameters (e.g., "decay=3.5")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "16")]
    bit_depth: u16,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid parameter format: '{s}' (expected key=value)"));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav(&args.input)?;

    println!(
        "  {} channel(s), {} samples, {} Hz, {:.2}s",
        input.num_channels(),
        input.len(),
        spec.sample_rate,
        input.duration_secs()
    );

    let params: HashMap<String, String> = args.param.into_iter().collect();
    let effect = create_effect(&args.effect, &params)?;

    println!("Applying {}...", effect.name());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
            .progress_chars("##-"),
    );

    let mut on_progress = |percent: f32, status: &str| {
        pb.set_position(percent as u64);
        pb.set_message(status.to_string());
    };
    let mut progress = Progress::new(&mut on_progress);
    let output = effect.render(&input, &mut progress)?;
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input.rms()),
        linear_to_db(input.peak())
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(output.rms()),
        linear_to_db(output.peak())
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("decay=3.5").unwrap(),
            ("decay".to_string(), "3.5".to_string())
        );
        // Only the first '=' splits, so values may contain one.
        assert_eq!(
            parse_key_val("bands=1,2=3").unwrap(),
            ("bands".to_string(), "1,2=3".to_string())
        );
        assert!(parse_key_val("decay").is_err());
    }
}

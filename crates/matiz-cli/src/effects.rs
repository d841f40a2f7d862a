//! Effect factory and parameter parsing.

use matiz_effects::{
    Chorus, Compressor, Distortion, DistortionMode, Equalizer, Expander, Flanger, LowPass, Notch,
    Phaser, Render, Reverb, Wah, WahMode,
};
use std::collections::HashMap;

/// Error type for effect creation.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    #[error("Unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter { effect: String, param: String },

    #[error("Invalid value for '{param}': {message}")]
    InvalidValue { param: String, message: String },
}

/// Information about an available effect.
#[derive(Debug, Clone)]
pub struct EffectInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterInfo],
}

/// Information about an effect parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub range: &'static str,
}

/// Get information about all available effects.
pub fn available_effects() -> Vec<EffectInfo> {
    vec![
        EffectInfo {
            name: "reverb",
            description: "Schroeder reverb with tail extension",
            parameters: &[
                ParameterInfo { name: "room", description: "Room size", default: "50", range: "0-100" },
                ParameterInfo { name: "decay", description: "Decay time in seconds", default: "2.0", range: "0-10" },
                ParameterInfo { name: "predelay", description: "Pre-delay in ms", default: "20", range: "0-200" },
                ParameterInfo { name: "damping", description: "High-frequency damping", default: "50", range: "0-100" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "40", range: "0-100" },
                ParameterInfo { name: "width", description: "Stereo width", default: "100", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "chorus",
            description: "Multi-voice modulated delay chorus",
            parameters: &[
                ParameterInfo { name: "rate", description: "LFO rate in Hz", default: "0.8", range: "0.05-10" },
                ParameterInfo { name: "depth", description: "Modulation depth", default: "50", range: "0-100" },
                ParameterInfo { name: "voices", description: "Voice count", default: "3", range: "1-8" },
                ParameterInfo { name: "delay", description: "Center delay in ms", default: "20", range: "1-50" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "50", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "flanger",
            description: "Modulated short delay with feedback",
            parameters: &[
                ParameterInfo { name: "rate", description: "LFO rate in Hz", default: "0.25", range: "0.05-5" },
                ParameterInfo { name: "depth", description: "Modulation depth", default: "70", range: "0-100" },
                ParameterInfo { name: "feedback", description: "Feedback gain", default: "0.5", range: "0-0.9" },
                ParameterInfo { name: "delay", description: "Center delay in ms", default: "5", range: "0.5-15" },
                ParameterInfo { name: "phase", description: "Stereo LFO phase in degrees", default: "90", range: "0-180" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "50", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "distortion",
            description: "Waveshaping distortion with five curves",
            parameters: &[
                ParameterInfo { name: "mode", description: "Transfer curve", default: "softclip", range: "softclip|hardclip|overdrive|fuzz|bitcrush" },
                ParameterInfo { name: "drive", description: "Linear input gain", default: "10", range: "1-100" },
                ParameterInfo { name: "tone", description: "Lowpass/highpass blend", default: "50", range: "0-100" },
                ParameterInfo { name: "bits", description: "Bit depth (bitcrush)", default: "8", range: "1-16" },
                ParameterInfo { name: "downsample", description: "Sample-hold factor (bitcrush)", default: "1", range: "1-50" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "100", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "equalizer",
            description: "Ten-band graphic equalizer (31 Hz - 16 kHz)",
            parameters: &[
                ParameterInfo { name: "bands", description: "Comma-separated gains in dB for all ten bands", default: "0,0,0,0,0,0,0,0,0,0", range: "-12-12 each" },
                ParameterInfo { name: "band1..band10", description: "Single band gain in dB", default: "0", range: "-12-12" },
            ],
        },
        EffectInfo {
            name: "lowpass",
            description: "Resonant lowpass with selectable slope",
            parameters: &[
                ParameterInfo { name: "cutoff", description: "Cutoff frequency in Hz", default: "1000", range: "20-20000" },
                ParameterInfo { name: "resonance", description: "Resonance", default: "0", range: "0-100" },
                ParameterInfo { name: "slope", description: "Slope in dB/octave", default: "12", range: "6|12|18|24|36|48" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "100", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "notch",
            description: "Notch filter with depth blend",
            parameters: &[
                ParameterInfo { name: "center", description: "Center frequency in Hz", default: "1000", range: "20-20000" },
                ParameterInfo { name: "q", description: "Filter Q", default: "5", range: "0.1-30" },
                ParameterInfo { name: "depth", description: "Notch depth", default: "100", range: "0-100" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "100", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "wah",
            description: "Envelope- or LFO-swept bandpass wah",
            parameters: &[
                ParameterInfo { name: "mode", description: "Sweep source", default: "auto", range: "auto|manual" },
                ParameterInfo { name: "rate", description: "LFO rate in Hz (manual)", default: "2.0", range: "0.1-10" },
                ParameterInfo { name: "low", description: "Sweep bottom in Hz", default: "400", range: "100-2000" },
                ParameterInfo { name: "high", description: "Sweep top in Hz", default: "2000", range: "500-6000" },
                ParameterInfo { name: "q", description: "Filter Q", default: "5", range: "1-20" },
                ParameterInfo { name: "sensitivity", description: "Envelope sensitivity (auto)", default: "50", range: "0-100" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "100", range: "0-100" },
            ],
        },
        EffectInfo {
            name: "compressor",
            description: "Downward compressor with soft knee",
            parameters: &[
                ParameterInfo { name: "threshold", description: "Threshold in dBFS", default: "-18", range: "-60-0" },
                ParameterInfo { name: "ratio", description: "Compression ratio", default: "4", range: "1-20" },
                ParameterInfo { name: "knee", description: "Knee width in dB", default: "6", range: "0-24" },
                ParameterInfo { name: "attack", description: "Attack time in ms", default: "10", range: "0.1-500" },
                ParameterInfo { name: "release", description: "Release time in ms", default: "100", range: "1-2000" },
                ParameterInfo { name: "makeup", description: "Makeup gain in dB", default: "0", range: "0-24" },
            ],
        },
        EffectInfo {
            name: "expander",
            description: "Downward expander with output normalization",
            parameters: &[
                ParameterInfo { name: "threshold", description: "Threshold in dBFS", default: "-40", range: "-60-0" },
                ParameterInfo { name: "ratio", description: "Expansion ratio", default: "2", range: "1-20" },
                ParameterInfo { name: "attack", description: "Attack time in ms", default: "5", range: "0.1-500" },
                ParameterInfo { name: "release", description: "Release time in ms", default: "50", range: "1-2000" },
            ],
        },
        EffectInfo {
            name: "phaser",
            description: "Swept allpass chain with feedback",
            parameters: &[
                ParameterInfo { name: "stages", description: "Allpass stage count (even)", default: "4", range: "2-12" },
                ParameterInfo { name: "rate", description: "LFO rate in Hz", default: "0.5", range: "0.05-5" },
                ParameterInfo { name: "min", description: "Sweep bottom in Hz", default: "440", range: "100-2000" },
                ParameterInfo { name: "max", description: "Sweep top in Hz", default: "1600", range: "500-8000" },
                ParameterInfo { name: "feedback", description: "Feedback gain", default: "0.5", range: "0-0.9" },
                ParameterInfo { name: "mix", description: "Wet/dry mix", default: "50", range: "0-100" },
            ],
        },
    ]
}

fn parse_f32(param: &str, value: &str) -> Result<f32, FactoryError> {
    value.parse::<f32>().map_err(|e| FactoryError::InvalidValue {
        param: param.to_string(),
        message: e.to_string(),
    })
}

fn parse_u32(param: &str, value: &str) -> Result<u32, FactoryError> {
    value.parse::<u32>().map_err(|e| FactoryError::InvalidValue {
        param: param.to_string(),
        message: e.to_string(),
    })
}

fn unknown(effect: &str, param: &str) -> FactoryError {
    FactoryError::UnknownParameter {
        effect: effect.to_string(),
        param: param.to_string(),
    }
}

/// Build a configured effect from a name and `key=value` parameters.
///
/// Range validation happens later, at the render boundary; this layer only
/// rejects unknown names and unparseable values.
pub fn create_effect(
    name: &str,
    params: &HashMap<String, String>,
) -> Result<Box<dyn Render>, FactoryError> {
    match name.to_lowercase().as_str() {
        "reverb" => {
            let mut effect = Reverb::default();
            for (key, value) in params {
                match key.as_str() {
                    "room" | "room_size" => effect.room_size = parse_f32(key, value)?,
                    "decay" | "decay_time" => effect.decay_time = parse_f32(key, value)?,
                    "predelay" | "pre_delay" => effect.pre_delay_ms = parse_f32(key, value)?,
                    "damping" => effect.damping = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    "width" | "stereo_width" => effect.stereo_width = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "chorus" => {
            let mut effect = Chorus::default();
            for (key, value) in params {
                match key.as_str() {
                    "rate" => effect.rate = parse_f32(key, value)?,
                    "depth" => effect.depth = parse_f32(key, value)?,
                    "voices" => effect.voices = parse_u32(key, value)?,
                    "delay" | "base_delay" => effect.base_delay_ms = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "flanger" => {
            let mut effect = Flanger::default();
            for (key, value) in params {
                match key.as_str() {
                    "rate" => effect.rate = parse_f32(key, value)?,
                    "depth" => effect.depth = parse_f32(key, value)?,
                    "feedback" => effect.feedback = parse_f32(key, value)?,
                    "delay" | "base_delay" => effect.base_delay_ms = parse_f32(key, value)?,
                    "phase" | "stereo_phase" => effect.stereo_phase_deg = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "distortion" => {
            let mut effect = Distortion::default();
            let mut mode = "softclip".to_string();
            let mut bits = 8u32;
            let mut downsample = 1u32;
            for (key, value) in params {
                match key.as_str() {
                    "mode" => mode = value.to_lowercase(),
                    "drive" => effect.drive = parse_f32(key, value)?,
                    "tone" => effect.tone = parse_f32(key, value)?,
                    "bits" => bits = parse_u32(key, value)?,
                    "downsample" => downsample = parse_u32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            effect.mode = match mode.as_str() {
                "softclip" => DistortionMode::SoftClip,
                "hardclip" => DistortionMode::HardClip,
                "overdrive" => DistortionMode::Overdrive,
                "fuzz" => DistortionMode::Fuzz,
                "bitcrush" => DistortionMode::BitCrush { bits, downsample },
                other => {
                    return Err(FactoryError::InvalidValue {
                        param: "mode".to_string(),
                        message: format!(
                            "'{other}' is not one of softclip, hardclip, overdrive, fuzz, bitcrush"
                        ),
                    });
                }
            };
            Ok(Box::new(effect))
        }
        "equalizer" | "eq" => {
            let mut effect = Equalizer::default();
            for (key, value) in params {
                if key == "bands" {
                    let gains: Vec<&str> = value.split(',').collect();
                    if gains.len() != effect.gains_db.len() {
                        return Err(FactoryError::InvalidValue {
                            param: "bands".to_string(),
                            message: format!("expected 10 values, got {}", gains.len()),
                        });
                    }
                    for (slot, gain) in effect.gains_db.iter_mut().zip(gains) {
                        *slot = parse_f32(key, gain.trim())?;
                    }
                } else if let Some(index) = key.strip_prefix("band") {
                    let band: usize = index.parse().map_err(|_| unknown(name, key))?;
                    if !(1..=10).contains(&band) {
                        return Err(unknown(name, key));
                    }
                    effect.gains_db[band - 1] = parse_f32(key, value)?;
                } else {
                    return Err(unknown(name, key));
                }
            }
            Ok(Box::new(effect))
        }
        "lowpass" => {
            let mut effect = LowPass::default();
            for (key, value) in params {
                match key.as_str() {
                    "cutoff" => effect.cutoff = parse_f32(key, value)?,
                    "resonance" => effect.resonance = parse_f32(key, value)?,
                    "slope" => effect.slope = parse_u32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "notch" => {
            let mut effect = Notch::default();
            for (key, value) in params {
                match key.as_str() {
                    "center" => effect.center = parse_f32(key, value)?,
                    "q" => effect.q = parse_f32(key, value)?,
                    "depth" => effect.depth = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "wah" => {
            let mut effect = Wah::default();
            for (key, value) in params {
                match key.as_str() {
                    "mode" => {
                        effect.mode = match value.to_lowercase().as_str() {
                            "auto" => WahMode::Auto,
                            "manual" => WahMode::Manual,
                            other => {
                                return Err(FactoryError::InvalidValue {
                                    param: "mode".to_string(),
                                    message: format!("'{other}' is not auto or manual"),
                                });
                            }
                        };
                    }
                    "rate" => effect.rate = parse_f32(key, value)?,
                    "low" | "freq_low" => effect.freq_low = parse_f32(key, value)?,
                    "high" | "freq_high" => effect.freq_high = parse_f32(key, value)?,
                    "q" => effect.q = parse_f32(key, value)?,
                    "sensitivity" => effect.sensitivity = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "compressor" => {
            let mut effect = Compressor::default();
            for (key, value) in params {
                match key.as_str() {
                    "threshold" => effect.threshold_db = parse_f32(key, value)?,
                    "ratio" => effect.ratio = parse_f32(key, value)?,
                    "knee" => effect.knee_db = parse_f32(key, value)?,
                    "attack" => effect.attack_ms = parse_f32(key, value)?,
                    "release" => effect.release_ms = parse_f32(key, value)?,
                    "makeup" => effect.makeup_db = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "expander" => {
            let mut effect = Expander::default();
            for (key, value) in params {
                match key.as_str() {
                    "threshold" => effect.threshold_db = parse_f32(key, value)?,
                    "ratio" => effect.ratio = parse_f32(key, value)?,
                    "attack" => effect.attack_ms = parse_f32(key, value)?,
                    "release" => effect.release_ms = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        "phaser" => {
            let mut effect = Phaser::default();
            for (key, value) in params {
                match key.as_str() {
                    "stages" => effect.stages = parse_u32(key, value)?,
                    "rate" => effect.rate = parse_f32(key, value)?,
                    "min" | "min_freq" => effect.min_freq = parse_f32(key, value)?,
                    "max" | "max_freq" => effect.max_freq = parse_f32(key, value)?,
                    "feedback" => effect.feedback = parse_f32(key, value)?,
                    "mix" | "wet_dry" => effect.wet_dry = parse_f32(key, value)?,
                    _ => return Err(unknown(name, key)),
                }
            }
            Ok(Box::new(effect))
        }
        other => Err(FactoryError::UnknownEffect(other.to_string())),
    }
}

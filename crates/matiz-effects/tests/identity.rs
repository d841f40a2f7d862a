//! No-op parameter settings must return the input unchanged.
//!
//! Already-bounded input never trips the final clip stage, so a fully dry
//! mix is an exact pass-through for every effect that has one.

use matiz_core::AudioBuffer;
use matiz_effects::{
    Chorus, Distortion, Equalizer, Flanger, LowPass, Notch, Phaser, Render, Reverb, Wah,
};

fn program_material() -> AudioBuffer {
    // A few mixed tones plus a transient, all inside [-1, 1].
    let data: Vec<f32> = (0..8192)
        .map(|n| {
            let t = n as f32 / 44100.0;
            let mut s = 0.3 * libm::sinf(2.0 * core::f32::consts::PI * 220.0 * t)
                + 0.2 * libm::sinf(2.0 * core::f32::consts::PI * 1330.0 * t);
            if n == 100 {
                s += 0.4;
            }
            s
        })
        .collect();
    AudioBuffer::new(44100, vec![data.clone(), data]).unwrap()
}

fn assert_identity(effect: &dyn Render, input: &AudioBuffer) {
    let out = effect.apply(input).unwrap();
    assert_eq!(out.len(), input.len(), "{} changed length", effect.name());
    for ch in 0..input.num_channels() {
        for (n, (a, b)) in out.channel(ch).iter().zip(input.channel(ch)).enumerate() {
            assert!(
                (a - b).abs() < 1e-6,
                "{}: channel {ch} sample {n}: {a} != {b}",
                effect.name()
            );
        }
    }
}

#[test]
fn dry_mix_is_identity_for_every_mixed_effect() {
    let input = program_material();
    let effects: Vec<Box<dyn Render>> = vec![
        Box::new(Chorus {
            wet_dry: 0.0,
            ..Chorus::default()
        }),
        Box::new(Flanger {
            wet_dry: 0.0,
            ..Flanger::default()
        }),
        Box::new(Distortion {
            wet_dry: 0.0,
            drive: 100.0,
            ..Distortion::default()
        }),
        Box::new(LowPass {
            wet_dry: 0.0,
            ..LowPass::default()
        }),
        Box::new(Notch {
            wet_dry: 0.0,
            ..Notch::default()
        }),
        Box::new(Wah {
            wet_dry: 0.0,
            ..Wah::default()
        }),
        Box::new(Phaser {
            wet_dry: 0.0,
            ..Phaser::default()
        }),
    ];
    for effect in &effects {
        assert_identity(effect.as_ref(), &input);
    }
}

#[test]
fn flat_equalizer_is_bit_exact() {
    let input = program_material();
    let out = Equalizer::default().apply(&input).unwrap();
    for ch in 0..input.num_channels() {
        assert_eq!(out.channel(ch), input.channel(ch));
    }
}

#[test]
fn dry_reverb_keeps_original_samples() {
    let input = program_material();
    let reverb = Reverb {
        wet_dry: 0.0,
        decay_time: 0.25,
        ..Reverb::default()
    };
    let out = reverb.apply(&input).unwrap();
    assert_eq!(out.len(), input.len() + (0.25 * 44100.0) as usize);
    for (a, b) in out.channel(0).iter().zip(input.channel(0)) {
        assert!((a - b).abs() < 1e-6);
    }
}

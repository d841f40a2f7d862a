//! Effect listing and information command.

use crate::effects::available_effects;
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let effects = available_effects();

    if let Some(effect_name) = &args.effect {
        let effect = effects
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(effect_name))
            .ok_or_else(|| anyhow::anyhow!("Unknown effect: {effect_name}"))?;

        println!("{}", effect.name);
        println!("{}", "=".repeat(effect.name.len()));
        println!();
        println!("{}", effect.description);
        println!();
        println!("Parameters:");
        println!();
        println!(
            "  {:12}  {:48}  {:10}  {}",
            "Name", "Description", "Default", "Range"
        );
        println!(
            "  {:12}  {:48}  {:10}  {}",
            "----", "-----------", "-------", "-----"
        );
        for param in effect.parameters {
            println!(
                "  {:12}  {:48}  {:10}  {}",
                param.name, param.description, param.default, param.range
            );
        }
        println!();
        println!(
            "Example: matiz process in.wav out.wav --effect {} --param {}={}",
            effect.name, effect.parameters[0].name, effect.parameters[0].default
        );
    } else {
        println!("Available effects:");
        println!();
        for effect in &effects {
            println!("  {:12}  {}", effect.name, effect.description);
        }
        println!();
        println!("Run 'matiz effects <EFFECT>' for parameter details.");
    }

    Ok(())
}

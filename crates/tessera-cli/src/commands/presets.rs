//! Factory preset listing.

use clap::Args;
use tessera_synth::PRESETS;

#[derive(Args)]
pub struct PresetsArgs {
    /// Show wave mix, filter and envelope for each preset
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    println!("Factory Presets");
    println!("===============\n");

    for (index, preset) in PRESETS.iter().enumerate() {
        println!("  [{}] {}", index, preset.name);
        if args.verbose {
            let mix = &preset.wave_mix;
            println!(
                "      wave    sine {:.2}  tri {:.2}  saw {:.2}  square {:.2}  noise {:.2}",
                mix.sine, mix.triangle, mix.sawtooth, mix.square, mix.noise
            );
            println!(
                "      filter  {:.0} Hz  res {:.2}  drive {:.2}  env depth {:.2}",
                preset.cutoff, preset.resonance, preset.drive, preset.env_depth
            );
            let env = &preset.amp_env;
            println!(
                "      amp     A {:.0} ms  D {:.0} ms  S {:.0}%  R {:.0} ms",
                env.attack * 1000.0,
                env.decay * 1000.0,
                env.sustain * 100.0,
                env.release * 1000.0
            );
        }
    }

    println!();
    println!("Switch presets while playing with ',' and '.'.");
    Ok(())
}

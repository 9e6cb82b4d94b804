//! Audio output device listing.

use clap::Args;
use tessera_io::{AudioBackend, CpalBackend, PREFERRED_SAMPLE_RATES};

#[derive(Args)]
pub struct DevicesArgs {
    /// Show the supported sample-rate range of each device
    #[arg(short, long)]
    verbose: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let backend = CpalBackend::new();
    let devices = backend.list_devices()?;

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Available Audio Devices");
    println!("=======================\n");

    println!("Output Devices:");
    for (idx, device) in devices.iter().enumerate() {
        let default = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz){}",
            idx, device.name, device.default_sample_rate, default
        );
        if args.verbose {
            if let Some((min, max)) = device.rate_range {
                println!("      rates {} - {} Hz", min, max);
            }
            for rate in PREFERRED_SAMPLE_RATES {
                let mark = if device.supports_rate(rate) { "yes" } else { "no" };
                println!("      {} Hz: {}", rate, mark);
            }
        }
    }
    println!();

    println!("Total: {} output(s)", devices.len());
    println!();
    println!("Tip: Use a partial device name with --device:");
    println!("  tessera play --device \"{}\"", devices[0].name);

    Ok(())
}

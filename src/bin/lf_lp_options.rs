use std::error::Error;

use resonator::frequency;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let freq0: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => return Err("usage: lf_lp_options <frequency> [pulse_clock]".into()),
    };
    let pulse_clock: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1_536_000.0,
    };

    for option in frequency::lf_lp_options(freq0, pulse_clock)? {
        println!(
            "LF={} LP={:>3} freq={:>10.3} error={:.4}",
            option.decay.leakage_factor,
            option.decay.leakage_period,
            option.frequency,
            option.relative_error
        );
    }

    let decay = frequency::suggest_lf_lp(freq0, pulse_clock)?;
    println!(
        "suggested: LF={} LP={}",
        decay.leakage_factor, decay.leakage_period
    );

    Ok(())
}

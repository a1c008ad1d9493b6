//! Interactive demo: a test tone through the tube saturator.
//!
//! Type commands to move the knobs while audio runs, e.g. `drive 25`,
//! `tone 0.7`, `noise 0.4`. With the `bounce` feature, `--bounce out.wav`
//! renders offline instead of playing live.

#[cfg(feature = "native")]
fn main() -> anyhow::Result<()> {
    use std::io::{self, Write};
    use std::sync::Arc;
    use triode::platform::CpalOutput;
    use triode::TubeSaturation;

    triode::utils::init_logger();

    let effect = Arc::new(TubeSaturation::default());

    #[cfg(feature = "bounce")]
    {
        let args: Vec<String> = std::env::args().collect();
        if args.len() >= 3 && args[1] == "--bounce" {
            effect.set_drive(20.0);
            effect.set_noise(0.3);
            triode::platform::bounce::bounce_to_wav(&effect, &args[2], 8.0, 44100)?;
            return Ok(());
        }
    }

    let mut output = CpalOutput::new();
    output.initialize()?;
    output.create_stream(effect.clone())?;
    output.start()?;

    println!("tube saturation demo");
    println!("commands: drive <dB> | out <dB> | mix <0-1> | tone <-1..1> | noise <0-1> | q");

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let value: Option<f32> = words.next().and_then(|w| w.parse().ok());

        match (command, value) {
            ("drive", Some(v)) => effect.set_drive(v),
            ("out", Some(v)) => effect.set_output(v),
            ("mix", Some(v)) => effect.set_mix(v),
            ("tone", Some(v)) => effect.set_tone(v),
            ("noise", Some(v)) => effect.set_noise(v),
            ("q", _) => break,
            _ => {
                println!("commands: drive <dB> | out <dB> | mix <0-1> | tone <-1..1> | noise <0-1> | q");
            }
        }
    }

    output.stop()?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    println!("This binary requires the 'native' feature.");
}

//! # Arpeggiator Demo
//!
//! Hold a C major triad, run the arpeggiator in the background and print the
//! MIDI it produces. Halfway through, the tempo doubles and the pattern
//! switches to up-down.
//!
//! **Concepts:** Builder, runner thread, note output queue, live parameter changes
//!
//! ```bash
//! cargo run --example arp_demo
//! ```

use arpeggio::prelude::*;

fn main() -> arpeggio::Result<()> {
    tracing_subscriber::fmt::init();

    let (output, mut receiver) = note_output(0)?;
    let engine = ArpEngine::builder()
        .tempo(100.0)
        .clock_division(4)
        .sink(MidiSink::new(output))
        .build()?;

    for note in [60, 64, 67] {
        engine.note_on(note, 100)?;
    }

    let runner = engine.spawn_runner()?;
    engine.enable();

    let start = std::time::Instant::now();
    let mut switched = false;
    while start.elapsed() < Duration::from_secs(4) {
        if !switched && start.elapsed() >= Duration::from_secs(2) {
            engine.set_tempo(200.0)?;
            engine.set_direction(ArpDirection::UpDown)?;
            println!("-- 200 BPM, up-down --");
            switched = true;
        }

        for event in receiver.drain_due(engine.now()) {
            let kind = if event.is_note_on() { "on " } else { "off" };
            println!(
                "{:>8.1} ms  {} {:?}",
                event.timestamp.as_secs_f64() * 1000.0,
                kind,
                event.note().unwrap_or_default()
            );
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    engine.disable();
    drop(runner);
    for event in receiver.drain_all() {
        println!("flush: off {:?}", event.note().unwrap_or_default());
    }

    Ok(())
}

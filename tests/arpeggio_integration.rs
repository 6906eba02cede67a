//! End-to-end engine behavior on a manual clock.

mod helpers;

use arpeggio::prelude::*;
use helpers::*;

#[test]
fn test_triad_rotation_at_sixteenths() {
    let rig = TestRig::new(120.0, 16);
    rig.hold(&[60, 64, 67]);
    rig.engine.enable();

    let reports = rig.steps(6);
    let notes: Vec<u8> = reports
        .iter()
        .filter_map(|r| r.played.map(|n| n.note))
        .collect();
    assert_eq!(notes, vec![64, 67, 60, 64, 67, 60]);

    let times: Vec<Duration> = reports.iter().map(|r| r.at).collect();
    assert_eq!(
        times,
        vec![
            us(0),
            us(31_250),
            us(62_500),
            us(93_750),
            us(125_000),
            us(156_250)
        ]
    );
}

#[test]
fn test_each_note_released_at_next_firing() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64, 67]);
    rig.engine.enable();
    rig.steps(3);

    let events = rig.drain();
    let kinds: Vec<(Duration, ArpEvent)> = events.iter().map(|e| (e.at, e.event)).collect();
    assert_eq!(
        kinds,
        vec![
            (ms(0), ArpEvent::NoteOn { note: 64, velocity: 100 }),
            (ms(0), ArpEvent::Tick),
            (ms(250), ArpEvent::NoteOff { note: 64 }),
            (ms(250), ArpEvent::NoteOn { note: 67, velocity: 100 }),
            (ms(250), ArpEvent::Tick),
            (ms(500), ArpEvent::NoteOff { note: 67 }),
            (ms(500), ArpEvent::NoteOn { note: 60, velocity: 100 }),
            (ms(500), ArpEvent::Tick),
        ]
    );
}

#[test]
fn test_releasing_all_notes_rests_but_keeps_time() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64]);
    rig.engine.enable();
    rig.step();
    rig.drain();

    assert_eq!(rig.engine.all_notes_off(), 2);
    let rest = rig.step().unwrap();
    assert_eq!(rest.played, None);
    assert_eq!(rest.released, 1);
    assert_eq!(rest.next_deadline, Some(ms(500)));
    assert_eq!(released(&rig.drain()), vec![64]);

    // Pressing again resumes from the start of the rotation
    rig.hold(&[60, 64, 67]);
    let resumed = rig.step().unwrap();
    assert_eq!(resumed.played.map(|n| n.note), Some(64));
}

#[test]
fn test_held_set_changes_between_firings() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64, 67]);
    rig.engine.enable();
    rig.steps(2); // 64, 67

    rig.engine.note_off(67).unwrap();
    let next = rig.step().unwrap();
    assert_eq!(next.played.map(|n| n.note), Some(64));

    let events = rig.drain();
    // 67 still gets its note-off even though it is no longer held
    assert_eq!(released(&events), vec![64, 67]);
    assert_eq!(played(&events), vec![64, 67, 64]);
}

#[test]
fn test_single_note_retriggers() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[72]);
    rig.engine.enable();
    rig.steps(3);

    let events = rig.drain();
    assert_eq!(played(&events), vec![72, 72, 72]);
    assert_eq!(released(&events), vec![72, 72]);
}

#[test]
fn test_velocity_follows_registry() {
    let rig = TestRig::new(60.0, 4);
    rig.engine.note_on(60, 30).unwrap();
    rig.engine.note_on(64, 110).unwrap();
    rig.engine.enable();

    let first = rig.step().unwrap().played.unwrap();
    assert_eq!(first, HeldNote::new(64, 110));

    rig.engine.note_on(60, 55).unwrap();
    let second = rig.step().unwrap().played.unwrap();
    assert_eq!(second, HeldNote::new(60, 55));
}

#[test]
fn test_disable_flushes_and_reenable_restarts() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64, 67]);
    rig.engine.enable();
    rig.steps(2);
    rig.drain();

    rig.clock.set(ms(300));
    assert!(rig.engine.disable().changed());
    assert_eq!(rig.engine.next_deadline(), None);
    let flushed = rig.drain();
    assert_eq!(released(&flushed), vec![67]);
    assert_eq!(flushed[0].at, ms(300));

    // Nothing fires while disabled, however far time moves
    rig.clock.set(ms(5_000));
    assert!(rig.engine.poll().is_none());

    rig.engine.enable();
    assert_eq!(rig.engine.next_deadline(), Some(ms(5_000)));
    let report = rig.engine.poll().unwrap();
    assert_eq!(report.at, ms(5_000));
    assert_eq!(report.played.map(|n| n.note), Some(64));
}

#[test]
fn test_tempo_change_keeps_pending_deadline() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64]);
    rig.engine.enable();
    rig.step();
    assert_eq!(rig.engine.next_deadline(), Some(ms(250)));

    rig.engine.set_tempo(120.0).unwrap();
    assert_eq!(rig.engine.next_deadline(), Some(ms(250)));

    let report = rig.step().unwrap();
    assert_eq!(report.next_deadline, Some(ms(375)));
}

#[test]
fn test_clock_division_change_applies_on_reschedule() {
    let rig = TestRig::new(120.0, 4);
    rig.hold(&[60]);
    rig.engine.enable();
    rig.step();
    assert_eq!(rig.engine.next_deadline(), Some(ms(125)));

    rig.engine.set_clock_division(8).unwrap();
    let report = rig.step().unwrap();
    assert_eq!(report.next_deadline, Some(us(187_500)));
}

#[test]
fn test_invalid_tempo_is_rejected_and_timing_unchanged() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64]);
    rig.engine.enable();
    rig.step();

    assert!(matches!(
        rig.engine.set_tempo(0.0),
        Err(Error::Core(arpeggio::core::Error::InvalidParameter {
            name: "tempo",
            ..
        }))
    ));
    assert!(rig.engine.set_tempo(-120.0).is_err());
    assert!(rig.engine.set_tempo(f64::INFINITY).is_err());

    let report = rig.step().unwrap();
    assert_eq!(report.next_deadline, Some(ms(500)));
}

#[test]
fn test_unschedulable_interval_is_rejected() {
    let rig = TestRig::new(120.0, 16);
    rig.hold(&[60, 64]);
    rig.engine.enable();
    rig.step();

    // Each value is valid on its own, but the pair gives a zero-length step
    assert!(matches!(
        rig.engine.set_clock_division(u32::MAX),
        Err(Error::Core(arpeggio::core::Error::InvalidParameter {
            name: "interval",
            ..
        }))
    ));
    assert!(rig.engine.set_tempo(1e300).is_err());
    assert!(rig
        .engine
        .set_params(ArpParams {
            tempo: 1e300,
            ..ArpParams::default()
        })
        .is_err());
    assert_eq!(rig.engine.tempo(), 120.0);
    assert_eq!(rig.engine.clock_division(), 16);

    // Timing carries on and every note-on is matched by the next firing
    let report = rig.step().unwrap();
    assert_eq!(report.played.map(|n| n.note), Some(60));
    assert_eq!(report.next_deadline, Some(us(62_500)));
    assert!(rig.step().is_some());
    assert_eq!(rig.engine.state(), SchedulerState::Running);

    let events = rig.drain();
    assert_eq!(played(&events), vec![64, 60, 64]);
    assert_eq!(released(&events), vec![64, 60]);
}

#[test]
fn test_builder_rejects_unschedulable_interval() {
    assert!(ArpEngine::builder().tempo(1e300).build().is_err());
    assert!(ArpEngine::builder()
        .tempo(120.0)
        .clock_division(u32::MAX)
        .build()
        .is_err());
}

#[test]
fn test_down_and_updown_patterns() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64, 67]);
    rig.engine.set_direction(ArpDirection::Down).unwrap();
    rig.engine.enable();
    rig.steps(3);
    assert_eq!(played(&rig.drain()), vec![67, 64, 60]);

    rig.engine.disable();
    rig.engine.set_direction(ArpDirection::UpDown).unwrap();
    rig.engine.enable();
    rig.drain();
    rig.steps(5);
    assert_eq!(played(&rig.drain()), vec![64, 67, 64, 60, 64]);
}

#[test]
fn test_rotation_from_first() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60, 64, 67]);
    rig.engine
        .set_rotation_start(RotationStart::FromFirst)
        .unwrap();
    rig.engine.enable();
    rig.steps(4);
    assert_eq!(played(&rig.drain()), vec![60, 64, 67, 60]);
}

#[test]
fn test_tempo_echo_follows_tick() {
    let rig = TestRig::new(90.0, 4);
    rig.hold(&[60]);
    rig.engine.set_echo_tempo(true).unwrap();
    rig.engine.enable();
    rig.step();

    let events: Vec<ArpEvent> = rig.drain().into_iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![
            ArpEvent::NoteOn {
                note: 60,
                velocity: 100
            },
            ArpEvent::Tick,
            ArpEvent::TempoEcho(90.0),
        ]
    );
}

#[test]
fn test_rest_emits_no_tick() {
    let rig = TestRig::new(60.0, 4);
    rig.engine.enable();
    let report = rig.step().unwrap();
    assert_eq!(report.played, None);
    assert!(rig.drain().is_empty());
    assert_eq!(rig.engine.firings(), 1);
}

#[test]
fn test_external_clock_is_ignored_for_timing() {
    let rig = TestRig::new(60.0, 4);
    rig.hold(&[60]);
    rig.engine.enable();
    rig.step();

    for _ in 0..96 {
        rig.engine.clock_pulse();
    }
    assert!(rig.engine.poll().is_none());
    assert_eq!(rig.engine.next_deadline(), Some(ms(250)));
    assert_eq!(rig.engine.clock_pulses(), 96);
}

#[test]
fn test_note_input_from_other_threads() {
    let rig = TestRig::new(60.0, 4);
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let engine = rig.engine.clone();
            std::thread::spawn(move || {
                for note in (i * 32)..(i * 32 + 32) {
                    engine.note_on(note, 64).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(rig.engine.held_notes().len(), 128);

    rig.engine.enable();
    let report = rig.step().unwrap();
    assert_eq!(report.played.map(|n| n.note), Some(1));
}

#[test]
fn test_params_snapshot_roundtrip() {
    let rig = TestRig::new(60.0, 4);
    let params = ArpParams {
        tempo: 140.0,
        clock_division: 3,
        direction: ArpDirection::UpDown,
        rotation: RotationStart::FromFirst,
        echo_tempo: true,
    };
    rig.engine.set_params(params.clone()).unwrap();
    assert_eq!(*rig.engine.params(), params);

    let bad = ArpParams {
        clock_division: 0,
        ..params.clone()
    };
    assert!(rig.engine.set_params(bad).is_err());
    assert_eq!(*rig.engine.params(), params);
}

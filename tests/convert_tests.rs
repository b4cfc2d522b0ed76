//! End-to-end conversions of small event streams, checked pixel by pixel.

mod common;

use common::*;
use midi2roll::{
    convert_stream, ConversionState, RollConverter, RollError, TimedEvent, Track, TrackerBarKind,
};
use pretty_assertions::assert_eq;

fn note_on(tick: u64, channel: u8, note: u8) -> TimedEvent {
    TimedEvent::NoteOn { channel, note, velocity: 64, tick }
}

fn note_off(tick: u64, channel: u8, note: u8) -> TimedEvent {
    TimedEvent::NoteOff { channel, note, tick }
}

fn sustain(tick: u64, value: u8) -> TimedEvent {
    TimedEvent::ControlChange { channel: 0, controller: 64, value, tick }
}

/// One track ending at tick 480, so every roll below is 1500 px tall.
fn one_beat(events: Vec<TimedEvent>) -> midi2roll::EventStream {
    midi2roll::EventStream::new(480, vec![Track { events, end_tick: 480 }])
}

#[test]
fn middle_c_on_88_note_roll() {
    let config = reference_config();
    let stream = one_beat(vec![tempo_96(0), note_on(0, 0, 60), note_off(480, 0, 60)]);
    let roll = convert_stream(&stream, "88-Note", config.clone()).unwrap();

    assert_eq!(roll.summary.width_px, 3525);
    assert_eq!(roll.summary.height_px, 1500);
    assert_eq!(roll.summary.bpm, 96.0);
    assert_eq!(roll.summary.holes_painted, 1);
    assert_eq!(roll.summary.events_skipped, 0);

    let x = lane_centre(TrackerBarKind::EightyEightNote, &config, 45);
    assert_eq!(x, 1612);
    assert_eq!(white_runs(&roll.image, x), vec![(602, 898)]);
    assert_eq!(roll.image.pixel(x, 601), Some(PAPER));
    assert_eq!(roll.image.pixel(x, 899), Some(PAPER));
}

#[test]
fn margins_are_white_paper_is_gray() {
    let stream = one_beat(vec![tempo_96(0)]);
    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    let image = &roll.image;

    for y in [0, 750, 1499] {
        assert_eq!(image.pixel(0, y), Some(WHITE));
        assert_eq!(image.pixel(75, y), Some(WHITE));
        assert_eq!(image.pixel(76, y), Some(PAPER));
        assert_eq!(image.pixel(3449, y), Some(PAPER));
        assert_eq!(image.pixel(3450, y), Some(WHITE));
        assert_eq!(image.pixel(3524, y), Some(WHITE));
    }
    assert_eq!(image.count(WHITE), (76 + 75) * 1500);
    assert_eq!(roll.summary.holes_painted, 0);
}

#[test]
fn repeated_note_off_paints_once() {
    let base = vec![tempo_96(0), note_on(0, 0, 60), note_off(480, 0, 60)];
    let mut repeated = base.clone();
    repeated.push(note_off(480, 0, 60));
    repeated.push(TimedEvent::NoteOn { channel: 0, note: 60, velocity: 0, tick: 480 });

    let once = convert_stream(&one_beat(base), "88-Note", reference_config()).unwrap();
    let twice = convert_stream(&one_beat(repeated), "88-Note", reference_config()).unwrap();
    assert_eq!(twice.summary.holes_painted, 1);
    assert!(once.image == twice.image);
}

#[test]
fn sustain_pedal_punches_hole_three() {
    let config = reference_config();
    let stream = one_beat(vec![tempo_96(0), sustain(0, 100), sustain(200, 0)]);
    let roll = convert_stream(&stream, "88-Note", config.clone()).unwrap();

    // 200 ticks = 125 px; roll span 602..723
    let x = lane_centre(TrackerBarKind::EightyEightNote, &config, 3);
    assert_eq!(white_runs(&roll.image, x), vec![(777, 898)]);

    let mut with_release = stream.clone();
    with_release.tracks[0].events.push(sustain(300, 0));
    let again = convert_stream(&with_release, "88-Note", config).unwrap();
    assert!(again.image == roll.image);
}

#[test]
fn soft_pedal_is_hole_ninety_eight() {
    let config = reference_config();
    let stream = one_beat(vec![
        tempo_96(0),
        TimedEvent::ControlChange { channel: 3, controller: 67, value: 127, tick: 0 },
        TimedEvent::ControlChange { channel: 3, controller: 67, value: 0, tick: 480 },
        // other controllers drive nothing
        TimedEvent::ControlChange { channel: 0, controller: 7, value: 100, tick: 0 },
    ]);
    let roll = convert_stream(&stream, "88-Note", config.clone()).unwrap();
    let x = lane_centre(TrackerBarKind::EightyEightNote, &config, 98);
    assert_eq!(white_runs(&roll.image, x), vec![(602, 898)]);
    assert_eq!(roll.summary.holes_painted, 1);
}

#[test]
fn ampico_a_slow_crescendo_is_shortened() {
    let config = reference_config();
    let x = lane_centre(TrackerBarKind::AmpicoA, &config, 1);

    let long = one_beat(vec![tempo_96(0), note_on(0, 0, 16), note_off(480, 0, 16)]);
    let roll = convert_stream(&long, "Ampico A", config.clone()).unwrap();
    // 643.625..856.375 in roll space
    assert_eq!(white_runs(&roll.image, x), vec![(644, 857)]);

    let short = one_beat(vec![tempo_96(0), note_on(0, 0, 16), note_off(60, 0, 16)]);
    let roll = convert_stream(&short, "Ampico A", config).unwrap();
    // collapsed to one hole width around 618.5
    assert_eq!(white_runs(&roll.image, x), vec![(871, 892)]);
}

#[test]
fn ampico_a_ordinary_note_is_not_shaped() {
    let config = reference_config();
    let stream = one_beat(vec![tempo_96(0), note_on(0, 0, 60), note_off(480, 0, 60)]);
    let roll = convert_stream(&stream, "Ampico A", config.clone()).unwrap();
    let x = lane_centre(TrackerBarKind::AmpicoA, &config, 45);
    assert_eq!(white_runs(&roll.image, x), vec![(602, 898)]);
}

#[test]
fn events_before_first_tempo_are_dropped() {
    let notes = Track { events: vec![note_on(0, 0, 60), note_off(480, 0, 60)], end_tick: 480 };
    let tempo = Track::from_events(vec![tempo_96(0)]);
    let stream = midi2roll::EventStream::new(480, vec![notes, tempo]);

    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    assert_eq!(roll.summary.height_px, 1500);
    assert_eq!(roll.summary.holes_painted, 0);
    let x = lane_centre(TrackerBarKind::EightyEightNote, &reference_config(), 45);
    assert!(white_runs(&roll.image, x).is_empty());
}

#[test]
fn stream_without_tempo_uses_eighty_bpm() {
    let stream = one_beat(vec![note_on(0, 0, 60), note_off(480, 0, 60)]);
    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();

    // one beat at 80 BPM is 360 px
    assert_eq!(roll.summary.bpm, 80.0);
    assert_eq!(roll.summary.height_px, 1560);
    let x = lane_centre(TrackerBarKind::EightyEightNote, &reference_config(), 45);
    assert_eq!(white_runs(&roll.image, x), vec![(602, 958)]);
}

#[test]
fn notes_off_the_bar_are_skipped() {
    let stream = one_beat(vec![
        tempo_96(0),
        note_on(0, 0, 10),
        note_off(480, 0, 10),
        note_on(0, 0, 60),
        note_off(480, 0, 60),
    ]);
    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    assert_eq!(roll.summary.events_skipped, 2);
    assert_eq!(roll.summary.holes_painted, 1);
}

#[test]
fn notes_past_the_last_hole_are_skipped() {
    // note 127 is index 112, past the 100 holes of the bar
    let blank = one_beat(vec![tempo_96(0)]);
    let blank = convert_stream(&blank, "88-Note", reference_config()).unwrap();
    let stream = one_beat(vec![tempo_96(0), note_on(0, 0, 127), note_off(480, 0, 127)]);
    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    assert_eq!(roll.summary.events_skipped, 2);
    assert_eq!(roll.summary.holes_painted, 0);
    assert!(roll.image == blank.image);
}

#[test]
fn long_note_is_chain_perforated() {
    let config = reference_config();
    let notes = Track {
        events: vec![tempo_96(0), note_on(0, 0, 60), note_off(4800, 0, 60)],
        end_tick: 4800,
    };
    let stream = midi2roll::EventStream::new(480, vec![notes]);
    let roll = convert_stream(&stream, "88-Note", config.clone()).unwrap();
    // ten beats = 3000 px of music plus 1200 px of padding
    assert_eq!(roll.summary.height_px, 4200);
    assert_eq!(roll.summary.holes_painted, 1);

    // hole spans rows 602..=3598; dots every 21 + 12 px while more than
    // 900 px remain, then one slot down to the bottom
    let x = lane_centre(TrackerBarKind::EightyEightNote, &config, 45);
    let runs = white_runs(&roll.image, x);
    assert_eq!(runs.len(), 65);

    let (dots, slot) = runs.split_at(64);
    assert_eq!(dots[0], (603, 622));
    for pair in dots.windows(2) {
        assert_eq!(pair[1].0 - pair[0].0, 33);
        assert_eq!(pair[1].1 - pair[1].0, 19);
    }
    assert_eq!(dots[63], (2682, 2701));
    assert_eq!(slot, &[(2714, 3598)]);
}

#[test]
fn note_closed_by_a_later_track() {
    let on = Track { events: vec![tempo_96(0), note_on(240, 0, 60)], end_tick: 480 };
    let off = Track { events: vec![note_off(0, 0, 60)], end_tick: 480 };
    let stream = midi2roll::EventStream::new(480, vec![on, off]);

    let roll = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    assert_eq!(roll.summary.holes_painted, 1);
    let x = lane_centre(TrackerBarKind::EightyEightNote, &reference_config(), 45);
    let runs = white_runs(&roll.image, x);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].1 - runs[0].0, 21);
}

#[test]
fn duo_art_keyboards_by_channel() {
    let config = reference_config();
    let stream = one_beat(vec![
        tempo_96(0),
        // Great, channel 1
        note_on(0, 0, 36),
        note_off(480, 0, 36),
        // Swell, channel 2
        note_on(0, 1, 36),
        note_off(480, 1, 36),
    ]);
    let roll = convert_stream(&stream, "Aeolian 176-note", config.clone()).unwrap();
    assert_eq!(roll.summary.tracker_bar, "Aeolian 176-note");
    assert_eq!(roll.summary.holes_painted, 2);

    let great = lane_centre(TrackerBarKind::DuoArtOrgan, &config, 33);
    assert_eq!(white_runs(&roll.image, great), vec![(602, 898)]);

    // even holes lead by a quarter inch
    let swell = lane_centre(TrackerBarKind::DuoArtOrgan, &config, 32);
    assert_eq!(white_runs(&roll.image, swell), vec![(677, 973)]);
}

#[test]
fn duo_art_alias_and_unmapped_note() {
    let config = reference_config();
    let stream = one_beat(vec![tempo_96(0), note_on(0, 9, 60), note_off(480, 9, 60)]);
    let roll = convert_stream(&stream, "Duo-Art Organ", config.clone()).unwrap();
    // unmapped notes fall back to note - 15
    let x = lane_centre(TrackerBarKind::DuoArtOrgan, &config, 45);
    assert_eq!(white_runs(&roll.image, x).len(), 1);
}

#[test]
fn unknown_tracker_bar() {
    let stream = one_beat(vec![tempo_96(0)]);
    let err = convert_stream(&stream, "Welte T-100", reference_config()).unwrap_err();
    match err {
        RollError::UnknownTrackerBar(name) => assert_eq!(name, "Welte T-100"),
        other => panic!("expected UnknownTrackerBar, got {other:?}"),
    }
}

#[test]
fn acceleration_lengthens_the_roll() {
    let stream = stream(vec![tempo_96(0), note_on(0, 0, 60), note_off(48_000, 0, 60)]);
    let plain = convert_stream(&stream, "88-Note", reference_config()).unwrap();
    let config = midi2roll::RollConfig { compensate_accel: true, ..reference_config() };
    let accel = convert_stream(&stream, "88-Note", config).unwrap();
    assert!(accel.summary.height_px > plain.summary.height_px);
    assert!(accel.summary.length_feet > plain.summary.length_feet);
}

#[test]
fn converter_is_single_use() {
    let stream = one_beat(vec![tempo_96(0)]);
    let mut converter = RollConverter::new("Ampico B", reference_config()).unwrap();
    converter.convert(&stream).unwrap();
    assert_eq!(converter.state(), ConversionState::Done);
    assert!(matches!(converter.convert(&stream), Err(RollError::SessionFinished)));
}

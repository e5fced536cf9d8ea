mod common;

use common::{AudioCall, Harness};
use lyrica_core::audio::AudioEvent;
use lyrica_core::engine::EngineEvent;
use lyrica_core::report::{PlayEvent, Report};
use lyrica_core::state::RepeatMode;

const ABC: &[&str] = &["A", "B", "C"];

fn play_reports(h: &Harness) -> Vec<(usize, String)> {
    h.sink
        .taken()
        .into_iter()
        .filter_map(|r| match r {
            Report::Play(PlayEvent {
                song_id,
                song_title,
            }) => Some((song_id, song_title)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn select_loads_plays_and_logs_one_based_id() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(1).await;

    assert_eq!(h.current(), Some(1));
    assert!(h.playing());
    assert_eq!(
        h.engine.audio().calls,
        vec![AudioCall::Load("/songs/b.mp3".to_string()), AudioCall::Play]
    );
    assert_eq!(play_reports(&h), vec![(2, "B".to_string())]);
}

#[tokio::test]
async fn select_resets_position_and_duration() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.on_metadata_loaded(120.0);
    h.engine.on_time_updated(42.0);

    h.engine.select_track(2).await;
    assert_eq!(h.engine.state().position, 0.0);
    assert_eq!(h.engine.state().duration, None);
}

#[tokio::test]
async fn unknown_track_is_rejected_with_warning() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(9).await;

    assert_eq!(h.current(), None);
    assert!(h.engine.audio().calls.is_empty());
    assert_eq!(h.warnings().len(), 1);
}

#[tokio::test]
async fn rejected_play_leaves_track_current_but_paused() {
    let mut h = Harness::new(ABC);
    h.engine.audio_mut().fail_play = true;
    h.engine.select_track(1).await;

    assert_eq!(h.current(), Some(1));
    assert!(!h.playing());
    assert!(play_reports(&h).is_empty());
    let warnings = h.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("/songs/b.mp3"), "{}", warnings[0]);
}

#[tokio::test]
async fn failed_load_is_retried_by_toggle() {
    let mut h = Harness::new(ABC);
    h.engine
        .audio_mut()
        .fail_load
        .insert("/songs/b.mp3".to_string());
    h.engine.select_track(1).await;
    assert!(!h.playing());
    assert!(!h.engine.audio().calls.contains(&AudioCall::Play));

    h.engine.audio_mut().fail_load.clear();
    h.engine.toggle_play_pause().await;
    assert!(h.playing());
    assert_eq!(h.engine.audio().loads().len(), 2);
}

#[tokio::test]
async fn toggle_with_nothing_selected_starts_first_track() {
    let mut h = Harness::new(ABC);
    h.engine.toggle_play_pause().await;

    assert_eq!(h.current(), Some(0));
    assert!(h.playing());
}

#[tokio::test]
async fn toggle_pauses_and_resumes_without_new_play_report() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;

    h.engine.toggle_play_pause().await;
    assert!(!h.playing());
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Pause));

    h.engine.toggle_play_pause().await;
    assert!(h.playing());
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Play));
    assert_eq!(play_reports(&h).len(), 1);
}

#[tokio::test]
async fn next_advances_in_catalog_order() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.next().await;
    assert_eq!(h.current(), Some(1));
    h.engine.next().await;
    assert_eq!(h.current(), Some(2));
}

#[tokio::test]
async fn next_without_selection_moves_past_first_track() {
    let mut h = Harness::new(ABC);
    h.engine.next().await;
    assert_eq!(h.current(), Some(1));
}

#[tokio::test]
async fn next_at_end_stops_when_repeat_off() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(2).await;
    h.engine.next().await;

    assert_eq!(h.current(), Some(2));
    assert!(!h.playing());
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Pause));
}

#[tokio::test]
async fn next_at_end_wraps_when_repeat_all() {
    let mut h = Harness::new(ABC);
    h.engine.cycle_repeat();
    assert_eq!(h.engine.state().repeat_mode, RepeatMode::All);
    h.engine.select_track(2).await;
    h.engine.next().await;

    assert_eq!(h.current(), Some(0));
    assert!(h.playing());
}

#[tokio::test]
async fn previous_wraps_from_first_to_last() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.previous().await;
    assert_eq!(h.current(), Some(2));
}

#[tokio::test]
async fn previous_restarts_after_threshold() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(1).await;
    h.engine.on_time_updated(10.0);
    h.engine.previous().await;

    assert_eq!(h.current(), Some(1));
    assert_eq!(h.engine.state().position, 0.0);
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Seek(0.0)));
    assert_eq!(play_reports(&h).len(), 1);
}

#[tokio::test]
async fn previous_within_threshold_goes_back() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(1).await;
    h.engine.on_time_updated(3.0);
    h.engine.previous().await;
    assert_eq!(h.current(), Some(0));
}

#[tokio::test]
async fn previous_under_shuffle_picks_another_track() {
    let mut h = Harness::new(&["A", "B", "C", "D", "E"]);
    h.engine.cycle_shuffle();
    h.engine.select_track(2).await;

    for _ in 0..50 {
        let before = h.current();
        let loads = h.engine.audio().loads().len();
        h.engine.on_time_updated(1.0);
        h.engine.previous().await;

        assert_ne!(h.current(), before);
        assert_eq!(h.engine.audio().loads().len(), loads + 1);
        assert!(!h.engine.audio().calls.contains(&AudioCall::Seek(0.0)));
    }
}

#[tokio::test]
async fn shuffle_never_picks_current_track() {
    let mut h = Harness::new(&["A", "B", "C", "D", "E"]);
    h.engine.cycle_shuffle();
    h.engine.select_track(0).await;

    for _ in 0..100 {
        let before = h.current();
        h.engine.next().await;
        assert_ne!(h.current(), before);
        assert!(h.current().unwrap() < 5);
    }
}

#[tokio::test]
async fn shuffle_reaches_every_other_track() {
    let mut h = Harness::new(&["A", "B", "C", "D"]);
    h.engine.cycle_shuffle();
    let mut seen = [false; 4];
    for _ in 0..200 {
        h.engine.select_track(0).await;
        h.engine.next().await;
        seen[h.current().unwrap()] = true;
    }
    assert_eq!(seen, [false, true, true, true]);
}

#[tokio::test]
async fn shuffle_with_single_track_replays_it() {
    let mut h = Harness::new(&["Solo"]);
    h.engine.cycle_shuffle();
    h.engine.select_track(0).await;
    h.engine.next().await;

    assert_eq!(h.current(), Some(0));
    assert_eq!(h.engine.audio().loads().len(), 2);
}

#[tokio::test]
async fn ended_advances_then_stops_at_end() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(1).await;
    h.engine.apply_audio_event(AudioEvent::Ended).await;
    assert_eq!(h.current(), Some(2));
    assert!(h.playing());

    h.engine.apply_audio_event(AudioEvent::Ended).await;
    assert_eq!(h.current(), Some(2));
    assert!(!h.playing());
}

#[tokio::test]
async fn ended_wraps_under_repeat_all() {
    let mut h = Harness::new(ABC);
    h.engine.cycle_repeat();
    h.engine.select_track(2).await;
    h.engine.on_track_ended().await;
    assert_eq!(h.current(), Some(0));
    assert_eq!(play_reports(&h).last(), Some(&(1, "A".to_string())));
}

#[tokio::test]
async fn ended_restarts_under_repeat_one() {
    let mut h = Harness::new(ABC);
    h.engine.cycle_repeat();
    h.engine.cycle_repeat();
    assert_eq!(h.engine.state().repeat_mode, RepeatMode::One);
    h.engine.select_track(1).await;
    h.engine.on_time_updated(200.0);
    let before = h.engine.audio().calls.len();

    h.engine.apply_audio_event(AudioEvent::Ended).await;
    assert_eq!(h.current(), Some(1));
    assert_eq!(h.engine.state().position, 0.0);
    assert!(h.playing());
    assert_eq!(
        &h.engine.audio().calls[before..],
        &[AudioCall::Seek(0.0), AudioCall::Play]
    );
}

#[tokio::test]
async fn repeat_one_pauses_when_replay_is_refused() {
    let mut h = Harness::new(ABC);
    h.engine.cycle_repeat();
    h.engine.cycle_repeat();
    h.engine.select_track(0).await;
    h.engine.audio_mut().fail_play = true;

    h.engine.on_track_ended().await;
    assert_eq!(h.current(), Some(0));
    assert!(!h.playing());
    assert_eq!(h.warnings().len(), 1);
}

#[tokio::test]
async fn repeat_one_does_not_pin_manual_next() {
    let mut h = Harness::new(ABC);
    h.engine.cycle_repeat();
    h.engine.cycle_repeat();
    h.engine.select_track(0).await;
    h.engine.next().await;
    assert_eq!(h.current(), Some(1));
}

#[tokio::test]
async fn ended_with_nothing_selected_is_ignored() {
    let mut h = Harness::new(ABC);
    h.engine.on_track_ended().await;
    assert_eq!(h.current(), None);
    assert!(h.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn seek_is_clamped_to_duration() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.on_metadata_loaded(100.0);

    h.engine.seek(500.0).await;
    assert_eq!(h.engine.state().position, 100.0);
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Seek(100.0)));

    h.engine.seek(-5.0).await;
    assert_eq!(h.engine.state().position, 0.0);

    h.engine.seek(40.0).await;
    h.engine.seek_relative(-10.0).await;
    assert_eq!(h.engine.state().position, 30.0);
}

#[tokio::test]
async fn seek_without_track_does_nothing() {
    let mut h = Harness::new(ABC);
    h.engine.seek(10.0).await;
    assert!(h.engine.audio().calls.is_empty());
    assert_eq!(h.engine.state().position, 0.0);
}

#[tokio::test]
async fn time_updates_are_clamped() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.on_metadata_loaded(60.0);
    h.engine.on_time_updated(75.0);
    assert_eq!(h.engine.state().position, 60.0);
    h.engine.on_time_updated(f64::NAN);
    assert_eq!(h.engine.state().position, 0.0);
}

#[tokio::test]
async fn bogus_durations_are_ignored() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.on_metadata_loaded(-1.0);
    h.engine.on_metadata_loaded(f64::INFINITY);
    assert_eq!(h.engine.state().duration, None);
    h.engine.on_metadata_loaded(215.5);
    assert_eq!(h.engine.state().duration, Some(215.5));
}

#[tokio::test]
async fn volume_is_clamped_and_nan_ignored() {
    let mut h = Harness::new(ABC);
    h.engine.set_volume(1.7).await;
    assert_eq!(h.engine.state().volume, 1.0);
    assert_eq!(h.engine.audio().last(), Some(&AudioCall::Volume(1.0)));

    h.engine.set_volume(-0.2).await;
    assert_eq!(h.engine.state().volume, 0.0);

    let calls = h.engine.audio().calls.len();
    h.engine.set_volume(f32::NAN).await;
    assert_eq!(h.engine.state().volume, 0.0);
    assert_eq!(h.engine.audio().calls.len(), calls);
}

#[tokio::test]
async fn media_error_pauses_and_toggle_reloads() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(2).await;
    h.engine
        .apply_audio_event(AudioEvent::Error {
            message: "decoder failed".to_string(),
        })
        .await;

    assert!(!h.playing());
    assert_eq!(h.current(), Some(2));
    assert!(h.warnings()[0].contains("decoder failed"));

    h.engine.toggle_play_pause().await;
    assert!(h.playing());
    assert_eq!(h.engine.audio().loads().len(), 2);
    assert_eq!(play_reports(&h).len(), 2);
}

#[tokio::test]
async fn media_error_with_nothing_loaded_is_ignored() {
    let mut h = Harness::new(ABC);
    h.engine
        .apply_audio_event(AudioEvent::Error {
            message: "stale end-file".to_string(),
        })
        .await;
    assert!(h.warnings().is_empty());
    assert_eq!(h.current(), None);
}

#[tokio::test]
async fn every_transition_notifies_state() {
    let mut h = Harness::new(ABC);
    h.engine.select_track(0).await;
    h.engine.cycle_shuffle();

    let events = h.events.lock().unwrap();
    match events.last() {
        Some(EngineEvent::StateChanged(state)) => {
            assert!(state.shuffle);
            assert_eq!(state.current_track_id, Some(0));
        }
        other => panic!("unexpected last event {:?}", other),
    }
}

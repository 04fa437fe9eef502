//! Queue manager integration tests
//!
//! Real-world scenarios: playing an album, next/previous buttons, editing
//! the queue while something plays, and what observers see for each.


use cadence_core::SongId;
use cadence_queue::{
    QueueChangeReason, QueueConfig, QueueManager, RepeatMode, SharedQueueManager, ShuffleMode,
};
use std::sync::Arc;
use test_helpers::{current_song, init_logging, song_ids, songs, Event, Recorder};

fn manager_with_recorder() -> (QueueManager, Arc<Recorder>) {
    init_logging();
    let recorder = Recorder::new();
    let mut manager = QueueManager::default();
    assert!(manager.add_callback(recorder.clone()));
    (manager, recorder)
}

// ===== Queue Creation =====

#[test]
fn test_play_album_from_second_track() {
    let (mut manager, recorder) = manager_with_recorder();

    assert!(manager.set_queue(songs(&[1, 2, 3]), None, 1));

    assert_eq!(current_song(&manager), Some(2));
    assert_eq!(manager.current_position(), Some(1));
    assert_eq!(
        recorder.take(),
        vec![
            Event::QueueChanged {
                reason: QueueChangeReason::Default,
                songs: vec![1, 2, 3],
            },
            Event::Position(None, Some(1)),
            Event::Restored,
        ]
    );
}

#[test]
fn test_invalid_position_leaves_existing_queue_alone() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    recorder.take();

    assert!(!manager.set_queue(songs(&[7, 8]), None, 2));

    assert_eq!(song_ids(&manager.get_queue()), vec![1, 2, 3]);
    assert_eq!(current_song(&manager), Some(1));
    assert!(recorder.take().is_empty());
}

#[test]
fn test_replacing_queue_changes_items_and_current() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    recorder.take();

    assert!(manager.set_queue(songs(&[4, 5]), None, 1));

    assert_eq!(song_ids(&manager.get_queue()), vec![4, 5]);
    assert_eq!(current_song(&manager), Some(5));
    let events = recorder.take();
    assert_eq!(
        events[0],
        Event::QueueChanged {
            reason: QueueChangeReason::Default,
            songs: vec![4, 5],
        }
    );
    assert!(matches!(events[1], Event::Position(_, Some(1))));
}

// ===== Shuffle =====

#[test]
fn test_enable_shuffle_keeps_playing_song_first() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 1);

    manager.set_shuffle_mode(ShuffleMode::On, true);

    assert_eq!(
        manager.get_queue_for(ShuffleMode::On)[0].song().id,
        SongId::new(2)
    );
    assert_eq!(manager.current_position(), Some(0));
    assert_eq!(current_song(&manager), Some(2));
}

#[test]
fn test_shuffle_order_contains_same_items() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3, 4, 5, 6, 7, 8]), None, 0);
    manager.set_shuffle_mode(ShuffleMode::On, true);

    let mut base: Vec<_> = manager.get_queue_for(ShuffleMode::Off);
    let mut shuffled: Vec<_> = manager.get_queue_for(ShuffleMode::On);
    base.sort_by_key(|item| item.id().to_string());
    shuffled.sort_by_key(|item| item.id().to_string());
    assert_eq!(base, shuffled);
}

#[test]
fn test_disable_shuffle_returns_to_base_position() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3, 4]), None, 2);
    manager.set_shuffle_mode(ShuffleMode::On, true);
    recorder.take();

    manager.set_shuffle_mode(ShuffleMode::Off, false);

    assert_eq!(manager.current_position(), Some(2));
    assert_eq!(
        recorder.take(),
        vec![
            Event::Shuffle(ShuffleMode::Off),
            Event::QueueChanged {
                reason: QueueChangeReason::Default,
                songs: vec![1, 2, 3, 4],
            },
            Event::Position(Some(0), Some(2)),
        ]
    );
}

#[test]
fn test_new_queue_turns_shuffle_off_by_default() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    manager.toggle_shuffle_mode();
    assert_eq!(manager.shuffle_mode(), ShuffleMode::On);

    manager.set_queue(songs(&[4, 5, 6]), None, 0);

    assert_eq!(manager.shuffle_mode(), ShuffleMode::Off);
    assert_eq!(song_ids(&manager.get_queue()), vec![4, 5, 6]);
}

#[test]
fn test_new_queue_keeps_shuffle_when_configured() {
    init_logging();
    let mut manager = QueueManager::new(QueueConfig {
        retain_shuffle_on_new_queue: true,
        ..QueueConfig::default()
    });
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    manager.toggle_shuffle_mode();

    manager.set_queue(songs(&[4, 5, 6, 7]), None, 3);

    assert_eq!(manager.shuffle_mode(), ShuffleMode::On);
    assert_eq!(current_song(&manager), Some(7));
    assert_eq!(manager.current_position(), Some(0));
}

#[test]
fn test_explicit_shuffle_order_is_used() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_shuffle_mode(ShuffleMode::On, false);

    manager.set_queue(songs(&[1, 2, 3, 4]), Some(songs(&[4, 2, 1, 3])), 0);

    assert_eq!(song_ids(&manager.get_queue()), vec![4, 2, 1, 3]);
    assert_eq!(current_song(&manager), Some(4));
    assert_eq!(song_ids(&manager.get_queue_for(ShuffleMode::Off)), vec![1, 2, 3, 4]);
}

#[test]
fn test_explicit_shuffle_order_with_shuffle_off_uses_base_position() {
    let (mut manager, _recorder) = manager_with_recorder();

    manager.set_queue(songs(&[1, 2, 3, 4]), Some(songs(&[4, 2, 1, 3])), 0);

    assert_eq!(manager.shuffle_mode(), ShuffleMode::Off);
    assert_eq!(current_song(&manager), Some(1));
    assert_eq!(song_ids(&manager.get_queue_for(ShuffleMode::On)), vec![4, 2, 1, 3]);
}

// ===== Navigation =====

#[test]
fn test_repeat_all_wraps_to_start() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 2);
    manager.set_repeat_mode(RepeatMode::All);

    assert!(manager.skip_to_next(false));

    assert_eq!(current_song(&manager), Some(1));
    assert_eq!(manager.current_position(), Some(0));
}

#[test]
fn test_repeat_off_stops_at_end() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 2);
    recorder.take();

    assert!(!manager.skip_to_next(false));

    assert_eq!(current_song(&manager), Some(3));
    assert!(recorder.take().is_empty());
}

#[test]
fn test_repeat_one_stays_on_song_unless_user_skips() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    manager.set_repeat_mode(RepeatMode::One);

    assert!(manager.skip_to_next(false));
    assert_eq!(current_song(&manager), Some(1));

    // User pressing "next" behaves like repeat-all
    assert!(manager.skip_to_next(true));
    assert_eq!(current_song(&manager), Some(2));
}

#[test]
fn test_previous_has_no_wraparound() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 0);
    manager.set_repeat_mode(RepeatMode::All);

    assert!(manager.get_previous().is_none());
    assert!(!manager.skip_to_previous());
}

#[test]
fn test_navigation_follows_shuffle_order() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_shuffle_mode(ShuffleMode::On, false);
    manager.set_queue(songs(&[1, 2, 3]), Some(songs(&[3, 1, 2])), 0);

    assert!(manager.skip_to_next(false));
    assert_eq!(current_song(&manager), Some(1));
    assert!(manager.skip_to_next(false));
    assert_eq!(current_song(&manager), Some(2));
    assert!(!manager.skip_to_next(false));
}

#[test]
fn test_empty_queue_has_nothing_to_play() {
    let (mut manager, _recorder) = manager_with_recorder();

    assert!(manager.get_next(true).is_none());
    assert!(manager.get_previous().is_none());
    assert!(!manager.skip_to(0));
    assert!(manager.current_position().is_none());
}

// ===== Editing =====

#[test]
fn test_add_to_next_inserts_after_playing_song() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 1);

    manager.add_to_next(songs(&[4]));

    assert_eq!(song_ids(&manager.get_queue_for(ShuffleMode::Off)), vec![1, 2, 4, 3]);
    assert_eq!(current_song(&manager), Some(2));
    assert_eq!(manager.current_position(), Some(1));
}

#[test]
fn test_add_to_next_while_shuffled_plays_next() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3, 4]), None, 0);
    manager.set_shuffle_mode(ShuffleMode::On, true);
    manager.skip_to(1);

    manager.add_to_next(songs(&[9]));

    assert_eq!(manager.get_next(false).unwrap().song().id, SongId::new(9));
    assert_eq!(manager.len(), 5);
    assert_eq!(manager.get_queue_for(ShuffleMode::Off).len(), 5);
}

#[test]
fn test_remove_playing_song_notifies_position() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3]), None, 1);
    recorder.take();

    let playing = manager.current_item().unwrap().clone();
    manager.remove(&[playing]);

    assert_eq!(song_ids(&manager.get_queue()), vec![1, 3]);
    assert_eq!(current_song(&manager), Some(3));
    let events = recorder.take();
    assert_eq!(
        events,
        vec![
            Event::QueueChanged {
                reason: QueueChangeReason::Default,
                songs: vec![1, 3],
            },
            Event::Position(Some(1), Some(1)),
        ]
    );
}

#[test]
fn test_remove_duplicate_song_removes_only_that_item() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 1]), None, 0);

    let second_copy = manager.get_queue()[2].clone();
    manager.remove(&[second_copy]);

    assert_eq!(song_ids(&manager.get_queue()), vec![1, 2]);
    assert_eq!(manager.current_position(), Some(0));
}

#[test]
fn test_remove_unknown_item_still_announces_queue() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2]), None, 0);
    let stale = manager.get_queue()[1].clone();
    manager.set_queue(songs(&[3, 4]), None, 0);
    recorder.take();

    manager.remove(&[stale]);

    assert_eq!(song_ids(&manager.get_queue()), vec![3, 4]);
    assert_eq!(current_song(&manager), Some(3));
    assert_eq!(
        recorder.take(),
        vec![Event::QueueChanged {
            reason: QueueChangeReason::Default,
            songs: vec![3, 4],
        }]
    );
}

#[test]
fn test_move_reports_move_reason() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3, 4]), None, 3);
    recorder.take();

    assert!(manager.move_item(3, 0));

    assert_eq!(song_ids(&manager.get_queue()), vec![4, 1, 2, 3]);
    assert_eq!(
        recorder.take(),
        vec![
            Event::QueueChanged {
                reason: QueueChangeReason::Move,
                songs: vec![4, 1, 2, 3],
            },
            Event::Position(Some(3), Some(0)),
        ]
    );
}

#[test]
fn test_move_in_shuffle_leaves_base_order() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_shuffle_mode(ShuffleMode::On, false);
    manager.set_queue(songs(&[1, 2, 3]), Some(songs(&[3, 2, 1])), 0);

    assert!(manager.move_item(0, 2));

    assert_eq!(song_ids(&manager.get_queue()), vec![2, 1, 3]);
    assert_eq!(song_ids(&manager.get_queue_for(ShuffleMode::Off)), vec![1, 2, 3]);
    assert_eq!(current_song(&manager), Some(3));
    assert_eq!(manager.current_position(), Some(2));
}

#[test]
fn test_invalid_move_is_rejected() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2]), None, 0);
    recorder.take();

    assert!(!manager.move_item(2, 0));
    assert!(!manager.move_item(0, 5));
    assert!(recorder.take().is_empty());
}

#[test]
fn test_play_next_from_later_in_queue() {
    let (mut manager, _recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2, 3, 4]), None, 0);

    let last = manager.get_queue()[3].clone();
    assert!(manager.play_next(&last));

    assert_eq!(song_ids(&manager.get_queue()), vec![1, 4, 2, 3]);
    assert!(manager.skip_to_next(false));
    assert_eq!(current_song(&manager), Some(4));
}

#[test]
fn test_clear_empties_queue() {
    let (mut manager, recorder) = manager_with_recorder();
    manager.set_queue(songs(&[1, 2]), None, 0);
    recorder.take();

    manager.clear();

    assert!(manager.is_empty());
    assert!(manager.current_item().is_none());
    assert_eq!(
        recorder.take(),
        vec![Event::QueueChanged {
            reason: QueueChangeReason::Default,
            songs: vec![],
        }]
    );
}

// ===== Observers =====

#[test]
fn test_observers_notified_in_registration_order() {
    init_logging();
    let first = Recorder::new();
    let second = Recorder::new();
    let mut manager = QueueManager::default();
    manager.add_callback(first.clone());
    manager.add_callback(second.clone());

    manager.set_repeat_mode(RepeatMode::All);

    assert_eq!(first.take(), vec![Event::Repeat(RepeatMode::All)]);
    assert_eq!(second.take(), vec![Event::Repeat(RepeatMode::All)]);
}

#[test]
fn test_removed_observer_stops_receiving() {
    let (mut manager, recorder) = manager_with_recorder();

    assert!(manager.remove_callback(&recorder));
    manager.set_repeat_mode(RepeatMode::One);

    assert!(recorder.take().is_empty());
    assert!(!manager.remove_callback(&recorder));
}

#[test]
fn test_duplicate_observer_registered_once() {
    let (mut manager, recorder) = manager_with_recorder();

    assert!(!manager.add_callback(recorder.clone()));
    manager.set_repeat_mode(RepeatMode::All);

    assert_eq!(recorder.take().len(), 1);
}

#[test]
fn test_shared_manager_serializes_access() {
    init_logging();
    let shared = SharedQueueManager::default();
    shared.with(|manager| manager.set_queue(songs(&[1, 2, 3, 4, 5]), None, 0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                shared.with(|manager| manager.add_to_queue(songs(&[6])));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let manager = shared.lock();
    assert_eq!(manager.len(), 9);
    assert_eq!(manager.get_queue_for(ShuffleMode::On).len(), 9);
}

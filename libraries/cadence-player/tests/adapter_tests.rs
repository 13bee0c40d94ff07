//! Adapter behavior against the in-memory audtool model

use cadence_core::{PlayerSetting, PlaylistSettings};
use cadence_player::fake::{FakeAudtool, FakePlaylist};
use cadence_player::{AudtoolPlayer, PlaybackState, Reply};
use std::sync::Arc;

fn setup(playlists: Vec<FakePlaylist>) -> (Arc<FakeAudtool>, AudtoolPlayer) {
    let fake = Arc::new(FakeAudtool::with_playlists(playlists));
    let player = AudtoolPlayer::new(fake.clone(), 50);
    (fake, player)
}

#[tokio::test]
async fn status_falls_back_to_defaults_when_player_is_missing() {
    let fake = Arc::new(FakeAudtool::unavailable());
    let player = AudtoolPlayer::new(fake, 35);

    let status = player.status().await;

    assert_eq!(status.state, PlaybackState::Stopped);
    assert_eq!(status.volume, 35);
    assert_eq!(status.position, 0);
    assert_eq!(status.length, 0);
    assert!(status.song.is_none());
    assert!(!status.settings.shuffle);
    assert!(!status.settings.auto_advance);
}

#[tokio::test]
async fn writes_to_missing_player_are_silent() {
    let fake = Arc::new(FakeAudtool::unavailable());
    let player = AudtoolPlayer::new(fake.clone(), 50);

    assert_eq!(player.play().await, Reply::Unavailable);
    assert_eq!(player.clear_queue().await, Reply::Unavailable);
    assert_eq!(player.set_volume(10).await, Reply::Unavailable);
    assert_eq!(fake.calls().len(), 3);
}

#[tokio::test]
async fn status_reports_live_player_state() {
    let (fake, player) = setup(vec![FakePlaylist::new(
        "Evening",
        ["/music/one.mp3", "/music/two.mp3"],
    )]);
    fake.set_playing(true);
    player.jump_to(1).await;

    let status = player.status().await;

    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.volume, 80);
    assert_eq!(status.position, 1);
    assert_eq!(status.length, 2);

    let song = status.song.expect("song info");
    assert_eq!(song.title.as_deref(), Some("two"));
    assert_eq!(song.filename.as_deref(), Some("/music/two.mp3"));
    assert_eq!(song.artist, None);
    assert_eq!(song.bitrate_kbps, Some(320));
}

#[tokio::test]
async fn pause_then_state_is_paused() {
    let (fake, player) = setup(vec![FakePlaylist::new("Q", ["/m/a.mp3"])]);
    fake.set_playing(true);

    player.pause().await;

    assert_eq!(player.playback_state().await, PlaybackState::Paused);
    player.stop().await;
    assert_eq!(player.playback_state().await, PlaybackState::Stopped);
}

#[tokio::test]
async fn queue_entries_enumerate_every_position() {
    let (_fake, player) = setup(vec![FakePlaylist::new(
        "Q",
        ["/m/a.mp3", "/m/b.flac", "/m/c.ogg"],
    )]);

    let entries = player.queue_entries().await;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].position, 0);
    assert_eq!(entries[0].title.as_deref(), Some("a"));
    assert_eq!(entries[2].filename.as_deref(), Some("/m/c.ogg"));
    assert_eq!(
        player.queue_filenames().await,
        vec!["/m/a.mp3", "/m/b.flac", "/m/c.ogg"]
    );
}

#[tokio::test]
async fn clear_append_and_delete_edit_the_queue() {
    let (fake, player) = setup(vec![FakePlaylist::new("Q", ["/m/old.mp3"])]);

    player.clear_queue().await;
    player.append_url("/m/a.mp3").await;
    player.append_url("/m/b.mp3").await;
    player.delete_at(0).await;

    assert_eq!(fake.current_playlist().songs, vec!["/m/b.mp3"]);
    assert_eq!(player.queue_length().await, Reply::Ok(1));
}

#[tokio::test]
async fn settings_round_trip_through_toggles() {
    let (fake, player) = setup(vec![FakePlaylist::new("Q", Vec::<String>::new())]);

    assert_eq!(player.setting(PlayerSetting::Shuffle).await, Reply::Ok(false));
    player.toggle_setting(PlayerSetting::Shuffle).await;
    assert_eq!(player.setting(PlayerSetting::Shuffle).await, Reply::Ok(true));

    let settings = player.settings().await;
    assert_eq!(
        settings,
        PlaylistSettings {
            shuffle: true,
            repeat: false,
            stop_after_current: false,
            auto_advance: true,
        }
    );
    assert!(fake.commands().contains(&"playlist-shuffle-toggle".to_string()));
}

#[tokio::test]
async fn playlist_slots_are_zero_based() {
    let (fake, player) = setup(vec![
        FakePlaylist::new("First", Vec::<String>::new()),
        FakePlaylist::new("Second", Vec::<String>::new()),
    ]);

    assert_eq!(player.playlist_count().await, Reply::Ok(2));
    assert_eq!(player.current_playlist_index().await, Reply::Ok(0));

    player.set_current_playlist_index(1).await;
    assert_eq!(fake.current_slot(), 1);
    assert_eq!(player.current_playlist_index().await, Reply::Ok(1));
    assert_eq!(
        player.current_playlist_name().await,
        Reply::Ok("Second".to_string())
    );

    assert_eq!(player.set_current_playlist_index(5).await, Reply::Unavailable);
}

#[tokio::test]
async fn playlist_management_commands() {
    let (fake, player) = setup(vec![FakePlaylist::new("Only", Vec::<String>::new())]);

    player.new_playlist().await;
    player.set_current_playlist_name("Fresh Mix").await;
    assert_eq!(player.playlist_count().await, Reply::Ok(2));
    assert_eq!(fake.current_playlist().name, "Fresh Mix");

    player.delete_current_playlist().await;
    assert_eq!(player.playlist_count().await, Reply::Ok(1));
}

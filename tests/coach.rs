//! Coach surface integration tests
//!
//! Lifecycle, navigation, and error-to-status mapping, all without audio
//! hardware or a network: every path below stops at the credential check or
//! never opens a session at all.

use phonics_coach::audio::pcm::PLAYBACK_SAMPLE_RATE;
use phonics_coach::coach::status_message;
use phonics_coach::config::file::CoachConfigFile;
use phonics_coach::deck::{self, DECK};
use phonics_coach::synthesis::Synthesizer;
use phonics_coach::{Config, Error, PhonicsCoach};
use tokio::sync::mpsc;

mod common;

#[test]
fn test_initial_status_is_idle_with_greeting() {
    let coach = PhonicsCoach::new(Config::default());
    let status = coach.status();

    assert!(!status.is_practicing);
    assert!(!status.is_listening);
    assert_eq!(status.message, "Hi! I'm Sparky. Let's learn sounds together!");
}

#[test]
fn test_stop_practice_when_idle_is_a_no_op() {
    let mut coach = PhonicsCoach::new(Config::default());
    let before = coach.status();

    coach.stop_practice();
    coach.stop_practice();

    assert_eq!(coach.status(), before);
}

#[test]
fn test_run_practice_when_idle_returns_immediately() {
    let mut coach = PhonicsCoach::new(Config::default());
    let (_tx, mut rx) = mpsc::channel::<()>(1);

    tokio_test::block_on(coach.run_practice(&mut rx));
    assert!(!coach.status().is_practicing);
}

#[test]
fn test_hear_sound_without_key_asks_for_one() {
    let mut coach = PhonicsCoach::new(Config::default());

    tokio_test::block_on(coach.hear_sound());

    assert_eq!(
        coach.status().message,
        "Sparky needs an API key first. Set GEMINI_API_KEY and try again!"
    );
}

#[test]
fn test_start_practice_without_key_stays_idle() {
    let mut coach = PhonicsCoach::new(Config::default());

    let opened = tokio_test::block_on(coach.start_practice());

    assert!(!opened);
    assert!(!coach.status().is_practicing);
    assert_eq!(
        coach.status().message,
        "Sparky needs an API key first. Set GEMINI_API_KEY and try again!"
    );
}

#[test]
fn test_navigation_wraps_both_ways() {
    let mut coach = PhonicsCoach::new(Config::default());
    assert_eq!(coach.current().letter, 'A');

    coach.prev_letter();
    assert_eq!(coach.current().letter, 'Z');

    coach.next_letter();
    assert_eq!(coach.current().letter, 'A');

    coach.next_letter();
    assert_eq!(coach.current().letter, 'B');
}

#[test]
fn test_select_ignores_out_of_range() {
    let mut coach = PhonicsCoach::new(Config::default());
    coach.select(DECK.len());
    assert_eq!(coach.current().letter, 'A');

    coach.select(2);
    assert_eq!(coach.current().letter, 'C');
}

#[test]
fn test_deck_is_ordered_a_to_z() {
    assert_eq!(DECK.len(), 26);
    for (index, item) in DECK.iter().enumerate() {
        assert_eq!(item.letter as usize, 'A' as usize + index);
        assert!(!item.word.is_empty());
        assert!(!item.sound.is_empty());
    }
}

#[test]
fn test_deck_lookup_is_case_insensitive() {
    assert_eq!(deck::position_of('a'), Some(0));
    assert_eq!(deck::position_of('Z'), Some(25));
    assert_eq!(deck::position_of('!'), None);
}

#[test]
fn test_status_messages_cover_the_taxonomy() {
    let mic = status_message(&Error::Permission("mic busy".to_string()));
    assert!(mic.contains("mic"));

    let model = status_message(&Error::ModelUnavailable("404".to_string()));
    assert!(model.contains("API key"));

    let key = status_message(&Error::Config("no API key selected".to_string()));
    assert!(key.contains("GEMINI_API_KEY"));

    let connection = status_message(&Error::Connection("refused".to_string()));
    assert!(connection.contains("connection"));

    let fallback = status_message(&Error::Synthesis("empty".to_string()));
    assert!(fallback.contains("try again"));
}

#[test]
fn test_pronunciation_prompt_names_the_item() {
    let item = &DECK[1];
    let prompt = Synthesizer::pronunciation_prompt(item);

    assert!(prompt.contains("letter B"));
    assert!(prompt.contains("'buh'"));
    assert!(prompt.contains("'Ball'"));
}

#[test]
fn test_require_api_key() {
    let mut config = Config::default();
    assert!(matches!(config.require_api_key(), Err(Error::Config(_))));

    config.api_key = Some(String::new());
    assert!(matches!(config.require_api_key(), Err(Error::Config(_))));

    config.api_key = Some("k".to_string());
    assert_eq!(config.require_api_key().unwrap(), "k");
}

#[test]
fn test_config_file_overlay_parses() {
    let overlay: CoachConfigFile = toml::from_str(
        r#"
        api_key = "from-file"

        [models]
        live = "live-model"

        [voices]
        tts = "Puck"
        "#,
    )
    .unwrap();

    assert_eq!(overlay.api_key.as_deref(), Some("from-file"));
    assert_eq!(overlay.models.live.as_deref(), Some("live-model"));
    assert_eq!(overlay.models.tts, None);
    assert_eq!(overlay.voices.tts.as_deref(), Some("Puck"));

    // and the overlay lands on top of defaults the same way load() applies it
    let mut config = Config::default();
    if let Some(key) = overlay.api_key {
        config.api_key = Some(key);
    }
    assert_eq!(config.require_api_key().unwrap(), "from-file");
    assert_eq!(config.tts_voice, "Kore");
}

#[test]
fn test_response_chunk_helper_matches_rate() {
    // keep the shared helpers honest
    let chunk = common::response_chunk_secs(0.5);
    assert_eq!(chunk.sample_rate, PLAYBACK_SAMPLE_RATE);
    assert_eq!(chunk.frames(), 12000);
}

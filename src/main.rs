use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use phonics_coach::audio::capture::{CaptureStream, samples_to_wav};
use phonics_coach::audio::pcm::{
    self, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE, PlaybackChunk,
};
use phonics_coach::audio::playback::PlaybackScheduler;
use phonics_coach::deck::{self, DECK};
use phonics_coach::{Config, PhonicsCoach};

/// Phonics Coach - voice practice for young readers
#[derive(Parser)]
#[command(name = "phonics", version, about)]
struct Cli {
    /// API key for the speech service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play the pronunciation for a letter once
    Hear {
        /// Letter to pronounce (defaults to A)
        letter: Option<String>,
    },
    /// Practice a letter interactively until Ctrl-C
    Practice {
        /// Letter to practice (defaults to A)
        letter: Option<String>,
    },
    /// List the deck
    Deck,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Write the recording to a WAV file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Test speaker output
    TestSpeaker,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,phonics_coach=info",
        1 => "info,phonics_coach=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(key) = cli.api_key {
        config.api_key = Some(key);
    }

    match cli.command {
        Command::Hear { letter } => hear(config, letter.as_deref()).await,
        Command::Practice { letter } => practice(config, letter.as_deref()).await,
        Command::Deck => {
            list_deck();
            Ok(())
        }
        Command::TestMic { duration, out } => test_mic(duration, out).await,
        Command::TestSpeaker => test_speaker().await,
    }
}

/// Build a coach positioned on the requested letter
fn coach_at(config: Config, letter: Option<&str>) -> anyhow::Result<PhonicsCoach> {
    let mut coach = PhonicsCoach::new(config);
    if let Some(letter) = letter {
        let first = letter
            .chars()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty letter argument"))?;
        let index = deck::position_of(first)
            .ok_or_else(|| anyhow::anyhow!("no such letter in the deck: {letter}"))?;
        coach.select(index);
    }
    Ok(coach)
}

#[allow(clippy::future_not_send)]
async fn hear(config: Config, letter: Option<&str>) -> anyhow::Result<()> {
    let mut coach = coach_at(config, letter)?;
    let item = coach.current();
    println!("{} {}  {} as in {}", item.glyph, item.letter, item.sound, item.word);

    coach.hear_sound().await;
    println!("{}", coach.status().message);
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn practice(config: Config, letter: Option<&str>) -> anyhow::Result<()> {
    let mut coach = coach_at(config, letter)?;
    let item = coach.current();
    println!("{} {}  {} as in {}", item.glyph, item.letter, item.sound, item.word);

    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = stop_tx.send(()).await;
    });

    if coach.start_practice().await {
        println!("{}", coach.status().message);
        println!("Press Ctrl-C to stop.");
        coach.run_practice(&mut stop_rx).await;
    }

    println!("{}", coach.status().message);
    Ok(())
}

fn list_deck() {
    for (index, item) in DECK.iter().enumerate() {
        println!(
            "{index:2}  {} {}  '{}' as in {} ({})",
            item.glyph, item.letter, item.sound, item.word, item.color
        );
    }
}

/// Record for a few seconds and report what came through
async fn test_mic(duration: u64, out: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Recording for {duration} seconds... speak into the microphone.\n");

    let mut capture = CaptureStream::new()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    capture.start(tx)?;

    tokio::time::sleep(Duration::from_secs(duration)).await;
    capture.stop();

    let mut samples: Vec<f32> = Vec::new();
    let mut frames = 0usize;
    while let Ok(frame) = rx.try_recv() {
        frames += 1;
        samples.extend(pcm::bytes_to_samples(&pcm::decode_base64(&frame.data)?));
    }

    let peak = samples.iter().fold(0.0_f32, |max, s| max.max(s.abs()));
    println!("Captured {frames} frames ({} samples), peak amplitude {peak:.3}", samples.len());

    if peak < 0.01 {
        println!("\nThat looks silent. Check:");
        println!("  1. Run: pactl list sources short");
        println!("  2. Check input levels in pavucontrol");
    }

    if let Some(path) = out {
        let wav = samples_to_wav(&samples, CAPTURE_SAMPLE_RATE)?;
        std::fs::write(&path, wav)?;
        println!("Wrote recording to {}", path.display());
    }

    Ok(())
}

/// Play a short tone through the scheduler
#[allow(clippy::future_not_send, clippy::cast_precision_loss)]
async fn test_speaker() -> anyhow::Result<()> {
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let sample_rate = PLAYBACK_SAMPLE_RATE;
    let num_samples = (sample_rate * 2) as usize;
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3
        })
        .collect();

    let mut playback = PlaybackScheduler::new()?;
    playback
        .play_once(&PlaybackChunk {
            samples,
            sample_rate,
            channels: 1,
        })
        .await;
    playback.teardown();

    println!("If you heard the tone, your speakers are working!");
    Ok(())
}

//! Live session WebSocket client
//!
//! Connects to the `BidiGenerateContent` endpoint, performs the setup
//! handshake, then bridges the socket to the session through channels: a
//! writer task drains the outbound queue and a reader task maps server
//! frames to [`LiveEvent`]s. Once the connection is closed, late replies
//! land on dropped channels and go nowhere.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::audio::pcm::EncodedFrame;
use crate::live::types::{
    Content, GenerationConfig, RealtimeInputMessage, ServerMessage, Setup, SetupMessage,
};
use crate::{Error, Result};

/// Host serving the live API
const LIVE_HOST: &str = "wss://generativelanguage.googleapis.com";

/// Bidirectional streaming RPC path
const LIVE_PATH: &str =
    "/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Connection parameters for one practice session
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub api_key: String,
    /// Bare model id; the setup message qualifies it
    pub model: String,
    /// Prebuilt voice for the feedback audio
    pub voice: String,
    /// Persona and task framing for the session
    pub system_instruction: String,
}

/// What an open connection reports back to the session
#[derive(Debug)]
pub enum LiveEvent {
    /// A response audio payload (base64 PCM16)
    Audio(String),
    /// The server abandoned its in-flight response; scheduled audio must go
    Interrupted,
    /// The model finished its current turn
    TurnComplete,
    /// The server closed the connection
    Closed,
    /// Transport fault
    Error(String),
}

enum Outbound {
    Realtime(EncodedFrame),
    Close,
}

/// Handle for pushing capture frames into the connection.
///
/// Sends are fire-and-forget: frames go out in the order queued, nothing
/// waits for transmission, and a closed connection swallows them silently.
#[derive(Clone)]
pub struct LiveInputSender {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl LiveInputSender {
    /// Queue one capture frame for transmission
    pub fn send_realtime(&self, frame: EncodedFrame) {
        let _ = self.tx.send(Outbound::Realtime(frame));
    }
}

/// One open live connection
pub struct LiveConnection {
    input_tx: mpsc::UnboundedSender<Outbound>,
    events_rx: mpsc::UnboundedReceiver<LiveEvent>,
    reader: JoinHandle<()>,
    #[allow(dead_code)]
    writer: JoinHandle<()>,
}

impl LiveConnection {
    /// Open the socket and complete the setup handshake.
    ///
    /// The connection counts as open only after the server acknowledges
    /// setup; no capture frames may be sent before that.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the socket cannot be opened, the
    /// setup message is rejected, or the server closes before
    /// acknowledging
    pub async fn connect(config: &LiveConfig) -> Result<Self> {
        let url = endpoint(&config.api_key)?;

        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        let (mut sink, mut stream) = socket.split();

        let setup = SetupMessage {
            setup: Setup {
                model: format!("models/{}", config.model),
                generation_config: GenerationConfig::audio_with_voice(&config.voice),
                system_instruction: Some(Content::text(&config.system_instruction)),
            },
        };
        sink.send(Message::Text(serde_json::to_string(&setup)?))
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let ack = loop {
            match stream.next().await {
                Some(Ok(message)) => {
                    if let Some(parsed) = parse_server_message(&message) {
                        break parsed;
                    }
                }
                Some(Err(e)) => return Err(Error::Connection(e.to_string())),
                None => return Err(Error::Connection("closed during setup".to_string())),
            }
        };
        if ack.setup_complete.is_none() {
            return Err(Error::Connection("setup was not acknowledged".to_string()));
        }

        tracing::debug!(model = %config.model, "live session open");

        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let writer = tokio::spawn(async move {
            while let Some(outbound) = input_rx.recv().await {
                match outbound {
                    Outbound::Realtime(frame) => {
                        let message = RealtimeInputMessage::chunk(frame);
                        let Ok(text) = serde_json::to_string(&message) else {
                            continue;
                        };
                        if sink.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Outbound::Close => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        });

        let reader = tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Close(_)) => {
                        let _ = events_tx.send(LiveEvent::Closed);
                        break;
                    }
                    Ok(message) => {
                        let Some(parsed) = parse_server_message(&message) else {
                            continue;
                        };
                        let Some(content) = parsed.server_content else {
                            continue;
                        };
                        // Audio first: an interruption in the same message
                        // must also kill the audio delivered alongside it.
                        if let Some(data) = content.audio_data() {
                            let _ = events_tx.send(LiveEvent::Audio(data.to_string()));
                        }
                        if content.interrupted.unwrap_or(false) {
                            let _ = events_tx.send(LiveEvent::Interrupted);
                        }
                        if content.turn_complete.unwrap_or(false) {
                            let _ = events_tx.send(LiveEvent::TurnComplete);
                        }
                    }
                    Err(e) => {
                        let _ = events_tx.send(LiveEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
        });

        Ok(Self {
            input_tx,
            events_rx,
            reader,
            writer,
        })
    }

    /// Clonable handle for the capture pipeline
    #[must_use]
    pub fn input_sender(&self) -> LiveInputSender {
        LiveInputSender {
            tx: self.input_tx.clone(),
        }
    }

    /// Next server event; `None` once the reader is gone
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.events_rx.recv().await
    }

    /// Close the connection, best-effort.
    ///
    /// Queues a close frame for the writer, stops the reader, and drops the
    /// channels; in-flight sends are not retracted.
    pub fn close(self) {
        tracing::debug!("live session closing");
        drop(self);
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        let _ = self.input_tx.send(Outbound::Close);
        self.reader.abort();
    }
}

/// Endpoint URL with the credential as a query parameter
fn endpoint(api_key: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{LIVE_HOST}{LIVE_PATH}"))
        .map_err(|e| Error::Connection(e.to_string()))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Parse one socket frame; the server sends JSON as text or binary
fn parse_server_message(message: &Message) -> Option<ServerMessage> {
    let parsed = match message {
        Message::Text(text) => serde_json::from_str(text),
        Message::Binary(bytes) => serde_json::from_slice(bytes),
        _ => return None,
    };

    match parsed {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!(error = %e, "unparseable server frame");
            None
        }
    }
}

//! Error types for the masked chess protocol

use thiserror::Error;
use crate::commitment::SecretKind;
use crate::game::{GameId, GameStatus, Seat, TurnIndex};

/// Main error type for the masked chess protocol
///
/// Every error is terminal for the attempted operation and leaves both the
/// shared `GameState` and the local `PlayerState` untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("Invalid parameter `{field}`: {message}")]
    InvalidParameter {
        message: String,
        field: String,
    },

    #[error("Square ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds {
        row: u8,
        col: u8,
        size: u8,
    },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Commitment mismatch for {seat} {secret} secret")]
    CommitmentMismatch {
        seat: Seat,
        secret: SecretKind,
    },

    #[error("Wrong turn: turn {turn} belongs to {expected}, not {actual}")]
    WrongTurn {
        expected: Seat,
        actual: Seat,
        turn: TurnIndex,
    },

    #[error("Game {game_id} is not active (status: {status})")]
    GameNotActive {
        game_id: GameId,
        status: GameStatus,
    },

    #[error("Stale game state for game {game_id}: {message}")]
    StaleGameState {
        game_id: GameId,
        message: String,
    },

    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Event sink error: {0}")]
    EventSink(String),

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: String,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Hex decoding error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl ProtocolError {
    /// Shorthand for an `InvalidParameter` error
    pub fn invalid_parameter(field: &str, message: impl Into<String>) -> Self {
        ProtocolError::InvalidParameter {
            message: message.into(),
            field: field.to_string(),
        }
    }

    /// Shorthand for a `Configuration` error
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        ProtocolError::Configuration {
            message: message.into(),
            field: field.to_string(),
        }
    }

    /// Whether the caller should re-read shared state and retry.
    ///
    /// Only optimistic-concurrency conflicts qualify; everything else goes
    /// to the operator.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProtocolError::StaleGameState { .. })
    }

    /// Whether the error indicates a player presented secrets that do not
    /// match their recorded commitments.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, ProtocolError::CommitmentMismatch { .. })
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type GameResult<T> = Result<T, ProtocolError>;

/// Logging configuration and initialization
pub mod logging {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use std::env;

    /// Logging output format
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stdout,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(
        config: LoggingConfig,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("masked_chess=trace".parse()?);

        let registry = tracing_subscriber::registry()
            .with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => {
                        registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?
                    }
                    LogOutput::Stderr => {
                        registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?
                    }
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => {
                        registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?
                    }
                    LogOutput::Stderr => {
                        registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?
                    }
                }
            }
        }

        Ok(())
    }

    /// Parse a format name (`human` or `json`)
    pub fn parse_format(value: &str) -> Option<LogFormat> {
        match value.to_ascii_lowercase().as_str() {
            "human" => Some(LogFormat::Human),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    /// Parse an output name (`stdout` or `stderr`)
    pub fn parse_output(value: &str) -> Option<LogOutput> {
        match value.to_ascii_lowercase().as_str() {
            "stdout" => Some(LogOutput::Stdout),
            "stderr" => Some(LogOutput::Stderr),
            _ => None,
        }
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = env::var("MASKED_CHESS_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = env::var("MASKED_CHESS_LOG_FORMAT")
            .ok()
            .and_then(|s| parse_format(&s))
            .unwrap_or(LogFormat::Human);

        let output = env::var("MASKED_CHESS_LOG_OUTPUT")
            .ok()
            .and_then(|s| parse_output(&s))
            .unwrap_or(LogOutput::Stdout);

        init_logging(LoggingConfig { level, format, output })
    }
}

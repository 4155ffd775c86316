//! Configuration management for the masked chess protocol

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use crate::error::{logging, ProtocolError};

/// Largest supported board size parameter (a 16x16 board)
pub const MAX_SUPPORTED_BOARD_PARAM: u32 = 4;

/// Main configuration for the protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskedChessConfig {
    /// Game configuration
    pub game: GameConfig,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Game-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Smallest accepted board size parameter (dimension is `2^param`)
    pub min_board_param: u32,
    /// Largest accepted board size parameter
    pub max_board_param: u32,
    /// Board size parameter used when the caller has no preference
    pub default_board_param: u32,
    /// Retries on stale game state before `submit_move_with_retry` gives up
    pub max_submit_retries: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_board_param: 2,     // 4x4
            max_board_param: 4,     // 16x16
            default_board_param: 3, // standard 8x8
            max_submit_retries: 3,
        }
    }
}

/// Serializable logging section, converted to `logging::LoggingConfig` at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// `human` or `json`
    pub format: String,
    /// `stdout` or `stderr`
    pub output: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "human".to_string(),
            output: "stdout".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Convert into the runtime logging configuration
    pub fn to_logging_config(&self) -> Result<logging::LoggingConfig, ProtocolError> {
        let level = self.level.parse::<tracing::Level>().map_err(|_| {
            ProtocolError::config("logging.level", format!("Unknown log level: {}", self.level))
        })?;
        let format = logging::parse_format(&self.format).ok_or_else(|| {
            ProtocolError::config("logging.format", format!("Unknown log format: {}", self.format))
        })?;
        let output = logging::parse_output(&self.output).ok_or_else(|| {
            ProtocolError::config("logging.output", format!("Unknown log output: {}", self.output))
        })?;

        Ok(logging::LoggingConfig { level, format, output })
    }
}

impl MaskedChessConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProtocolError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProtocolError::config("config_file", format!("Failed to read config file: {}", e))
        })?;

        let config: MaskedChessConfig = toml::from_str(&content).map_err(|e| {
            ProtocolError::config("config_format", format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProtocolError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            ProtocolError::config(
                "config_serialization",
                format!("Failed to serialize config: {}", e),
            )
        })?;

        fs::write(path, content).map_err(|e| {
            ProtocolError::config("config_write", format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let game = &self.game;

        if game.min_board_param == 0 {
            return Err(ProtocolError::config(
                "game.min_board_param",
                "Minimum board parameter must be at least 1",
            ));
        }

        if game.max_board_param > MAX_SUPPORTED_BOARD_PARAM {
            return Err(ProtocolError::config(
                "game.max_board_param",
                format!("Maximum board parameter cannot exceed {}", MAX_SUPPORTED_BOARD_PARAM),
            ));
        }

        if game.min_board_param > game.max_board_param {
            return Err(ProtocolError::config(
                "game.board_params",
                "Minimum board parameter must not exceed the maximum",
            ));
        }

        if !(game.min_board_param..=game.max_board_param).contains(&game.default_board_param) {
            return Err(ProtocolError::config(
                "game.default_board_param",
                "Default board parameter must lie within the supported range",
            ));
        }

        self.logging.to_logging_config()?;

        Ok(())
    }

    /// Create a production configuration: standard boards only, JSON logs
    pub fn production() -> Self {
        Self {
            game: GameConfig {
                min_board_param: 3,
                max_board_param: 3,
                default_board_param: 3,
                max_submit_retries: 5,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                format: "json".to_string(),
                output: "stdout".to_string(),
            },
        }
    }

    /// Create a development configuration with relaxed settings
    pub fn development() -> Self {
        Self {
            game: GameConfig {
                min_board_param: 1, // 2x2 boards for quick experiments
                max_board_param: MAX_SUPPORTED_BOARD_PARAM,
                default_board_param: 2,
                max_submit_retries: 1,
            },
            logging: LoggingSettings {
                level: "debug".to_string(),
                format: "human".to_string(),
                output: "stderr".to_string(),
            },
        }
    }
}

use std::net::SocketAddr;

use casino_poker_core::RoundConfig;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "POKER_BIND_ADDR";
pub const DECK_COUNT_VAR: &str = "POKER_DECK_COUNT";
pub const BURN_CARDS_VAR: &str = "POKER_BURN_CARDS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("环境变量 {name} 的值 '{value}' 无效: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// 服务器配置，全部来自环境变量，缺省时使用默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// 每个连接新开牌局时使用的配置
    pub round: RoundConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 25917)),
            round: RoundConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        if let Some(value) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: BIND_ADDR_VAR,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(value) = lookup(DECK_COUNT_VAR) {
            config.round.deck_count = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => return Err(invalid(DECK_COUNT_VAR, &value, "牌副数必须为正数")),
                Err(e) => return Err(invalid(DECK_COUNT_VAR, &value, &e.to_string())),
            };
        }

        if let Some(value) = lookup(BURN_CARDS_VAR) {
            config.round.burn_cards = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(BURN_CARDS_VAR, &value, "应为 true 或 false")),
            };
        }

        Ok(config)
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

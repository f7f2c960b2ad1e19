use actix_web::cookie::Key;
use std::env;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";
const DEFAULT_STATIC_DIR: &str = "./static";
const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub api_base: String,
    pub static_dir: String,
    pub secure_cookies: bool,
    pub session_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            bind_addr: env::var("CIVIC_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            api_base: env::var("CIVIC_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            static_dir: env::var("CIVIC_STATIC_DIR")
                .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
            secure_cookies: env::var("CIVIC_SECURE_COOKIES")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            session_key: env::var("SESSION_KEY").ok(),
        }
    }

    /// Cookie encryption key. Without a usable `SESSION_KEY` a random key is
    /// generated and every session is lost on restart.
    pub fn cookie_key(&self) -> Key {
        match self.session_key.as_deref() {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

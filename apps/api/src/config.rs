use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::{FontFamily, PaperSize};

const MAX_ITERATIONS_RANGE: (u32, u32) = (1, 32);

/// Application configuration loaded from environment variables.
/// Every variable is optional; a present but malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub paper: PaperSize,
    pub font: FontFamily,
    /// Solver iteration cap, clamped to 1..=32.
    pub max_iterations: u32,
    pub max_selected_bullets: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            paper: PaperSize::Letter,
            font: FontFamily::Arial,
            max_iterations: 8,
            max_selected_bullets: 12,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let paper = match lookup("PAGEFIT_PAPER") {
            None => defaults.paper,
            Some(raw) => PaperSize::parse(&raw)
                .with_context(|| format!("PAGEFIT_PAPER must be 'letter' or 'a4', got '{raw}'"))?,
        };
        let font = match lookup("PAGEFIT_FONT") {
            None => defaults.font,
            Some(raw) => FontFamily::parse(&raw)
                .with_context(|| format!("PAGEFIT_FONT must be 'arial' or 'times', got '{raw}'"))?,
        };
        let (min_iter, max_iter) = MAX_ITERATIONS_RANGE;

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            paper,
            font,
            max_iterations: parse_or(&lookup, "PAGEFIT_MAX_ITERATIONS", defaults.max_iterations)?
                .clamp(min_iter, max_iter),
            max_selected_bullets: parse_or(
                &lookup,
                "MAX_SELECTED_BULLETS",
                defaults.max_selected_bullets,
            )?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
    }
}

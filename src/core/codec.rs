//! Conversion between normalized host channels and `#RRGGBB` hex strings.

use crate::domain::model::ChannelColor;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("Invalid color object")]
    MissingColor,

    #[error("Invalid color object: missing {0} channel")]
    MissingChannel(char),

    #[error("Invalid RGB values: {0} channel is not a finite number")]
    NotANumber(char),

    #[error("Invalid hex color format: {0:?}")]
    InvalidHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap())
}

pub fn is_hex_color(value: &str) -> bool {
    hex_pattern().is_match(value)
}

// Half-up rounding, so 0.5 levels always round toward white.
fn channel_level(value: Option<f64>, channel: char) -> Result<u8, ColorError> {
    let value = value.ok_or(ColorError::MissingChannel(channel))?;
    let level = (value * 255.0 + 0.5).floor();
    if !level.is_finite() {
        return Err(ColorError::NotANumber(channel));
    }
    Ok(level.clamp(0.0, 255.0) as u8)
}

pub fn to_rgb(color: &ChannelColor) -> Result<Rgb, ColorError> {
    Ok(Rgb {
        r: channel_level(color.r, 'r')?,
        g: channel_level(color.g, 'g')?,
        b: channel_level(color.b, 'b')?,
    })
}

/// Encodes normalized channels as an uppercase `#RRGGBB` string.
pub fn encode(color: &ChannelColor) -> Result<String, ColorError> {
    to_rgb(color).map(|rgb| rgb.to_hex())
}

/// Parses `#RGB` or `#RRGGBB` (any case) into 8-bit channels.
pub fn decode(hex: &str) -> Result<Rgb, ColorError> {
    if !is_hex_color(hex) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }

    let digits = &hex[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let channel = |start: usize| {
        u8::from_str_radix(&expanded[start..start + 2], 16)
            .map_err(|_| ColorError::InvalidHex(hex.to_string()))
    };

    Ok(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

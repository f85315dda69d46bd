use crate::core::codec::{self, ColorError};
use crate::core::distance;
use crate::domain::model::TokenMatch;
use crate::domain::palette::{Palette, Token};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("No tokens found for comparison")]
    NoTokens,

    #[error("No token could be compared with {color}")]
    NoComparableToken { color: String },

    #[error(transparent)]
    InvalidColor(#[from] ColorError),
}

/// Nearest token by RGB distance. Palette order breaks ties: a later token
/// must be strictly closer to replace an earlier one.
pub fn nearest(hex: &str, palette: &Palette) -> Result<TokenMatch, MatchError> {
    if palette.is_empty() {
        return Err(MatchError::NoTokens);
    }

    let target = codec::decode(hex)?;
    let mut best: Option<(&Token, f64)> = None;

    for token in palette.iter() {
        let reference = match codec::decode(&token.value) {
            Ok(rgb) => rgb,
            Err(e) => {
                tracing::warn!("Skipping token {}: {}", token.name, e);
                continue;
            }
        };

        let d = distance::between(target, reference);
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((token, d));
        }
    }

    best.map(|(token, d)| TokenMatch::from_token(token, d))
        .ok_or_else(|| MatchError::NoComparableToken {
            color: hex.to_string(),
        })
}

/// Like [`nearest`], but a failure becomes the displayable "Error" match.
pub fn match_or_degrade(hex: &str, palette: &Palette) -> TokenMatch {
    nearest(hex, palette).unwrap_or_else(|e| {
        tracing::error!("Token matching error for {}: {}", hex, e);
        TokenMatch::degraded(hex, &e.to_string())
    })
}

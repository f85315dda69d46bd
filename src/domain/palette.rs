use crate::core::codec;
use crate::domain::model::Availability;
use crate::utils::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub note: String,
}

impl Token {
    pub fn new(name: &str, value: &str, availability: Availability, note: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            availability,
            note: note.to_string(),
        }
    }
}

/// Ordered set of reference colors. Iteration order is insertion order and
/// decides ties during matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    tokens: Vec<Token>,
}

#[derive(Deserialize)]
struct PaletteFile {
    tokens: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct TokenEntry {
    value: String,
    #[serde(default)]
    availability: Availability,
    #[serde(default)]
    note: String,
}

const BASELINE_TOKENS: &[(&str, &str, Availability, &str)] = &[
    ("primary/50", "#FFF5F7", Availability::Widely, "Light tint"),
    ("primary/100", "#FFE4EA", Availability::Widely, "Soft background"),
    ("primary/300", "#FF7CA1", Availability::Widely, "Accent shade"),
    ("primary/500", "#FF3366", Availability::Widely, "Main brand"),
    ("primary/700", "#C0244B", Availability::Widely, "Dark brand"),
    ("neutral/50", "#FAFAFA", Availability::Widely, "Light bg"),
    ("neutral/100", "#F5F5F5", Availability::Widely, "Surface bg"),
    ("neutral/300", "#D4D4D8", Availability::Widely, "Border"),
    ("neutral/700", "#374151", Availability::Widely, "Text dark"),
    ("accent/blue", "#007BFF", Availability::Limited, "Some old browsers"),
    ("accent/teal", "#14B8A6", Availability::Widely, "Highlight"),
    ("accent/purple", "#8B5CF6", Availability::Widely, "Highlight"),
    ("success/500", "#10B981", Availability::Widely, "Success"),
    ("warning/500", "#F59E0B", Availability::Widely, "Warning"),
    ("danger/500", "#DC2626", Availability::Widely, "Error"),
    ("info/500", "#3B82F6", Availability::Widely, "Info"),
    ("glass/blur", "#FFFFFF", Availability::Limited, "Backdrop blur"),
    ("lab/lch", "#E0D8FF", Availability::Limited, "New color format"),
];

impl Palette {
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let mut seen = HashSet::new();
        for token in &tokens {
            if !seen.insert(token.name.as_str()) {
                return Err(AuditError::DuplicateToken {
                    name: token.name.clone(),
                });
            }
            if !codec::is_hex_color(&token.value) {
                tracing::warn!(
                    "Token {} has malformed value {:?}; it will never be matched",
                    token.name,
                    token.value
                );
            }
        }
        Ok(Self { tokens })
    }

    /// The embedded design-system table.
    pub fn baseline() -> Self {
        let tokens = BASELINE_TOKENS
            .iter()
            .map(|(name, value, availability, note)| Token::new(name, value, *availability, note))
            .collect();
        Self { tokens }
    }

    /// Parses `{"tokens": {"<name>": {"value": "#RRGGBB", "availability": .., "note": ..}}}`,
    /// keeping the document order of the tokens.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: PaletteFile =
            serde_json::from_str(content).map_err(|e| AuditError::PaletteError {
                message: format!("invalid palette JSON: {}", e),
            })?;

        let tokens = file
            .tokens
            .into_iter()
            .map(|(name, raw)| {
                let entry: TokenEntry =
                    serde_json::from_value(raw).map_err(|e| AuditError::PaletteError {
                        message: format!("token {}: {}", name, e),
                    })?;
                Ok(Token {
                    name,
                    value: entry.value,
                    availability: entry.availability,
                    note: entry.note,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(tokens)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.name == name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_table() {
        let palette = Palette::baseline();
        assert_eq!(palette.len(), 18);
        assert_eq!(palette.iter().next().unwrap().name, "primary/50");
        assert_eq!(palette.get("primary/500").unwrap().value, "#FF3366");
        assert_eq!(
            palette.get("accent/blue").unwrap().availability,
            Availability::Limited
        );
        assert!(palette.iter().all(|token| codec::is_hex_color(&token.value)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let tokens = vec![
            Token::new("brand", "#FF0000", Availability::Widely, ""),
            Token::new("brand", "#00FF00", Availability::Widely, ""),
        ];
        assert!(matches!(
            Palette::new(tokens),
            Err(AuditError::DuplicateToken { name }) if name == "brand"
        ));
    }

    #[test]
    fn test_json_palette_keeps_document_order() {
        let palette = Palette::from_json_str(
            r##"{"tokens": {
                "zeta": {"value": "#000000", "availability": "new", "note": "last alphabetically"},
                "alpha": {"value": "#FFFFFF"}
            }}"##,
        )
        .unwrap();

        let names: Vec<&str> = palette.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(palette.get("zeta").unwrap().availability, Availability::New);
        assert_eq!(palette.get("alpha").unwrap().availability, Availability::Unknown);
    }

    #[test]
    fn test_json_palette_reports_bad_token() {
        let err = Palette::from_json_str(r#"{"tokens": {"broken": {"note": "no value"}}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}

use crate::utils::error::{AuditError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AuditError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(extension) if allowed_set.contains(extension) => {}
            Some(extension) => {
                return Err(AuditError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(AuditError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuditError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Accepts `baseline`, an http(s) URL, or a path to a `.json` palette file.
pub fn validate_palette_source(field_name: &str, source: &str) -> Result<()> {
    validate_non_empty_string(field_name, source)?;

    if source.eq_ignore_ascii_case("baseline") {
        return Ok(());
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return validate_url(field_name, source);
    }

    validate_path(field_name, source)?;
    validate_file_extensions(field_name, &[source.to_string()], &["json"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("palette.source", "https://example.com/tokens.json").is_ok());
        assert!(validate_url("palette.source", "http://example.com").is_ok());
        assert!(validate_url("palette.source", "").is_err());
        assert!(validate_url("palette.source", "invalid-url").is_err());
        assert!(validate_url("palette.source", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("scan.progress.every", 5, 1).is_ok());
        assert!(validate_positive_number("scan.progress.every", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["baseline-data.json".to_string()];
        assert!(validate_file_extensions("palette", &files, &["json"]).is_ok());

        let invalid_files = vec!["tokens.yaml".to_string()];
        assert!(validate_file_extensions("palette", &invalid_files, &["json"]).is_err());
    }

    #[test]
    fn test_validate_palette_source() {
        assert!(validate_palette_source("palette", "baseline").is_ok());
        assert!(validate_palette_source("palette", "https://tokens.example.com/palette.json").is_ok());
        assert!(validate_palette_source("palette", "./tokens/baseline-data.json").is_ok());
        assert!(validate_palette_source("palette", "./tokens/palette.toml").is_err());
        assert!(validate_palette_source("palette", "   ").is_err());
    }
}

//! Reading a single form from a TOML or JSON file.

use std::path::{Path, PathBuf};

use tax_core::TaxForm;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFileKind {
    Toml,
    Json,
}

impl FormFileKind {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Some(Self::Toml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormFileError {
    #[error("{0}: form files must end in .toml or .json")]
    UnsupportedExtension(PathBuf),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML form: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON form: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses form text in the given format. Field names may be snake_case or
/// camelCase; values may be numbers, strings or booleans.
pub fn parse_form(
    text: &str,
    kind: FormFileKind,
) -> Result<TaxForm, FormFileError> {
    Ok(match kind {
        FormFileKind::Toml => toml::from_str(text)?,
        FormFileKind::Json => serde_json::from_str(text)?,
    })
}

pub fn load_form(path: &Path) -> Result<TaxForm, FormFileError> {
    let kind = FormFileKind::from_path(path)
        .ok_or_else(|| FormFileError::UnsupportedExtension(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path).map_err(|source| FormFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let form = parse_form(&text, kind)?;
    tracing::debug!(path = %path.display(), ?kind, "loaded form file");
    Ok(form)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{FilingStatus, FormValue};

    use super::*;

    #[test]
    fn kind_is_detected_from_extension() {
        assert_eq!(FormFileKind::from_path(Path::new("me.toml")), Some(FormFileKind::Toml));
        assert_eq!(FormFileKind::from_path(Path::new("me.JSON")), Some(FormFileKind::Json));
        assert_eq!(FormFileKind::from_path(Path::new("me.csv")), None);
        assert_eq!(FormFileKind::from_path(Path::new("me")), None);
    }

    #[test]
    fn toml_form_accepts_mixed_value_types() {
        let form = parse_form(
            r#"
            filing_status = "head"
            age = 41
            dependents = "2"
            wages = 650000.5
            tax_withheld = "12,000"
            child_tax_credit_requested = true
            "#,
            FormFileKind::Toml,
        )
        .expect("should parse");

        assert_eq!(form.age, Some(FormValue::Integer(41)));
        let input = form.to_input();
        assert_eq!(input.filing_status, FilingStatus::Head);
        assert_eq!(input.dependents, 2);
        assert_eq!(input.wages, dec!(650000.5));
        assert_eq!(input.tax_withheld, dec!(12000));
        assert!(input.child_tax_credit_requested);
    }

    #[test]
    fn json_form_accepts_camel_case_names() {
        let form = parse_form(
            r#"{"filingStatus": "widow", "wages": 400000, "taxWithheld": "10000", "educationCreditRequested": "yes"}"#,
            FormFileKind::Json,
        )
        .expect("should parse");
        let input = form.to_input();

        assert_eq!(input.filing_status, FilingStatus::Widow);
        assert_eq!(input.tax_withheld, dec!(10000));
        assert!(input.education_credit_requested);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_form("{\"wages\": ", FormFileKind::Json),
            Err(FormFileError::Json(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        let err = load_form(Path::new("/does/not/exist.yaml")).unwrap_err();

        assert!(matches!(err, FormFileError::UnsupportedExtension(_)));
    }
}

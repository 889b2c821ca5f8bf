use serde::{Deserialize, Serialize};

/// Household situation of the taxpayer. Selects the bracket table and the
/// standard deduction that apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    Head,
    Widow,
}

impl FilingStatus {
    pub fn all() -> &'static [FilingStatus] {
        &[
            FilingStatus::Single,
            FilingStatus::MarriedJoint,
            FilingStatus::MarriedSeparate,
            FilingStatus::Head,
            FilingStatus::Widow,
        ]
    }

    /// Wire name, as submitted by the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedJoint => "married_joint",
            Self::MarriedSeparate => "married_separate",
            Self::Head => "head",
            Self::Widow => "widow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedJoint => "Married Filing Jointly",
            Self::MarriedSeparate => "Married Filing Separately",
            Self::Head => "Head of Household",
            Self::Widow => "Qualifying Widow(er)",
        }
    }

    /// Case-insensitive parse of the wire name. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
    }

    /// Like [`FilingStatus::parse`], but anything unrecognized becomes
    /// [`FilingStatus::Single`].
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::warn!(input = %s, "unrecognized filing status, using single");
            Self::default()
        })
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

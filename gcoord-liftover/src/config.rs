use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gcoord_overlaprs::OverlapperType;

use crate::errors::{LiftOverError, LiftOverResult};

pub const DEFAULT_MIN_MATCH: f64 = 1.0;

fn default_min_match() -> f64 {
    DEFAULT_MIN_MATCH
}

///
/// Settings for a [`LiftOver`](crate::LiftOver), loadable from TOML:
///
/// ```toml
/// chain_file = "test.over.chain"
/// min_match = 0.95
/// overlapper_type = "bits"
/// ```
///
/// `chain_file` is resolved relative to the config file.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LiftOverConfig {
    pub chain_file: Option<String>,
    /// Fraction of query bases a chain must map. `1.0` means the whole query inside one block.
    #[serde(default = "default_min_match")]
    pub min_match: f64,
    #[serde(default)]
    pub overlapper_type: OverlapperType,
}

impl Default for LiftOverConfig {
    fn default() -> Self {
        LiftOverConfig {
            chain_file: None,
            min_match: DEFAULT_MIN_MATCH,
            overlapper_type: OverlapperType::default(),
        }
    }
}

impl LiftOverConfig {
    pub fn validate(&self) -> LiftOverResult<()> {
        validate_min_match(self.min_match)
    }
}

pub(crate) fn validate_min_match(min_match: f64) -> LiftOverResult<()> {
    if min_match > 0.0 && min_match <= 1.0 {
        Ok(())
    } else {
        Err(LiftOverError::Config(format!(
            "min_match must be in (0, 1], got {min_match}"
        )))
    }
}

impl TryFrom<&Path> for LiftOverConfig {
    type Error = LiftOverError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: LiftOverConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/liftover/liftover.toml");
        let config = LiftOverConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.chain_file.as_deref(), Some("test.over.chain"));
        assert_eq!(config.min_match, 0.6);
        assert_eq!(config.overlapper_type, OverlapperType::Bits);
    }

    #[rstest]
    fn test_defaults_when_omitted() {
        let config: LiftOverConfig = toml::from_str("").unwrap();
        assert_eq!(config, LiftOverConfig::default());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.5)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn test_rejects_out_of_range(#[case] min_match: f64) {
        let config = LiftOverConfig {
            min_match,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LiftOverError::Config(_))));
    }

    #[rstest]
    fn test_rejects_unknown_overlapper() {
        let result: Result<LiftOverConfig, _> = toml::from_str("overlapper_type = \"kdtree\"");
        assert!(result.is_err());
    }
}

//! Fold assigner configuration

use crate::clustering::Linkage;
use crate::divergence::Divergence;
use crate::error::{InputError, Result};

/// Parameters of the fold search. Missing fields take their default values when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignerConfig {
    /// approximate number of lattice points used to sample a polygon domain
    pub prediction_points: usize,

    /// upper bound on the number of candidate cluster counts evaluated
    pub max_candidates: usize,

    /// stop after this many consecutive candidates without improvement
    pub patience: usize,

    /// divergence above which a `ConvergenceWarning` is attached to the result
    pub tolerance: f64,

    pub statistic: Divergence,

    pub linkage: Linkage,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        AssignerConfig {
            prediction_points: 1000,
            max_candidates: 100,
            patience: 25,
            tolerance: 0.05,
            statistic: Divergence::default(),
            linkage: Linkage::default(),
        }
    }
}

impl AssignerConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: AssignerConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.prediction_points == 0 {
            Some("prediction_points must be positive")
        } else if self.max_candidates == 0 {
            Some("max_candidates must be positive")
        } else if self.patience == 0 {
            Some("patience must be positive")
        } else if !(self.tolerance >= 0.0) || self.tolerance.is_infinite() {
            Some("tolerance must be a finite non-negative number")
        } else {
            None
        };

        match problem {
            Some(msg) => Err(InputError::InvalidConfig(msg.to_owned()).into()),
            None => Ok(()),
        }
    }
}

#[test]
fn partial_json_uses_defaults() {
    let config = AssignerConfig::from_json(r#"{"linkage": "complete", "tolerance": 0.2}"#).unwrap();
    assert_eq!(config.linkage, Linkage::Complete);
    assert_eq!(config.tolerance, 0.2);
    assert_eq!(config.prediction_points, 1000);
    assert_eq!(config.statistic, Divergence::Wasserstein);
}

#[test]
fn json_round_trip() {
    let config = AssignerConfig {
        statistic: Divergence::KolmogorovSmirnov,
        ..AssignerConfig::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    assert!(text.contains("\"kolmogorov_smirnov\""));
    assert_eq!(AssignerConfig::from_json(&text).unwrap(), config);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(AssignerConfig::from_json(r#"{"patience": 0}"#).is_err());
    assert!(AssignerConfig::from_json(r#"{"tolerance": -1.0}"#).is_err());
    assert!(AssignerConfig::from_json(r#"{"statistic": "chi_squared"}"#).is_err());
}

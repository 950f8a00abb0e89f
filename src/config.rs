use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Locale;

pub const DEFAULT_RECOMMENDED_RR: f64 = 3.0;
pub const DEFAULT_MIN_ACCEPTABLE_RR: f64 = 2.7;
pub const DEFAULT_RISK_PERCENT: f64 = 2.0;
pub const DEFAULT_MAX_RISK_PERCENT: f64 = 2.0;
pub const DEFAULT_RATE_FALLBACK: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min acceptable RR {min} exceeds recommended RR {recommended}")]
    RrOrdering { min: f64, recommended: f64 },
}

/// Risk rules applied to every sizing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Multiple of the stop distance used for the auto take-profit.
    pub recommended_rr: f64,
    /// Lowest RR that still passes the gate.
    pub min_acceptable_rr: f64,
    /// Risk percent used when the member leaves it blank.
    pub default_risk_percent: f64,
    /// Ceiling for the realized risk percent of a sized position.
    pub max_risk_percent: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            recommended_rr: DEFAULT_RECOMMENDED_RR,
            min_acceptable_rr: DEFAULT_MIN_ACCEPTABLE_RR,
            default_risk_percent: DEFAULT_RISK_PERCENT,
            max_risk_percent: DEFAULT_MAX_RISK_PERCENT,
        }
    }
}

impl RiskPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let fields = [
            ("recommended_rr", self.recommended_rr),
            ("min_acceptable_rr", self.min_acceptable_rr),
            ("default_risk_percent", self.default_risk_percent),
            ("max_risk_percent", self.max_risk_percent),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(PolicyError::NotPositive { field, value });
            }
        }
        if self.min_acceptable_rr > self.recommended_rr {
            return Err(PolicyError::RrOrdering {
                min: self.min_acceptable_rr,
                recommended: self.recommended_rr,
            });
        }
        Ok(())
    }

    /// Apply a per-member risk limit set from the admin portal.
    ///
    /// The limit becomes both the member's ceiling and their default risk
    /// percent. A missing or non-positive limit leaves the policy unchanged.
    pub fn with_member_limit(self, limit: Option<f64>) -> Self {
        match limit {
            Some(pct) if pct.is_finite() && pct > 0.0 => Self {
                default_risk_percent: pct,
                max_risk_percent: pct,
                ..self
            },
            _ => self,
        }
    }

    /// Risk percent to size with: the requested one, or the default when the
    /// field is blank, non-positive or not a number.
    pub fn resolve_risk_percent(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(pct) if pct.is_finite() && pct > 0.0 => pct,
            _ => self.default_risk_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Risk
    pub policy: RiskPolicy,
    /// Per-member ceiling set by an admin, in percent.
    pub member_risk_limit: Option<f64>,

    // Exchange rates
    pub rate_api_url: String,
    pub rate_fallback: f64,
    pub rate_cache_secs: u64,
    pub offline: bool,

    // Journal
    pub journal_file: String,
    pub locale: Locale,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let policy = RiskPolicy {
            recommended_rr: env("RR_RECOMMENDED", "3.0")
                .parse()
                .unwrap_or(DEFAULT_RECOMMENDED_RR),
            min_acceptable_rr: env("RR_MIN_ACCEPTABLE", "2.7")
                .parse()
                .unwrap_or(DEFAULT_MIN_ACCEPTABLE_RR),
            default_risk_percent: env("RISK_DEFAULT_PCT", "2")
                .parse()
                .unwrap_or(DEFAULT_RISK_PERCENT),
            max_risk_percent: env("RISK_MAX_PCT", "2")
                .parse()
                .unwrap_or(DEFAULT_MAX_RISK_PERCENT),
        };

        Config {
            policy,
            member_risk_limit: std::env::var("MEMBER_RISK_LIMIT_PCT")
                .ok()
                .and_then(|s| s.parse().ok()),
            rate_api_url: env("FX_RATE_API_URL", "https://open.er-api.com/v6/latest"),
            rate_fallback: env("FX_RATE_FALLBACK", "100")
                .parse()
                .unwrap_or(DEFAULT_RATE_FALLBACK),
            rate_cache_secs: env("FX_RATE_CACHE_SECS", "300").parse().unwrap_or(300),
            offline: env("FX_OFFLINE", "false").to_lowercase() == "true",
            journal_file: env("JOURNAL_FILE", "journal.json"),
            locale: Locale::from_str_loose(&env("JOURNAL_LOCALE", "ja")).unwrap_or(Locale::Ja),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    /// Policy with the member's admin-set limit applied.
    pub fn effective_policy(&self) -> RiskPolicy {
        self.policy.with_member_limit(self.member_risk_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = RiskPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.recommended_rr, 3.0);
        assert_eq!(policy.min_acceptable_rr, 2.7);
        assert_eq!(policy.default_risk_percent, 2.0);
        assert_eq!(policy.max_risk_percent, 2.0);
    }

    #[test]
    fn rejects_non_positive_fields() {
        let policy = RiskPolicy {
            max_risk_percent: 0.0,
            ..RiskPolicy::default()
        };
        assert_eq!(
            policy.validate(),
            Err(PolicyError::NotPositive {
                field: "max_risk_percent",
                value: 0.0
            })
        );

        let policy = RiskPolicy {
            recommended_rr: f64::NAN,
            ..RiskPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_min_rr_above_recommended() {
        let policy = RiskPolicy {
            recommended_rr: 2.0,
            ..RiskPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::RrOrdering { .. })
        ));
    }

    #[test]
    fn member_limit_overrides_ceiling_and_default() {
        let policy = RiskPolicy::default().with_member_limit(Some(1.0));
        assert_eq!(policy.max_risk_percent, 1.0);
        assert_eq!(policy.default_risk_percent, 1.0);
        assert_eq!(policy.min_acceptable_rr, 2.7);

        let unchanged = RiskPolicy::default().with_member_limit(Some(-3.0));
        assert_eq!(unchanged, RiskPolicy::default());
        assert_eq!(RiskPolicy::default().with_member_limit(None), RiskPolicy::default());
    }

    #[test]
    fn blank_risk_percent_falls_back_to_default() {
        let policy = RiskPolicy::default();
        assert_eq!(policy.resolve_risk_percent(None), 2.0);
        assert_eq!(policy.resolve_risk_percent(Some(0.0)), 2.0);
        assert_eq!(policy.resolve_risk_percent(Some(-1.0)), 2.0);
        assert_eq!(policy.resolve_risk_percent(Some(f64::NAN)), 2.0);
        assert_eq!(policy.resolve_risk_percent(Some(1.5)), 1.5);
    }

    #[test]
    fn effective_policy_applies_member_limit() {
        let mut cfg = crate::test_helpers::default_test_config();
        assert_eq!(cfg.effective_policy(), RiskPolicy::default());

        cfg.member_risk_limit = Some(0.5);
        let policy = cfg.effective_policy();
        assert_eq!(policy.max_risk_percent, 0.5);
        assert_eq!(policy.default_risk_percent, 0.5);
    }
}

//! Relay Configuration
//!
//! Runtime settings for the order relay, loaded from environment variables.

use chrono::{TimeDelta, Utc};
use std::time::Duration;

/// Complete relay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Request channel capacity of each store actor.
    pub store_buffer: usize,
    /// How long a registered connection stays routable.
    pub connection_ttl: Duration,
    /// Period of the passive-expiry sweep (`None` = disabled).
    pub sweep_interval: Option<Duration>,
    /// Payment method stamped on orders that arrive without one.
    pub default_payment_method: String,
    /// Preparation estimate, in minutes, for orders that arrive without one.
    pub default_preparation_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            connection_ttl: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Some(Duration::from_secs(300)),
            default_payment_method: "CASH".to_string(),
            default_preparation_minutes: 15,
        }
    }
}

impl Config {
    /// Create configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store buffer or the connection TTL is zero, or if the
    /// TTL is too large to add to the current time.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store_buffer = parse_or(&lookup, "ORDER_RELAY_STORE_BUFFER", defaults.store_buffer);
        if store_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "ORDER_RELAY_STORE_BUFFER",
                reason: "must be at least 1",
            });
        }

        let ttl_secs = parse_or(
            &lookup,
            "ORDER_RELAY_CONNECTION_TTL_SECS",
            defaults.connection_ttl.as_secs(),
        );
        if ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "ORDER_RELAY_CONNECTION_TTL_SECS",
                reason: "must be at least 1",
            });
        }
        let connection_ttl = Duration::from_secs(ttl_secs);
        // Every registration computes `now + ttl`; it has to stay a valid instant.
        if TimeDelta::from_std(connection_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .is_none()
        {
            return Err(ConfigError::Invalid {
                key: "ORDER_RELAY_CONNECTION_TTL_SECS",
                reason: "too large to compute an expiry instant",
            });
        }

        let sweep_secs = parse_or(
            &lookup,
            "ORDER_RELAY_SWEEP_INTERVAL_SECS",
            defaults.sweep_interval.map_or(0, |d| d.as_secs()),
        );

        let default_payment_method = lookup("ORDER_RELAY_DEFAULT_PAYMENT_METHOD")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_payment_method);

        Ok(Self {
            store_buffer,
            connection_ttl,
            sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            default_payment_method,
            default_preparation_minutes: parse_or(
                &lookup,
                "ORDER_RELAY_DEFAULT_PREPARATION_MINUTES",
                defaults.default_preparation_minutes,
            ),
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A variable parsed but holds an unusable value.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.connection_ttl, Duration::from_secs(86_400));
        assert_eq!(config.default_payment_method, "CASH");
        assert_eq!(config.default_preparation_minutes, 15);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("ORDER_RELAY_STORE_BUFFER", "8"),
            ("ORDER_RELAY_CONNECTION_TTL_SECS", "60"),
            ("ORDER_RELAY_SWEEP_INTERVAL_SECS", "5"),
            ("ORDER_RELAY_DEFAULT_PAYMENT_METHOD", "CARD"),
            ("ORDER_RELAY_DEFAULT_PREPARATION_MINUTES", "20"),
        ])
        .unwrap();
        assert_eq!(config.store_buffer, 8);
        assert_eq!(config.connection_ttl, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(5)));
        assert_eq!(config.default_payment_method, "CARD");
        assert_eq!(config.default_preparation_minutes, 20);
    }

    #[test]
    fn test_zero_sweep_interval_disables_sweeper() {
        let config = config_from(&[("ORDER_RELAY_SWEEP_INTERVAL_SECS", "0")]).unwrap();
        assert_eq!(config.sweep_interval, None);
    }

    #[test]
    fn test_unparseable_value_falls_back_to_default() {
        let config = config_from(&[("ORDER_RELAY_STORE_BUFFER", "lots")]).unwrap();
        assert_eq!(config.store_buffer, 32);
    }

    #[test]
    fn test_zero_buffer_and_ttl_rejected() {
        assert!(matches!(
            config_from(&[("ORDER_RELAY_STORE_BUFFER", "0")]),
            Err(ConfigError::Invalid { key: "ORDER_RELAY_STORE_BUFFER", .. })
        ));
        assert!(matches!(
            config_from(&[("ORDER_RELAY_CONNECTION_TTL_SECS", "0")]),
            Err(ConfigError::Invalid { key: "ORDER_RELAY_CONNECTION_TTL_SECS", .. })
        ));
    }

    #[test]
    fn test_unrepresentable_ttl_rejected() {
        let result = config_from(&[("ORDER_RELAY_CONNECTION_TTL_SECS", "18446744073709551615")]);
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: "ORDER_RELAY_CONNECTION_TTL_SECS",
                reason: "too large to compute an expiry instant",
            })
        );

        // Fits in a TimeDelta but not in a calendar date
        let result = config_from(&[("ORDER_RELAY_CONNECTION_TTL_SECS", "9000000000000")]);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "ORDER_RELAY_CONNECTION_TTL_SECS", .. })
        ));
    }
}

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Radii and limits used by the proximity queries.
///
/// The SOS radius and the discovery radius are separate settings on purpose:
/// no relationship between them is assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityConfig {
    pub alert_radius_km: f64,
    pub discovery_radius_km: f64,
    pub transit_radius_km: f64,
    pub incident_radius_km: f64,
    pub max_candidates: usize,
    pub max_concurrent_deliveries: usize,
    pub region_catalog_path: Option<PathBuf>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            alert_radius_km: 1.0,
            discovery_radius_km: 5.0,
            transit_radius_km: 2.0,
            incident_radius_km: 2.0,
            max_candidates: 5000,
            max_concurrent_deliveries: 32,
            region_catalog_path: None,
        }
    }
}

impl ProximityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`, using the default for keys it
    /// does not know.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            alert_radius_km: radius(&lookup, "ALERT_RADIUS_KM", defaults.alert_radius_km)?,
            discovery_radius_km: radius(
                &lookup,
                "DISCOVERY_RADIUS_KM",
                defaults.discovery_radius_km,
            )?,
            transit_radius_km: radius(&lookup, "TRANSIT_RADIUS_KM", defaults.transit_radius_km)?,
            incident_radius_km: radius(
                &lookup,
                "INCIDENT_RADIUS_KM",
                defaults.incident_radius_km,
            )?,
            max_candidates: positive(&lookup, "MAX_CANDIDATES", defaults.max_candidates)?,
            max_concurrent_deliveries: positive(
                &lookup,
                "MAX_CONCURRENT_DELIVERIES",
                defaults.max_concurrent_deliveries,
            )?,
            region_catalog_path: lookup("REGION_CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        };
        log::debug!("proximity configuration: {:?}", config);
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|why: T::Err| ConfigError {
            key: key.to_owned(),
            value: value.clone(),
            reason: why.to_string(),
        }),
        None => {
            log::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn radius<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError {
            key: key.to_owned(),
            value: value.to_string(),
            reason: "expected a positive number of kilometers".to_owned(),
        })
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(ConfigError {
            key: key.to_owned(),
            value: value.to_string(),
            reason: "expected a value greater than zero".to_owned(),
        })
    }
}

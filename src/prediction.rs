//! Wire types for the collision prediction service.
//!
//! Maps the service's JSON bodies into a typed result plus normalized
//! orbit geometry for the globe view. All orbital analysis happens on
//! the service side; this module only validates and reshapes what comes
//! back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{triples_from_flat, GeoPoint};

#[derive(Clone, Debug, Serialize)]
pub struct PredictionRequest {
    pub norad_id_1: String,
    pub norad_id_2: String,
}

impl PredictionRequest {
    /// Both identifiers are required; whitespace-only input counts as
    /// empty and yields no request (and therefore no network call).
    pub fn new(id1: &str, id2: &str) -> Option<Self> {
        let id1 = id1.trim();
        let id2 = id2.trim();
        if id1.is_empty() || id2.is_empty() {
            return None;
        }
        Some(Self {
            norad_id_1: id1.to_string(),
            norad_id_2: id2.to_string(),
        })
    }
}

/// Coarse classification supplied by the service, used only for display
/// styling. Anything unrecognized is carried through verbatim instead of
/// being guessed at.
#[derive(Clone, Debug, PartialEq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown(String),
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Low => "LOW".to_string(),
            Self::Medium => "MEDIUM".to_string(),
            Self::High => "HIGH".to_string(),
            Self::Unknown(raw) => raw.clone(),
        }
    }
}

/// One settled prediction. Immutable once received; the next request
/// replaces it wholesale.
#[derive(Clone, Debug)]
pub struct PredictionResult {
    pub min_distance_km: f64,
    pub time_of_closest_approach: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub collision_probability_score: f64,
}

/// Normalized orbit geometry accompanying a successful prediction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrbitData {
    pub path1: Vec<GeoPoint>,
    pub path2: Vec<GeoPoint>,
    pub closest_point: Option<GeoPoint>,
}

impl OrbitData {
    /// Both ground tracks present; the marker stays optional.
    pub fn is_complete(&self) -> bool {
        !self.path1.is_empty() && !self.path2.is_empty()
    }
}

/// Success body exactly as the service sends it.
#[derive(Debug, Deserialize)]
pub struct WirePrediction {
    pub min_distance_km: f64,
    pub time_of_closest_approach: String,
    pub risk_level: String,
    pub collision_probability_score: f64,
    #[serde(default)]
    pub path1: Vec<f64>,
    #[serde(default)]
    pub path2: Vec<f64>,
    #[serde(default)]
    pub closest_point: Option<Vec<f64>>,
}

/// Failure bodies optionally carry a human-readable detail message.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

impl WirePrediction {
    /// Projects the wire shape into the typed result and orbit pair,
    /// rejecting bodies a well-behaved service would never send: an
    /// unparseable timestamp, ragged coordinate arrays, or empty paths.
    /// A malformed closest point only loses the marker, not the result.
    pub fn into_parts(self) -> Result<(PredictionResult, OrbitData), String> {
        let time_of_closest_approach = DateTime::parse_from_rfc3339(&self.time_of_closest_approach)
            .map_err(|e| format!("time_of_closest_approach: {e}"))?
            .with_timezone(&Utc);

        let path1 = triples_from_flat(&self.path1).map_err(|e| format!("path1: {e}"))?;
        let path2 = triples_from_flat(&self.path2).map_err(|e| format!("path2: {e}"))?;
        if path1.is_empty() || path2.is_empty() {
            return Err("orbit paths are missing or empty".to_string());
        }

        let closest_point = self.closest_point.as_deref().and_then(GeoPoint::from_triple);

        let result = PredictionResult {
            min_distance_km: self.min_distance_km,
            time_of_closest_approach,
            risk_level: RiskLevel::parse(&self.risk_level),
            collision_probability_score: self.collision_probability_score,
        };
        let orbit = OrbitData { path1, path2, closest_point };
        Ok((result, orbit))
    }
}

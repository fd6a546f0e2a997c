//! Request lifecycle state.
//!
//! One value, replaced wholesale on every transition, so there is never a
//! half-updated mix of result and error. A generation counter ties each
//! in-flight request to its reply; a reply from a superseded request is
//! discarded instead of clobbering newer state.

use crate::prediction::{OrbitData, PredictionResult};

#[derive(Clone, Debug, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        generation: u64,
    },
    Completed {
        result: PredictionResult,
        orbit: OrbitData,
    },
    Failed {
        message: String,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Starts a new request: prior result, error, and orbit all drop here.
    pub fn begin(&mut self, generation: u64) {
        *self = Self::Loading { generation };
    }

    /// Applies a settled outcome. Returns false when no request with this
    /// generation is in flight and the reply was discarded.
    pub fn settle(
        &mut self,
        generation: u64,
        outcome: Result<(PredictionResult, OrbitData), String>,
    ) -> bool {
        let in_flight = matches!(self, Self::Loading { generation: g } if *g == generation);
        if !in_flight {
            return false;
        }
        *self = match outcome {
            Ok((result, orbit)) => Self::Completed { result, orbit },
            Err(message) => Self::Failed { message },
        };
        true
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn orbit(&self) -> Option<&OrbitData> {
        match self {
            Self::Completed { orbit, .. } => Some(orbit),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::prediction::RiskLevel;
    use chrono::{TimeZone, Utc};

    fn sample_parts() -> (PredictionResult, OrbitData) {
        let result = PredictionResult {
            min_distance_km: 3.2,
            time_of_closest_approach: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            risk_level: RiskLevel::High,
            collision_probability_score: 92.0,
        };
        let orbit = OrbitData {
            path1: vec![GeoPoint::new(0.0, 0.0, 400_000.0)],
            path2: vec![GeoPoint::new(10.0, 10.0, 500_000.0)],
            closest_point: None,
        };
        (result, orbit)
    }

    #[test]
    fn begin_enters_loading_and_drops_prior_outcome() {
        let mut state = RequestState::Failed { message: "old".to_string() };
        state.begin(1);
        assert!(state.is_loading());
        assert!(state.error().is_none());
        assert!(state.result().is_none());
        assert!(state.orbit().is_none());
    }

    #[test]
    fn success_settles_into_completed() {
        let mut state = RequestState::default();
        state.begin(1);
        assert!(state.settle(1, Ok(sample_parts())));
        assert!(!state.is_loading());
        assert!(state.result().is_some());
        assert!(state.orbit().is_some());
        assert!(state.error().is_none());
    }

    #[test]
    fn failure_settles_into_failed_with_no_result() {
        let mut state = RequestState::default();
        state.begin(1);
        assert!(state.settle(1, Err("satellite not found".to_string())));
        assert_eq!(state.error(), Some("satellite not found"));
        assert!(state.result().is_none());
        assert!(state.orbit().is_none());
    }

    #[test]
    fn reply_for_a_superseded_request_is_discarded() {
        let mut state = RequestState::default();
        state.begin(1);
        state.begin(2);
        assert!(!state.settle(1, Err("slow failure".to_string())));
        assert!(state.is_loading());

        assert!(state.settle(2, Ok(sample_parts())));
        assert!(state.result().is_some());
    }

    #[test]
    fn reply_after_settling_is_discarded() {
        let mut state = RequestState::default();
        state.begin(1);
        assert!(state.settle(1, Ok(sample_parts())));
        assert!(!state.settle(1, Err("late duplicate".to_string())));
        assert!(state.result().is_some());
    }

    #[test]
    fn idle_state_ignores_stray_replies() {
        let mut state = RequestState::default();
        assert!(!state.settle(7, Ok(sample_parts())));
        assert!(matches!(state, RequestState::Idle));
    }
}

//! Application shell and eframe integration.
//!
//! Owns the request state, the retained globe scene, and the update loop
//! that polls for settled predictions and lays out the two panels. The
//! fetch itself runs off the UI thread; replies come back over a channel
//! (native) or a thread-local (web) and are applied by generation.

use eframe::egui;
use nalgebra::Matrix3;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc;

use crate::client::FetchOutcome;
use crate::config::{AppConfig, EXAMPLE_NORAD_ID_1, EXAMPLE_NORAD_ID_2};
use crate::drawing::draw_globe_view;
use crate::math::lat_lon_to_matrix;
use crate::prediction::PredictionRequest;
use crate::scene::GlobeScene;
use crate::state::RequestState;

#[cfg(target_arch = "wasm32")]
thread_local! {
    pub(crate) static PREDICTION_RESULT: std::cell::RefCell<Option<(u64, FetchOutcome)>> =
        const { std::cell::RefCell::new(None) };
}

pub struct App {
    pub(crate) config: AppConfig,
    pub(crate) id1: String,
    pub(crate) id2: String,
    pub(crate) state: RequestState,
    generation: u64,
    scene: GlobeScene,
    rotation: Matrix3<f64>,
    zoom: f64,
    #[cfg(not(target_arch = "wasm32"))]
    fetch_tx: mpsc::Sender<(u64, FetchOutcome)>,
    #[cfg(not(target_arch = "wasm32"))]
    fetch_rx: mpsc::Receiver<(u64, FetchOutcome)>,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(AppConfig::from_env())
    }

    pub(crate) fn with_config(config: AppConfig) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let (fetch_tx, fetch_rx) = mpsc::channel();
        Self {
            config,
            id1: EXAMPLE_NORAD_ID_1.to_string(),
            id2: EXAMPLE_NORAD_ID_2.to_string(),
            state: RequestState::default(),
            generation: 0,
            scene: GlobeScene::new(),
            rotation: Matrix3::identity(),
            zoom: 1.0,
            #[cfg(not(target_arch = "wasm32"))]
            fetch_tx,
            #[cfg(not(target_arch = "wasm32"))]
            fetch_rx,
        }
    }

    /// Kicks off one prediction request. Empty identifiers refuse here,
    /// before any network activity; otherwise prior result, error, and
    /// drawn geometry are cleared and a single fetch goes out.
    pub(crate) fn submit(&mut self, ctx: &egui::Context) {
        let Some(request) = PredictionRequest::new(&self.id1, &self.id2) else {
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        self.state.begin(generation);
        self.scene.rebuild(None);

        let base_url = self.config.api_base_url.clone();
        let ctx = ctx.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let tx = self.fetch_tx.clone();
            std::thread::spawn(move || {
                let outcome = crate::client::fetch_prediction(&base_url, &request);
                // A send after the app is gone is a stale reply; drop it.
                let _ = tx.send((generation, outcome));
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = crate::client::fetch_prediction(&base_url, &request).await;
            PREDICTION_RESULT.with(|cell| {
                *cell.borrow_mut() = Some((generation, outcome));
            });
            ctx.request_repaint();
        });
    }

    fn poll_fetch_results(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        while let Ok((generation, outcome)) = self.fetch_rx.try_recv() {
            self.settle(generation, outcome);
        }

        #[cfg(target_arch = "wasm32")]
        if let Some((generation, outcome)) = PREDICTION_RESULT.with(|cell| cell.borrow_mut().take())
        {
            self.settle(generation, outcome);
        }
    }

    /// Applies one settled fetch. Replies from superseded requests are
    /// discarded; a fresh success rebuilds the scene and re-aims the
    /// camera so the new geometry is in frame.
    pub(crate) fn settle(&mut self, generation: u64, outcome: FetchOutcome) {
        let outcome = outcome.map_err(|err| {
            tracing::warn!(error = %err, "prediction request failed");
            err.display_message()
        });

        if !self.state.settle(generation, outcome) {
            tracing::debug!(generation, "discarding reply from a superseded request");
            return;
        }

        if let Some(orbit) = self.state.orbit() {
            let focus = orbit.closest_point.or_else(|| orbit.path1.first().copied());
            self.scene.rebuild(Some(orbit));
            if let Some(point) = focus {
                self.rotation =
                    lat_lon_to_matrix(point.lat_deg.to_radians(), point.lon_deg.to_radians());
            }
            self.zoom = 1.0;
            tracing::info!(
                entities = self.scene.entities().len(),
                "prediction rendered"
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.poll_fetch_results();

        egui::SidePanel::left("control_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.show_control_panel(ui, ctx);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            let (rotation, zoom) = draw_globe_view(
                ui,
                "globe_view",
                &self.scene,
                self.rotation,
                self.zoom,
                size.x,
                size.y,
            );
            self.rotation = rotation;
            self.zoom = zoom;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PredictionError;
    use crate::geo::GeoPoint;
    use crate::prediction::{OrbitData, PredictionResult, RiskLevel};
    use chrono::{TimeZone, Utc};

    fn test_app() -> App {
        App::with_config(AppConfig::default())
    }

    fn sample_outcome() -> FetchOutcome {
        Ok((
            PredictionResult {
                min_distance_km: 4.5,
                time_of_closest_approach: Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap(),
                risk_level: RiskLevel::Medium,
                collision_probability_score: 61.0,
            },
            OrbitData {
                path1: vec![GeoPoint::new(0.0, 10.0, 420_000.0)],
                path2: vec![GeoPoint::new(5.0, -10.0, 550_000.0)],
                closest_point: Some(GeoPoint::new(2.0, 0.0, 480_000.0)),
            },
        ))
    }

    #[test]
    fn empty_identifier_submits_nothing() {
        let mut app = test_app();
        app.id1 = "25544".to_string();
        app.id2 = String::new();
        app.submit(&egui::Context::default());
        assert_eq!(app.generation(), 0);
        assert!(!app.state.is_loading());
    }

    #[test]
    fn submit_enters_loading_synchronously_and_clears_the_scene() {
        let mut app = test_app();
        app.state.begin(0);
        app.settle(0, sample_outcome());
        assert!(!app.scene().is_empty());

        app.submit(&egui::Context::default());
        assert!(app.state.is_loading());
        assert!(app.scene().is_empty());
        assert!(app.state.result().is_none());
        assert!(app.state.error().is_none());
    }

    #[test]
    fn successful_settle_populates_result_and_scene() {
        let mut app = test_app();
        app.state.begin(1);
        app.settle(1, sample_outcome());
        assert!(app.state.result().is_some());
        assert_eq!(app.scene().entities().len(), 3);
    }

    #[test]
    fn failed_settle_keeps_the_scene_empty_and_reports_the_detail() {
        let mut app = test_app();
        app.state.begin(1);
        app.settle(
            1,
            Err(PredictionError::Service {
                status: 500,
                detail: Some("satellite not found".to_string()),
            }),
        );
        assert_eq!(app.state.error(), Some("satellite not found"));
        assert!(app.state.result().is_none());
        assert!(app.scene().is_empty());
        assert!(!app.state.is_loading());
    }

    #[test]
    fn transport_failure_maps_to_the_generic_message() {
        let mut app = test_app();
        app.state.begin(1);
        app.settle(1, Err(PredictionError::Transport("refused".to_string())));
        assert_eq!(app.state.error(), Some(crate::client::GENERIC_FETCH_ERROR));
        assert!(!app.state.is_loading());
    }

    #[test]
    fn stale_reply_does_not_disturb_newer_state() {
        let mut app = test_app();
        app.state.begin(1);
        app.state.begin(2);
        app.settle(1, sample_outcome());
        assert!(app.state.is_loading());
        assert!(app.scene().is_empty());

        app.settle(2, sample_outcome());
        assert!(app.state.result().is_some());
        assert_eq!(app.scene().entities().len(), 3);
    }
}

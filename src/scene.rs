//! Retained entity set for the globe view.
//!
//! The plot surface is immediate mode; this scene is the single retained
//! description of what it draws. Every rebuild tears the entity set down
//! before adding anything, so a rebuild with incomplete data leaves the
//! globe empty rather than showing stale geometry from an earlier result.

use eframe::egui::Color32;
use nalgebra::Vector3;

use crate::geo::{GeoPoint, EARTH_RADIUS_KM};
use crate::prediction::OrbitData;

pub const PATH1_COLOR: Color32 = Color32::from_rgb(0x00, 0xd2, 0xff);
pub const PATH2_COLOR: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);
pub const MARKER_COLOR: Color32 = Color32::from_rgb(0xf8, 0x30, 0x30);
pub const MARKER_OUTLINE: Color32 = Color32::WHITE;

const PATH_WIDTH: f32 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEntity {
    Polyline {
        points: Vec<Vector3<f64>>,
        color: Color32,
        width: f32,
        glow: bool,
    },
    Marker {
        position: Vector3<f64>,
        color: Color32,
        outline: Color32,
    },
}

pub struct GlobeScene {
    entities: Vec<SceneEntity>,
    fit_radius_km: f64,
}

impl GlobeScene {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            fit_radius_km: EARTH_RADIUS_KM,
        }
    }

    pub fn clear_all(&mut self) {
        self.entities.clear();
        self.fit_radius_km = EARTH_RADIUS_KM;
    }

    pub fn add_polyline(&mut self, path: &[GeoPoint], color: Color32, width: f32, glow: bool) {
        let points = path.iter().map(GeoPoint::to_ecef_km).collect();
        self.entities.push(SceneEntity::Polyline { points, color, width, glow });
    }

    pub fn add_marker(&mut self, point: &GeoPoint, color: Color32, outline: Color32) {
        self.entities.push(SceneEntity::Marker {
            position: point.to_ecef_km(),
            color,
            outline,
        });
    }

    /// Tears down and redraws the whole entity set from one orbit value.
    /// Incomplete data (either path missing) clears the globe instead of
    /// drawing half a result; repeated calls with the same input produce
    /// the same entities.
    pub fn rebuild(&mut self, orbit: Option<&OrbitData>) {
        self.clear_all();
        let Some(orbit) = orbit else { return };
        if !orbit.is_complete() {
            return;
        }

        self.add_polyline(&orbit.path1, PATH1_COLOR, PATH_WIDTH, true);
        self.add_polyline(&orbit.path2, PATH2_COLOR, PATH_WIDTH, true);
        if let Some(point) = &orbit.closest_point {
            self.add_marker(point, MARKER_COLOR, MARKER_OUTLINE);
        }
        self.fit_camera();
    }

    /// Expands the view bounds to cover every entity, so freshly drawn
    /// geometry is always in frame.
    fn fit_camera(&mut self) {
        let mut radius = EARTH_RADIUS_KM;
        for entity in &self.entities {
            match entity {
                SceneEntity::Polyline { points, .. } => {
                    for p in points {
                        radius = radius.max(p.norm());
                    }
                }
                SceneEntity::Marker { position, .. } => {
                    radius = radius.max(position.norm());
                }
            }
        }
        self.fit_radius_km = radius;
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Radius in km of the sphere enclosing everything drawn; the view
    /// derives its plot bounds from this.
    pub fn fit_radius_km(&self) -> f64 {
        self.fit_radius_km
    }
}

impl Default for GlobeScene {
    fn default() -> Self {
        Self::new()
    }
}

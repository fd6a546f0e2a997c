//! Globe projection and plot rendering.
//!
//! Projects the retained scene onto an orthographic globe disc inside an
//! egui_plot surface. Drag rotates, scroll zooms on top of the auto-fit
//! bounds, and geometry on the far side of the planet is dimmed rather
//! than hidden.

use eframe::egui;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, Points, Polygon};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

use crate::geo::EARTH_RADIUS_KM;
use crate::math::rotation_from_drag;
use crate::scene::{GlobeScene, SceneEntity};

const OCEAN_FILL: egui::Color32 = egui::Color32::from_rgb(30, 60, 120);
const OCEAN_STROKE: egui::Color32 = egui::Color32::from_rgb(70, 130, 180);
const GRATICULE_COLOR: egui::Color32 = egui::Color32::from_rgb(60, 85, 130);

const MARKER_RADIUS: f32 = 7.0;
const MARKER_OUTLINE_WIDTH: f32 = 2.0;

/// Draws the scene and returns the camera state updated by any drag or
/// scroll input this frame.
pub fn draw_globe_view(
    ui: &mut egui::Ui,
    id: &str,
    scene: &GlobeScene,
    mut rotation: Matrix3<f64>,
    mut zoom: f64,
    width: f32,
    height: f32,
) -> (Matrix3<f64>, f64) {
    let margin = scene.fit_radius_km() * 1.08 / zoom;

    let plot = Plot::new(id)
        .data_aspect(1.0)
        .width(width)
        .height(height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .cursor_color(egui::Color32::TRANSPARENT);

    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [-margin, -margin],
            [margin, margin],
        ));

        let visual_earth_r = EARTH_RADIUS_KM * 0.95;
        let earth_r_sq = visual_earth_r * visual_earth_r;

        // Far side first so the disc and near side paint over it.
        for entity in scene.entities() {
            match entity {
                SceneEntity::Polyline { points, color, .. } => {
                    for run in visibility_runs(points, &rotation, earth_r_sq, false) {
                        plot_ui.line(
                            Line::new("", PlotPoints::new(run))
                                .color(dim_color(*color))
                                .width(1.0),
                        );
                    }
                }
                SceneEntity::Marker { position, color, .. } => {
                    let r = rotation * position;
                    if r.z < 0.0 && (r.x * r.x + r.y * r.y) < earth_r_sq {
                        plot_ui.points(
                            Points::new("", vec![[r.x, r.y]])
                                .color(dim_color(*color))
                                .radius(MARKER_RADIUS * 0.6)
                                .filled(true),
                        );
                    }
                }
            }
        }

        let disc: PlotPoints = (0..=100)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / 100.0;
                [EARTH_RADIUS_KM * theta.cos(), EARTH_RADIUS_KM * theta.sin()]
            })
            .collect();
        plot_ui.polygon(
            Polygon::new("", disc)
                .fill_color(OCEAN_FILL)
                .stroke(egui::Stroke::new(2.0, OCEAN_STROKE)),
        );

        draw_graticule(plot_ui, &rotation, earth_r_sq);

        for entity in scene.entities() {
            match entity {
                SceneEntity::Polyline { points, color, width, glow } => {
                    for run in visibility_runs(points, &rotation, earth_r_sq, true) {
                        if *glow {
                            plot_ui.line(
                                Line::new("", PlotPoints::new(run.clone()))
                                    .color(glow_color(*color))
                                    .width(width * 2.5),
                            );
                        }
                        plot_ui.line(Line::new("", PlotPoints::new(run)).color(*color).width(*width));
                    }
                }
                SceneEntity::Marker { position, color, outline } => {
                    let r = rotation * position;
                    let visible = r.z >= 0.0 || (r.x * r.x + r.y * r.y) >= earth_r_sq;
                    if visible {
                        plot_ui.points(
                            Points::new("", vec![[r.x, r.y]])
                                .color(*outline)
                                .radius(MARKER_RADIUS + MARKER_OUTLINE_WIDTH)
                                .filled(true),
                        );
                        plot_ui.points(
                            Points::new("", vec![[r.x, r.y]])
                                .color(*color)
                                .radius(MARKER_RADIUS)
                                .filled(true),
                        );
                    }
                }
            }
        }
    });

    if response.response.dragged() && !response.response.drag_started() {
        let drag = response.response.drag_delta();
        let delta_rot = rotation_from_drag(drag.x as f64 * 0.01, drag.y as f64 * 0.01);
        rotation = delta_rot * rotation;
    }

    if response.response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let factor = 1.0 + scroll as f64 * 0.001;
            zoom = (zoom * factor).clamp(0.5, 8.0);
        }
    }

    (rotation, zoom)
}

/// Lat/lon grid standing in for terrain on the simplified globe.
fn draw_graticule(plot_ui: &mut egui_plot::PlotUi, rotation: &Matrix3<f64>, earth_r_sq: f64) {
    for lat_step in (-60..=60).step_by(30) {
        let lat = (lat_step as f64).to_radians();
        let ring: Vec<Vector3<f64>> = (0..=120)
            .map(|i| {
                let lon = 2.0 * PI * i as f64 / 120.0;
                Vector3::new(
                    EARTH_RADIUS_KM * lat.cos() * lon.cos(),
                    EARTH_RADIUS_KM * lat.sin(),
                    EARTH_RADIUS_KM * lat.cos() * lon.sin(),
                )
            })
            .collect();
        let width = if lat_step == 0 { 1.0 } else { 0.5 };
        for run in visibility_runs(&ring, rotation, earth_r_sq, true) {
            plot_ui.line(Line::new("", PlotPoints::new(run)).color(GRATICULE_COLOR).width(width));
        }
    }

    for lon_step in (0..180).step_by(30) {
        let lon = (lon_step as f64).to_radians();
        let ring: Vec<Vector3<f64>> = (0..=120)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / 120.0;
                Vector3::new(
                    EARTH_RADIUS_KM * t.cos() * lon.cos(),
                    EARTH_RADIUS_KM * t.sin(),
                    EARTH_RADIUS_KM * t.cos() * lon.sin(),
                )
            })
            .collect();
        for run in visibility_runs(&ring, rotation, earth_r_sq, true) {
            plot_ui.line(Line::new("", PlotPoints::new(run)).color(GRATICULE_COLOR).width(0.5));
        }
    }
}

/// Splits a polyline into maximal runs that are on the requested side of
/// the globe. A point counts as visible when it faces the viewer or lies
/// outside the disc silhouette.
fn visibility_runs(
    points: &[Vector3<f64>],
    rotation: &Matrix3<f64>,
    earth_r_sq: f64,
    want_visible: bool,
) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for p in points {
        let r = rotation * p;
        let visible = r.z >= 0.0 || (r.x * r.x + r.y * r.y) >= earth_r_sq;
        if visible == want_visible {
            current.push([r.x, r.y]);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn dim_color(color: egui::Color32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (color.r() as f32 * 0.4) as u8,
        (color.g() as f32 * 0.4) as u8,
        (color.b() as f32 * 0.4) as u8,
        200,
    )
}

fn glow_color(color: egui::Color32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 70)
}

#[cfg(test)]
mod tests {
    use super::*;

    const R_SQ: f64 = (EARTH_RADIUS_KM * 0.95) * (EARTH_RADIUS_KM * 0.95);

    #[test]
    fn front_facing_points_form_one_run() {
        let points = vec![
            Vector3::new(0.0, 0.0, EARTH_RADIUS_KM + 400.0),
            Vector3::new(100.0, 100.0, EARTH_RADIUS_KM + 400.0),
        ];
        let runs = visibility_runs(&points, &Matrix3::identity(), R_SQ, true);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 2);
        assert!(visibility_runs(&points, &Matrix3::identity(), R_SQ, false).is_empty());
    }

    #[test]
    fn occluded_points_split_the_visible_run() {
        let front = Vector3::new(0.0, 0.0, EARTH_RADIUS_KM + 400.0);
        let behind = Vector3::new(0.0, 0.0, -(EARTH_RADIUS_KM + 400.0));
        let points = vec![front, behind, front];
        let runs = visibility_runs(&points, &Matrix3::identity(), R_SQ, true);
        assert_eq!(runs.len(), 2);
        let hidden = visibility_runs(&points, &Matrix3::identity(), R_SQ, false);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].len(), 1);
    }

    #[test]
    fn behind_but_outside_the_silhouette_counts_as_visible() {
        let limb = Vector3::new(EARTH_RADIUS_KM + 2000.0, 0.0, -100.0);
        let runs = visibility_runs(&[limb], &Matrix3::identity(), R_SQ, true);
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn dimmed_and_glow_colors_are_fainter_than_the_base() {
        let base = egui::Color32::from_rgb(200, 100, 50);
        let dim = dim_color(base);
        assert!(dim.r() < base.r() && dim.g() < base.g() && dim.b() < base.b());
        let glow = glow_color(base);
        assert!(glow.a() < base.a());
    }
}

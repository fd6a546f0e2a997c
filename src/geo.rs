//! Geographic coordinate types and conversions.
//!
//! The prediction service reports ground tracks as (lon, lat, height)
//! triples; the globe view wants Earth-centered positions in km. The
//! frame matches the rest of the drawing code: +y through the north
//! pole, longitude measured from +x toward +z.

use nalgebra::Vector3;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64, height_m: f64) -> Self {
        Self { lon_deg, lat_deg, height_m }
    }

    /// A triple that is not exactly [lon, lat, height] is no point at all.
    pub fn from_triple(triple: &[f64]) -> Option<Self> {
        match triple {
            &[lon, lat, height] => Some(Self::new(lon, lat, height)),
            _ => None,
        }
    }

    pub fn to_ecef_km(&self) -> Vector3<f64> {
        let r = EARTH_RADIUS_KM + self.height_m / 1000.0;
        let lat = self.lat_deg.to_radians();
        let lon = self.lon_deg.to_radians();
        Vector3::new(
            r * lat.cos() * lon.cos(),
            r * lat.sin(),
            r * lat.cos() * lon.sin(),
        )
    }
}

/// Regroups the service's flat [lon, lat, h, lon, lat, h, ...] arrays.
pub fn triples_from_flat(values: &[f64]) -> Result<Vec<GeoPoint>, String> {
    if values.len() % 3 != 0 {
        return Err(format!(
            "flat coordinate array has length {}, not a multiple of 3",
            values.len()
        ));
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| GeoPoint::new(c[0], c[1], c[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecef_of_origin_points_along_x() {
        let p = GeoPoint::new(0.0, 0.0, 0.0).to_ecef_km();
        assert!((p.x - EARTH_RADIUS_KM).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn ecef_of_north_pole_points_along_y() {
        let p = GeoPoint::new(45.0, 90.0, 0.0).to_ecef_km();
        assert!((p.y - EARTH_RADIUS_KM).abs() < 1e-9);
        assert!(p.x.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn height_is_meters_above_the_sphere() {
        let p = GeoPoint::new(0.0, 0.0, 550_000.0).to_ecef_km();
        assert!((p.norm() - (EARTH_RADIUS_KM + 550.0)).abs() < 1e-9);
    }

    #[test]
    fn flat_array_regroups_in_order() {
        let pts = triples_from_flat(&[10.0, 20.0, 30.0, -40.0, -50.0, 60.0]).unwrap();
        assert_eq!(
            pts,
            vec![GeoPoint::new(10.0, 20.0, 30.0), GeoPoint::new(-40.0, -50.0, 60.0)]
        );
    }

    #[test]
    fn flat_array_of_bad_length_is_rejected() {
        assert!(triples_from_flat(&[1.0, 2.0]).is_err());
        assert!(triples_from_flat(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn empty_flat_array_is_zero_points() {
        assert_eq!(triples_from_flat(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn triple_of_wrong_arity_is_no_point() {
        assert!(GeoPoint::from_triple(&[1.0, 2.0]).is_none());
        assert!(GeoPoint::from_triple(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert_eq!(
            GeoPoint::from_triple(&[1.0, 2.0, 3.0]),
            Some(GeoPoint::new(1.0, 2.0, 3.0))
        );
    }
}

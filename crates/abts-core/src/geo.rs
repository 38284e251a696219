//! Geographic coordinate type and geodesic distance.
//!
//! `GeoPoint` stores `(lon, lat)` in double precision.  Edge lengths are
//! summed during trimming, so single-precision rounding would accumulate
//! across long chains of pass-through nodes.

/// Mean Earth radius in miles.
const EARTH_RADIUS_MI: f64 = 3_958.8;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in miles.
    ///
    /// Symmetric, exactly zero for coincident points, and well-defined for
    /// antipodal pairs (the `atan2` form never takes `asin` of a value > 1).
    pub fn distance_miles(self, other: GeoPoint) -> f64 {
        EARTH_RADIUS_MI * self.central_angle(other)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        EARTH_RADIUS_M * self.central_angle(other)
    }

    /// Central angle between the two points, in radians.
    fn central_angle(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
    }

    /// `[lon, lat]` pair, the layout used by the spatial index.
    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Free-function form of [`GeoPoint::distance_miles`].
#[inline]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    a.distance_miles(b)
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

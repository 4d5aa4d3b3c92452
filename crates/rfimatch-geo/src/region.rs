use geo::algorithm::intersects::Intersects;
use geo::{coord, Point, Rect};

/// Inclusive latitude/longitude box in degrees
///
/// Backed by a planar [`Rect`] with longitude on x and latitude on y, so
/// points on the boundary count as inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBox {
    rect: Rect<f64>,
}

impl LatLonBox {
    pub fn new(lat_range: [f64; 2], lon_range: [f64; 2]) -> Self {
        let rect = Rect::new(
            coord! { x: lon_range[0], y: lat_range[0] },
            coord! { x: lon_range[1], y: lat_range[1] },
        );
        Self { rect }
    }

    /// Box covering the whole globe
    pub fn world() -> Self {
        Self::new([-90.0, 90.0], [-180.0, 180.0])
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        Point::new(longitude, latitude).intersects(&self.rect)
    }
}

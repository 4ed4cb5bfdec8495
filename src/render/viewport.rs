//! Map viewport fitting.

use geo::BoundingRect;
use geo_types::{MultiPoint, Point, Rect};

use crate::models::GeoPoint;

/// Zoom used when a single place is shown
pub const SINGLE_PLACE_ZOOM: u8 = 10;
pub const WORLD_ZOOM: u8 = 2;
pub const WORLD_CENTER: GeoPoint = GeoPoint { lat: 20.0, lon: 0.0 };

/// What part of the map is visible
#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    Centered { center: GeoPoint, zoom: u8 },
    /// Rect in lon/lat (x/y) order
    Bounds(Rect<f64>),
}

impl Default for Viewport {
    fn default() -> Self {
        Self::world()
    }
}

impl Viewport {
    pub fn world() -> Self {
        Viewport::Centered {
            center: WORLD_CENTER,
            zoom: WORLD_ZOOM,
        }
    }

    /// Smallest view that shows every point.
    pub fn fit(points: &[GeoPoint]) -> Self {
        match points {
            [] => Self::world(),
            [only] => Viewport::Centered {
                center: *only,
                zoom: SINGLE_PLACE_ZOOM,
            },
            _ => {
                let multi: MultiPoint<f64> =
                    points.iter().map(|p| Point::from(*p)).collect::<Vec<_>>().into();
                match multi.bounding_rect() {
                    Some(rect) => Viewport::Bounds(rect),
                    None => Self::world(),
                }
            }
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Viewport::Centered { center, zoom } => {
                write!(f, "center ({:.4}, {:.4}) zoom {}", center.lat, center.lon, zoom)
            }
            Viewport::Bounds(rect) => write!(
                f,
                "bounds ({:.4}, {:.4}) - ({:.4}, {:.4})",
                rect.min().y,
                rect.min().x,
                rect.max().y,
                rect.max().x
            ),
        }
    }
}

//! Known sample points inside the pile grids.

/// Geoid nodes as `(row, column, value)`.
pub const GEOID_NODES: [(usize, usize, f32); 3] = [
    (0, 0, 60.0),
    (0, 1, 60.01),
    (10, 20, 50.2),
];

/// Datum nodes as `(row, column, lon, lat)`.
pub const DATUM_NODES: [(usize, usize, f32, f32); 2] = [
    (0, 0, 0.0, 60.0),
    (10, 20, 20.0, 50.0),
];

/// Interpolated geoid samples as `(lon, lat, value)`.
pub const GEOID_SAMPLES: [(f64, f64, f64); 3] = [
    (9.5, 57.5, 57.595),
    (0.0, 60.0, 60.0),
    (19.25, 50.75, 50.9425),
];

/// Interpolated datum samples as `(lon, lat)`; the datum grid maps every
/// point to itself.
pub const DATUM_SAMPLES: [(f64, f64); 3] = [(9.4, 57.6), (0.5, 59.5), (20.0, 50.0)];

/// Points outside the 0..20 E, 50..60 N extent, as `(lon, lat)`.
pub const OUTSIDE_POINTS: [(f64, f64); 4] = [
    (-0.1, 55.0),
    (20.1, 55.0),
    (10.0, 60.1),
    (10.0, 49.9),
];

//! Clipping of lines by the altitude ceiling of the view frustum.

use crate::painter::altitude::ElevatedPoint;
use geopaint_types::Path;

/// Limits every vertex of the path to the `ceiling` altitude.
///
/// Where a segment crosses the ceiling, a vertex is inserted at the crossing, so the parts of the line above the
/// ceiling are flattened onto it.
pub fn clip_by_altitude(path: &Path<ElevatedPoint>, ceiling: f64) -> Path<ElevatedPoint> {
    match path {
        Path::Point((point, altitude)) => Path::Point((*point, altitude.min(ceiling))),
        Path::Leaf(vertices) => Path::Leaf(clip_line(vertices, ceiling)),
        Path::Group(parts) => Path::Group(parts.iter().map(|p| clip_by_altitude(p, ceiling)).collect()),
    }
}

fn clip_line(vertices: &[ElevatedPoint], ceiling: f64) -> Vec<ElevatedPoint> {
    let Some((first, rest)) = vertices.split_first() else {
        return vec![];
    };

    let mut clipped = Vec::with_capacity(vertices.len() + 2);
    clipped.push((first.0, first.1.min(ceiling)));

    let mut prev = *first;
    for &(point, altitude) in rest {
        let (prev_point, prev_altitude) = prev;
        match (prev_altitude >= ceiling, altitude >= ceiling) {
            (true, true) => clipped.push((point, ceiling)),
            (false, true) => {
                let t = (ceiling - prev_altitude) / (altitude - prev_altitude);
                clipped.push((prev_point.lerp(&point, t), ceiling));
                clipped.push((point, ceiling));
            }
            (false, false) => clipped.push((point, altitude)),
            (true, false) => {
                let t = (prev_altitude - ceiling) / (prev_altitude - altitude);
                clipped.push((prev_point.lerp(&point, t), ceiling));
                clipped.push((point, altitude));
            }
        }

        prev = (point, altitude);
    }

    clipped
}

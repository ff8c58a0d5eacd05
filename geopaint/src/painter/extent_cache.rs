use geopaint_types::cartesian::Rect;

#[derive(Debug)]
struct TaggedExtent {
    zoom: f64,
    projection_code: String,
    extent: Option<Rect>,
}

/// Cached extents of a geometry.
///
/// The 2d extent is tagged with the zoom level and the projection it was computed for. The marker extent depends
/// only on the symbols.
#[derive(Debug, Default)]
pub struct ExtentCache {
    extent_2d: Option<TaggedExtent>,
    marker_extent: Option<Option<Rect>>,
}

impl ExtentCache {
    /// Returns the cached 2d extent, computing it if the zoom or the projection changed.
    pub fn extent_2d(
        &mut self,
        zoom: f64,
        projection_code: &str,
        compute: impl FnOnce() -> Option<Rect>,
    ) -> Option<Rect> {
        match &self.extent_2d {
            Some(tagged) if tagged.zoom == zoom && tagged.projection_code == projection_code => {
                tagged.extent
            }
            _ => {
                let extent = compute();
                self.extent_2d = Some(TaggedExtent {
                    zoom,
                    projection_code: projection_code.to_string(),
                    extent,
                });
                extent
            }
        }
    }

    /// Returns the cached marker extent, computing it on the first call.
    pub fn marker_extent(&mut self, compute: impl FnOnce() -> Option<Rect>) -> Option<Rect> {
        *self.marker_extent.get_or_insert_with(compute)
    }

    /// Drops the marker extent.
    pub fn clear_marker_extent(&mut self) {
        self.marker_extent = None;
    }

    /// Drops all extents.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

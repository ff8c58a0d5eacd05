//! Cache of the paint params of a geometry.
//!
//! Two snapshots are kept: the *fast* one is the params computed for the last resolution (possibly simplified), the
//! *complete* one is the unsimplified params, valid for any resolution up to the one it was computed at. Complete
//! params are preferred whenever they are valid, so zooming in after zooming out does not reuse a simplified path.

use crate::geometry::{PaintGeometry, PaintParams};
use std::sync::Arc;

/// Paint params with the resolution they were computed for.
#[derive(Debug, Clone)]
pub struct ParamsSnapshot {
    /// Paint params.
    pub params: Arc<PaintParams>,
    /// Resolution of the snapshot.
    pub resolution: f64,
}

/// Which snapshot the last selection returned.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing was selected since the cache was created or cleared.
    #[default]
    Empty,
    /// Params of the last requested resolution.
    Fast,
    /// Unsimplified params.
    Complete,
}

/// Paint params cache of a single geometry.
#[derive(Debug, Default)]
pub struct ParamsCache {
    fast: Option<ParamsSnapshot>,
    complete: Option<ParamsSnapshot>,
    pitch: f64,
    bearing: f64,
    state: CacheState,
}

impl ParamsCache {
    /// Returns the paint params for the given view state, computing them with the geometry if the cached ones
    /// cannot be used.
    pub fn select<G: PaintGeometry + ?Sized>(
        &mut self,
        geometry: &G,
        resolution: f64,
        pitch: f64,
        bearing: f64,
    ) -> Option<Arc<PaintParams>> {
        let paint_as_path = geometry.paint_as_path();
        let orientation_changed = (pitch != self.pitch && geometry.redraw_when_pitch())
            || (bearing != self.bearing && geometry.redraw_when_rotate());
        if orientation_changed {
            self.complete = None;
        }

        if paint_as_path {
            if let Some(complete) = self.complete.as_ref().filter(|c| resolution <= c.resolution) {
                let params = complete.params.clone();
                self.finish(CacheState::Complete, pitch, bearing);
                return Some(params);
            }
        }

        let needs_refresh = match &self.fast {
            None => true,
            Some(fast) => fast.resolution != resolution || orientation_changed,
        };

        if needs_refresh {
            log::debug!("Paint params are outdated, computing them at resolution {resolution}");
            let params = Arc::new(geometry.paint_params(resolution)?);
            if paint_as_path && !params.simplified {
                match &mut self.complete {
                    Some(complete) => {
                        if resolution > complete.resolution {
                            complete.resolution = resolution;
                        }
                    }
                    None => {
                        log::debug!("Caching complete paint params at resolution {resolution}");
                        self.complete = Some(ParamsSnapshot {
                            params: params.clone(),
                            resolution,
                        });
                    }
                }
            }

            self.fast = Some(ParamsSnapshot {
                params: params.clone(),
                resolution,
            });
            self.finish(CacheState::Fast, pitch, bearing);
            return Some(params);
        }

        let params = self.fast.as_ref().map(|fast| fast.params.clone());
        self.finish(CacheState::Fast, pitch, bearing);
        params
    }

    fn finish(&mut self, state: CacheState, pitch: f64, bearing: f64) {
        self.state = state;
        self.pitch = pitch;
        self.bearing = bearing;
    }

    /// Snapshot the last selection was served from.
    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Resolution up to which the complete snapshot is valid.
    pub fn complete_resolution(&self) -> Option<f64> {
        self.complete.as_ref().map(|c| c.resolution)
    }

    /// Drops both snapshots.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

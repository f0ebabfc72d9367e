/// Lower bound of the timeline zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Upper bound of the timeline zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

const ZOOM_STEP: f64 = 1.2;

/// Converts between pixel positions on the zoomable horizontal timeline and
/// playback times.
///
/// The mapper is transient view state: it owns nothing but the zoom factor,
/// and drag gestures route the converted time into the sync store rather
/// than mutating anything here.
#[derive(Debug, Clone)]
pub struct TimelineMapper {
    zoom: f64,
}

impl Default for TimelineMapper {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl TimelineMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom factor directly, clamped to [0.5, 5].
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Steps the zoom up by 20%, saturating at the upper bound.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    /// Steps the zoom down by 20%, saturating at the lower bound.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Maps a pixel position on the track to a playback time.
    pub fn pixel_to_time(&self, pixel_x: f64, track_width: f64, duration: f64) -> f64 {
        if track_width <= 0.0 || duration <= 0.0 {
            return 0.0;
        }
        pixel_x / track_width * duration / self.zoom
    }

    /// Maps a playback time back to a pixel position on the track. Exact
    /// inverse of [`pixel_to_time`](Self::pixel_to_time).
    pub fn time_to_pixel(&self, time: f64, track_width: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        time * self.zoom / duration * track_width
    }

    /// Offset of a line marker from the left edge of the track, as a
    /// percentage of the (zoomed) track width.
    pub fn marker_offset_percent(&self, time: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        time / duration * 100.0 * self.zoom
    }
}

/// Snapshot of the audio transport as last reported by the clock source.
///
/// The core only reads this; seeks and volume changes are commands issued
/// outward through [`ClockSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub volume: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
            volume: 1.0,
        }
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds an inbound clock notification into the snapshot.
    pub fn apply(&mut self, event: ClockEvent) {
        match event {
            ClockEvent::TimeUpdated(time) => self.current_time = time.max(0.0),
            ClockEvent::MetadataLoaded { duration } => self.duration = duration.max(0.0),
            ClockEvent::PlaybackStarted => self.is_playing = true,
            ClockEvent::PlaybackPaused => self.is_playing = false,
        }
    }

    /// Sets the outgoing volume command value, clamped to [0, 1].
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Playback progress in [0, 1]; zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.current_time / self.duration).clamp(0.0, 1.0)
    }
}

/// Notifications the clock source pushes into the core. They arrive at
/// whatever cadence the audio backend produces, independent of the
/// composition timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    TimeUpdated(f64),
    MetadataLoaded { duration: f64 },
    PlaybackStarted,
    PlaybackPaused,
}

/// The transport contract the core consumes. Audio decoding and output live
/// entirely behind this trait.
pub trait ClockSource {
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    fn set_volume(&mut self, volume: f64);
}

/// Deterministic clock used by tests and the headless preview loop; advanced
/// explicitly instead of by audio hardware.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    time: f64,
    duration: f64,
    playing: bool,
    volume: f64,
}

impl ManualClock {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Moves the clock forward, clamped to the track duration.
    pub fn advance(&mut self, delta: f64) {
        self.time = (self.time + delta.max(0.0)).min(self.duration);
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

impl ClockSource for ManualClock {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_update_the_snapshot() {
        let mut state = PlaybackState::new();
        state.apply(ClockEvent::MetadataLoaded { duration: 180.0 });
        state.apply(ClockEvent::TimeUpdated(45.0));
        state.apply(ClockEvent::PlaybackStarted);

        assert_eq!(state.duration, 180.0);
        assert_eq!(state.current_time, 45.0);
        assert!(state.is_playing);
        assert_eq!(state.progress(), 0.25);
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        let mut state = PlaybackState::new();
        state.set_volume(1.8);
        assert_eq!(state.volume, 1.0);
        state.set_volume(-0.3);
        assert_eq!(state.volume, 0.0);
    }

    #[test]
    fn progress_is_zero_before_metadata_arrives() {
        let mut state = PlaybackState::new();
        state.apply(ClockEvent::TimeUpdated(12.0));
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn manual_clock_advances_and_seeks_within_bounds() {
        let mut clock = ManualClock::with_duration(10.0);
        clock.advance(4.0);
        assert_eq!(clock.current_time(), 4.0);
        clock.advance(100.0);
        assert_eq!(clock.current_time(), 10.0);
        clock.seek(-5.0);
        assert_eq!(clock.current_time(), 0.0);
    }
}

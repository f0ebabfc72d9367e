//! Core library for the Lyric Studio application.
//!
//! The crate owns the two subsystems that carry the real engineering: the
//! lyric synchronization model (the ordered text/timestamp track and its
//! active-line resolution) and the frame composition pipeline (the fixed-rate
//! layered redraw over interchangeable rendering backends). Everything else,
//! such as the audio transport and the widget tree, stays behind the small
//! collaborator contracts in here.

pub mod assets;
pub mod compose;
pub mod config;
pub mod error;
pub mod particles;
pub mod playback;
pub mod project;
pub mod schedule;
pub mod surface;
pub mod sync;
pub mod timeline;

pub use assets::{load_background_image, validate_audio_path, ImageData};
pub use compose::{FrameComposer, FrameInput};
pub use config::{
    FontFamily, OverlayConfig, Resolution, Rgba, StyleConfig, TextAlignment, TextAnimation,
    TextEffect, TextPosition,
};
pub use error::{LyricStudioError, Result};
pub use particles::{Particle, ParticleField, PARTICLE_COUNT};
pub use playback::{ClockEvent, ClockSource, ManualClock, PlaybackState};
pub use project::{
    load_project, read_project_file, save_project, BlobStore, FsBlobStore, MemoryBlobStore,
    ProjectSnapshot, PROJECT_KEY,
};
pub use schedule::{FrameTicker, ThrottleGate, FRAME_PERIOD, VIDEO_RESAMPLE_INTERVAL};
pub use surface::{AcceleratedSurface, RasterSurface, RenderSurface, SurfaceKind, TextStyle};
pub use sync::{format_timecode, LyricLine, SyncStore};
pub use timeline::{TimelineMapper, MAX_ZOOM, MIN_ZOOM};

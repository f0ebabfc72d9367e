use serde::{Deserialize, Serialize};

use crate::{LyricStudioError, Result};

/// One line of lyric text paired with the playback timestamp it was marked
/// at, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    pub text: String,
    pub time: f64,
}

impl LyricLine {
    pub fn new(text: impl Into<String>, time: f64) -> Self {
        Self {
            text: text.into(),
            time,
        }
    }
}

/// Owns the raw lyric text and the ordered synced track derived from it.
///
/// The track keeps mark/import order, which is NOT guaranteed to stay sorted
/// by timestamp once entries are retimed. Every mutation flows through the
/// command methods here; readers only ever see snapshots.
#[derive(Debug, Default)]
pub struct SyncStore {
    raw_lines: Vec<String>,
    track: Vec<LyricLine>,
}

impl SyncStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw lyric text. Splitting the text anew replaces the
    /// whole synced sequence, so marking restarts from the first line.
    pub fn set_lyrics(&mut self, text: &str) {
        self.raw_lines = text.lines().map(str::to_owned).collect();
        self.track.clear();
    }

    /// The raw lyric text as currently held, one line per entry.
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// The raw lyric text joined back into a single newline-separated string.
    pub fn lyrics_text(&self) -> String {
        self.raw_lines.join("\n")
    }

    /// Read-only view of the synced track in mark/import order.
    pub fn track(&self) -> &[LyricLine] {
        &self.track
    }

    pub fn len(&self) -> usize {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }

    /// Appends the next unconsumed raw line with the given timestamp. Lines
    /// consumed so far equal the current track length.
    pub fn mark_next(&mut self, current_time: f64) -> Result<&LyricLine> {
        let index = self.track.len();
        let next = self
            .raw_lines
            .get(index)
            .ok_or(LyricStudioError::NoMoreLines)?;

        self.track.push(LyricLine::new(next.clone(), current_time));
        Ok(&self.track[index])
    }

    /// Overwrites the timestamp at `index`.
    ///
    /// Retiming a line earlier or later than its neighbours is allowed; no
    /// monotonicity is enforced, and [`resolve_active`](Self::resolve_active)
    /// keeps its sequence-order semantics regardless.
    pub fn edit_timestamp(&mut self, index: usize, new_time: f64) -> Result<()> {
        let line = self.track.get_mut(index).ok_or_else(|| {
            LyricStudioError::invalid_input(format!("no synced line at index {index}"))
        })?;
        line.time = new_time;
        Ok(())
    }

    /// Applies a drag gesture on the timeline: the drop position in pixels is
    /// converted to a time using the zoomed track width, then written through
    /// the same path as [`edit_timestamp`](Self::edit_timestamp).
    pub fn retime_by_drag(
        &mut self,
        index: usize,
        pixel_offset: f64,
        timeline_width: f64,
        zoom: f64,
        duration: f64,
    ) -> Result<()> {
        let new_time = pixel_offset / timeline_width * duration / zoom;
        self.edit_timestamp(index, new_time)
    }

    /// Resolves which line is active at `current_time`: the greatest index in
    /// sequence order whose timestamp is `<= current_time`, or `None`.
    ///
    /// The scan is over sequence order, not time-sorted order. When edits
    /// have broken monotonicity, a later entry with a smaller timestamp wins
    /// over an earlier entry with a larger one that also qualifies. That
    /// policy is observable behavior and is pinned by tests; do not replace
    /// it with closest-by-time resolution.
    pub fn resolve_active(&self, current_time: f64) -> Option<usize> {
        let mut active = None;
        for (index, line) in self.track.iter().enumerate() {
            if line.time <= current_time {
                active = Some(index);
            }
        }
        active
    }

    /// Case-insensitive substring search over the synced line texts.
    pub fn search(&self, term: &str) -> Result<Vec<LyricLine>> {
        if term.trim().is_empty() {
            return Err(LyricStudioError::EmptyQuery);
        }

        let needle = term.to_lowercase();
        let matches: Vec<LyricLine> = self
            .track
            .iter()
            .filter(|line| line.text.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(LyricStudioError::NoMatches);
        }
        Ok(matches)
    }

    /// Serializes the track as a pretty-printed JSON array of
    /// `{text, time}` objects.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.track)?)
    }

    /// Renders the track in LRC form: one `[HH:MM:SS]text` line per entry,
    /// newline-joined, without a metadata header.
    pub fn export_lrc(&self) -> String {
        self.track
            .iter()
            .map(|line| format!("[{}]{}", format_timecode(line.time), line.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replaces the whole track from serialized JSON, regenerating the raw
    /// lyric text from the imported lines. Parsing happens before any
    /// mutation, so a malformed document leaves existing state untouched.
    pub fn import_json(&mut self, data: &str) -> Result<()> {
        let imported: Vec<LyricLine> = serde_json::from_str(data)?;
        self.raw_lines = imported.iter().map(|line| line.text.clone()).collect();
        self.track = imported;
        Ok(())
    }

    /// Restores raw text and track together, the project-load path.
    pub fn restore(&mut self, lyrics: &str, track: Vec<LyricLine>) {
        self.raw_lines = lyrics.lines().map(str::to_owned).collect();
        self.track = track;
    }
}

/// Formats elapsed seconds as an 8-character zero-padded `HH:MM:SS` timecode.
pub fn format_timecode(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

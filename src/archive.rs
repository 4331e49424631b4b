//! Text archive sink for decoded samples
//!
//! Appends one human-readable row per sample to a plain text log, matching
//! the column layout field crews already post-process. Write failures are
//! surfaced to the acquisition loop, which treats them as non-fatal.

use crate::acquisition::SampleSink;
use crate::error::Result;
use crate::types::TelemetrySample;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain-text sample log with a banner header
pub struct TextArchive {
    writer: BufWriter<File>,
}

impl TextArchive {
    /// Create the log file (truncating any previous session) and write the
    /// column header
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{:>12} {:>12} {:>12} {:>14} {:>14} {:>12}",
            "ROLL", "PITCH", "YAW", "LAT", "LON", "ALT"
        )?;
        writeln!(writer, "{}", "-".repeat(82))?;
        writer.flush()?;

        log::info!("Archiving samples to {}", path.as_ref().display());
        Ok(Self { writer })
    }
}

impl SampleSink for TextArchive {
    fn record(&mut self, sample: &TelemetrySample) -> Result<()> {
        writeln!(
            self.writer,
            "{:>12.6} {:>12.6} {:>12.6} {:>14.6} {:>14.6} {:>12.6}",
            sample.roll, sample.pitch, sample.yaw, sample.lat, sample.lon, sample.alt
        )?;
        // Flush per row so a crashed session still leaves usable data
        self.writer.flush()?;
        Ok(())
    }
}

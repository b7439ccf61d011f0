// src/telemetry.rs
//
// JSONL telemetry for episodes and ticks.
//
// Off by default; enabled either explicitly or through environment
// variables:
// - RAMSIM_TELEMETRY_MODE: "off" (default) or "jsonl"
// - RAMSIM_TELEMETRY_PATH: path to the JSONL file
//
// Each record is one JSON object per line: episode start/end markers plus
// one TickRecord per step with enough fields to reconstruct the reward.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::reward::RewardComponents;
use crate::state::TerminationReason;

/// Per-tick telemetry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickRecord {
    /// Episode ID (monotone per sink).
    pub episode_id: u64,
    /// Completed tick count after this step.
    pub step: u64,
    /// Action codes as submitted by the agent.
    pub actions: Vec<u8>,
    /// Scalar reward for the tick.
    pub reward: f64,
    /// Decomposed reward terms.
    pub components: RewardComponents,
    /// [ram_usage, cpu_usage, page_faults, swap_usage, power].
    pub system_stats: [f64; 5],
    pub terminated: bool,
    pub truncated: bool,
}

/// Episode boundary marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeMarker {
    pub episode_id: u64,
    pub seed: u64,
    pub marker: MarkerKind,
    /// Tick count at the marker (0 for start).
    pub step: u64,
    /// Set on end markers when the episode finished.
    pub termination_reason: Option<TerminationReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Start,
    End,
}

/// Buffered JSONL sink. Write failures disable the sink rather than
/// aborting the simulation.
pub struct TelemetrySink {
    enabled: bool,
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
    episode_id: u64,
}

impl Default for TelemetrySink {
    fn default() -> Self {
        Self::disabled()
    }
}

impl TelemetrySink {
    /// A sink that discards everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            path: None,
            writer: None,
            episode_id: 0,
        }
    }

    /// Configure from RAMSIM_TELEMETRY_MODE / RAMSIM_TELEMETRY_PATH.
    pub fn from_env() -> Self {
        let enabled = env::var("RAMSIM_TELEMETRY_MODE")
            .map(|s| s.to_lowercase() == "jsonl")
            .unwrap_or(false);
        let path = env::var("RAMSIM_TELEMETRY_PATH").ok().map(PathBuf::from);

        Self {
            enabled: enabled && path.is_some(),
            path,
            writer: None,
            episode_id: 0,
        }
    }

    /// Enable with an explicit path.
    pub fn enable(path: PathBuf) -> Self {
        Self {
            enabled: true,
            path: Some(path),
            writer: None,
            episode_id: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance to the next episode and log its start marker.
    pub fn begin_episode(&mut self, seed: u64) -> u64 {
        self.episode_id += 1;
        let marker = EpisodeMarker {
            episode_id: self.episode_id,
            seed,
            marker: MarkerKind::Start,
            step: 0,
            termination_reason: None,
        };
        self.write_record(&marker);
        self.episode_id
    }

    /// Log the end marker of the current episode.
    pub fn end_episode(&mut self, seed: u64, step: u64, reason: Option<TerminationReason>) {
        let marker = EpisodeMarker {
            episode_id: self.episode_id,
            seed,
            marker: MarkerKind::End,
            step,
            termination_reason: reason,
        };
        self.write_record(&marker);
    }

    /// Log one tick.
    pub fn log_tick(&mut self, record: &TickRecord) {
        self.write_record(record);
    }

    pub fn flush(&mut self) {
        if let Some(writer) = &mut self.writer {
            let _ = writer.flush();
        }
    }

    fn ensure_writer(&mut self) -> Option<&mut BufWriter<File>> {
        if !self.enabled {
            return None;
        }
        if self.writer.is_none() {
            let path = self.path.as_ref()?;
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()?;
            self.writer = Some(BufWriter::new(file));
        }
        self.writer.as_mut()
    }

    fn write_record<T: Serialize>(&mut self, record: &T) {
        let line = match serde_json::to_string(record) {
            Ok(s) => s,
            Err(_) => return,
        };
        let Some(writer) = self.ensure_writer() else {
            return;
        };
        if writeln!(writer, "{}", line).is_err() {
            self.enabled = false;
            self.writer = None;
        }
    }
}

impl Drop for TelemetrySink {
    fn drop(&mut self) {
        self.flush();
    }
}

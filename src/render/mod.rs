// src/render/mod.rs
//
// Styled terminal dashboards for human viewing.
//
// Renderers are external collaborators of the engine: they consume a
// read-only snapshot (system stats, process table, step counter) and draw
// it. No simulation logic lives here and nothing here can mutate engine
// state. Styles form a closed set selected at construction; the engine
// never imports renderer internals.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{Clear, ClearType};

use crate::error::EnvError;
use crate::observation::Observation;

pub mod anime;
pub mod cyberpunk;
pub mod retro;

pub use anime::AnimeRenderer;
pub use cyberpunk::CyberpunkRenderer;
pub use retro::RetroRenderer;

/// Closed set of dashboard styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStyle {
    Cyberpunk,
    Retro,
    Anime,
}

impl RendererStyle {
    /// Parse a style name (case-insensitive). Unknown names are a
    /// construction-time configuration error.
    pub fn parse(s: &str) -> Result<RendererStyle, EnvError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyberpunk" => Ok(RendererStyle::Cyberpunk),
            "retro" => Ok(RendererStyle::Retro),
            "anime" => Ok(RendererStyle::Anime),
            other => Err(EnvError::invalid_configuration(format!(
                "unknown renderer style '{}' (expected cyberpunk|retro|anime)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RendererStyle::Cyberpunk => "cyberpunk",
            RendererStyle::Retro => "retro",
            RendererStyle::Anime => "anime",
        }
    }

    /// Default frame size (columns, rows) for `k` process slots.
    pub fn default_window_size(&self, k: usize) -> (u16, u16) {
        match self {
            // Wide columns, one panel per process.
            RendererStyle::Cyberpunk => {
                let cols = (16 * k as u16 + 24).clamp(80, 180);
                (cols, 26)
            }
            // Classic 80-column monitor, one row per process.
            RendererStyle::Retro => (80, 14 + k as u16),
            // Card layout, a few rows per process.
            RendererStyle::Anime => (72, 10 + 4 * k as u16),
        }
    }

    /// Construct the renderer for this style.
    pub fn build(&self, window_size: Option<(u16, u16)>, k: usize) -> Box<dyn Renderer> {
        let size = window_size.unwrap_or_else(|| self.default_window_size(k));
        match self {
            RendererStyle::Cyberpunk => Box::new(CyberpunkRenderer::new(size)),
            RendererStyle::Retro => Box::new(RetroRenderer::new(size)),
            RendererStyle::Anime => Box::new(AnimeRenderer::new(size)),
        }
    }
}

/// Read-only view handed to a renderer. Built from the observation; a
/// renderer can never reach engine state through it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub step: u64,
    pub system_stats: [f64; 5],
    pub process_table: Vec<[f64; 4]>,
}

impl RenderSnapshot {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            step: obs.step,
            system_stats: obs.system_stats,
            process_table: obs.process_table.clone(),
        }
    }
}

/// A styled dashboard.
///
/// `frame` is pure (snapshot in, styled text out) so styles are unit
/// testable without a terminal; `present` clears the screen and draws.
pub trait Renderer {
    /// Build one styled text frame from the snapshot.
    fn frame(&self, snapshot: &RenderSnapshot) -> String;

    /// Draw a frame to the terminal.
    fn present(&mut self, snapshot: &RenderSnapshot) -> io::Result<()> {
        let mut out = io::stdout();
        execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        write!(out, "{}", self.frame(snapshot))?;
        out.flush()
    }

    /// Release terminal resources. Idempotent.
    fn close(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        execute!(out, ResetColor)?;
        out.flush()
    }
}

/// Horizontal usage meter, `width` cells wide.
pub(crate) fn meter(frac: f64, width: usize, filled: char, empty: char) -> String {
    let frac = frac.clamp(0.0, 1.0);
    let cells = (frac * width as f64).round() as usize;
    let mut bar = String::with_capacity(width);
    for i in 0..width {
        bar.push(if i < cells { filled } else { empty });
    }
    bar
}

/// Human label for a process-table state code.
pub(crate) fn state_label(code: f64) -> &'static str {
    if code == 1.0 {
        "RUN"
    } else if code == 0.6 {
        "SUSP"
    } else if code == 0.3 {
        "SWAP"
    } else {
        "DEAD"
    }
}

/// Labels for the system_stats vector, in observation order.
pub(crate) const STAT_LABELS: [&str; 5] = ["RAM", "CPU", "PGFLT", "SWAP", "POWER"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!(RendererStyle::parse("cyberpunk").unwrap(), RendererStyle::Cyberpunk);
        assert_eq!(RendererStyle::parse(" Retro ").unwrap(), RendererStyle::Retro);
        assert_eq!(RendererStyle::parse("ANIME").unwrap(), RendererStyle::Anime);
        assert!(matches!(
            RendererStyle::parse("hyprland"),
            Err(EnvError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_meter_extremes() {
        assert_eq!(meter(0.0, 4, '#', '.'), "....");
        assert_eq!(meter(1.0, 4, '#', '.'), "####");
        assert_eq!(meter(0.5, 4, '#', '.'), "##..");
        assert_eq!(meter(2.0, 4, '#', '.'), "####");
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(state_label(1.0), "RUN");
        assert_eq!(state_label(0.6), "SUSP");
        assert_eq!(state_label(0.3), "SWAP");
        assert_eq!(state_label(0.0), "DEAD");
    }

    #[test]
    fn test_default_sizes_scale_with_k() {
        for style in [RendererStyle::Cyberpunk, RendererStyle::Retro, RendererStyle::Anime] {
            let (_, rows_small) = style.default_window_size(2);
            let (_, rows_large) = style.default_window_size(12);
            assert!(rows_large >= rows_small);
        }
    }
}

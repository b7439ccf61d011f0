// src/render/retro.rs
//
// Green-phosphor terminal monitor: plain ASCII table, one row per process.

use crossterm::style::{Color, Stylize};

use super::{meter, state_label, RenderSnapshot, Renderer, STAT_LABELS};

pub struct RetroRenderer {
    size: (u16, u16),
}

impl RetroRenderer {
    pub fn new(size: (u16, u16)) -> Self {
        Self { size }
    }
}

impl Renderer for RetroRenderer {
    fn frame(&self, snapshot: &RenderSnapshot) -> String {
        let width = self.size.0 as usize;
        let mut lines: Vec<String> = Vec::new();

        lines.push("=".repeat(width));
        lines.push(format!(
            "RAMSIM SYSTEM MONITOR v1.0                              TICK {:06}",
            snapshot.step
        ));
        lines.push("=".repeat(width));

        for (label, value) in STAT_LABELS.iter().zip(snapshot.system_stats) {
            lines.push(format!(
                "{:<6} [{}] {:>5.1}%",
                label,
                meter(value, 40, '#', '-'),
                value * 100.0
            ));
        }

        lines.push("-".repeat(width));
        lines.push("PID    RAM%    CPU%    PRI     STATE".to_string());
        lines.push("-".repeat(width));
        for (pid, row) in snapshot.process_table.iter().enumerate() {
            let [ram, cpu, priority, state_code] = *row;
            lines.push(format!(
                "{:<6} {:>5.1}   {:>5.1}   {:>5.2}   {}",
                pid,
                ram * 100.0,
                cpu * 100.0,
                priority,
                state_label(state_code)
            ));
        }
        lines.push("=".repeat(width));
        lines.push("READY.".to_string());

        let text = lines.join("\n");
        format!("{}\n", text.with(Color::Green))
    }
}

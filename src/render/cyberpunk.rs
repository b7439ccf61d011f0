// src/render/cyberpunk.rs
//
// Neon dashboard: magenta/cyan panels with block meters and a scanline
// footer.

use crossterm::style::{Color, Stylize};

use super::{meter, state_label, RenderSnapshot, Renderer, STAT_LABELS};

pub struct CyberpunkRenderer {
    size: (u16, u16),
}

impl CyberpunkRenderer {
    pub fn new(size: (u16, u16)) -> Self {
        Self { size }
    }

    fn rule(&self) -> String {
        "═".repeat(self.size.0 as usize)
    }
}

impl Renderer for CyberpunkRenderer {
    fn frame(&self, snapshot: &RenderSnapshot) -> String {
        let mut out = String::new();
        let rule = self.rule();

        out.push_str(&format!("{}\n", rule.clone().with(Color::Magenta)));
        out.push_str(&format!(
            "{}  {}\n",
            "▓▒░ NEONCORE SYSTEM GRID ░▒▓".with(Color::Cyan).bold(),
            format!("tick {:05}", snapshot.step).with(Color::DarkGrey)
        ));
        out.push_str(&format!("{}\n", rule.clone().with(Color::Magenta)));

        for (label, value) in STAT_LABELS.iter().zip(snapshot.system_stats) {
            let bar = meter(value, 30, '▓', '░');
            let color = if value >= 0.8 {
                Color::Red
            } else {
                Color::Cyan
            };
            out.push_str(&format!(
                "{:>6} {} {:>5.1}%\n",
                label.with(Color::Magenta),
                bar.with(color),
                value * 100.0
            ));
        }

        out.push_str(&format!("{}\n", rule.clone().with(Color::Magenta)));
        out.push_str(&format!(
            "{}\n",
            " PID   RAM        CPU        PRI    STATE".with(Color::Cyan)
        ));
        for (pid, row) in snapshot.process_table.iter().enumerate() {
            let [ram, cpu, priority, state_code] = *row;
            let state = state_label(state_code);
            let state_color = match state {
                "RUN" => Color::Green,
                "SUSP" => Color::Yellow,
                "SWAP" => Color::Blue,
                _ => Color::Red,
            };
            out.push_str(&format!(
                " {:>3}   {} {} {:>5.2}  {}\n",
                pid,
                meter(ram, 8, '▓', '░').with(Color::Magenta),
                meter(cpu, 8, '▓', '░').with(Color::Cyan),
                priority,
                state.with(state_color).bold()
            ));
        }

        out.push_str(&format!("{}\n", rule.with(Color::Magenta)));
        out.push_str(&format!(
            "{}\n",
            "░░░░░ scanline ░░░░░".with(Color::DarkMagenta)
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RenderSnapshot {
        RenderSnapshot {
            step: 42,
            system_stats: [0.5, 0.3, 0.1, 0.2, 0.4],
            process_table: vec![
                [0.4, 0.6, 0.9, 1.0],
                [0.0, 0.0, 0.2, 0.3],
                [0.0, 0.0, 0.0, 0.0],
            ],
        }
    }

    #[test]
    fn test_frame_has_style_marker_and_all_rows() {
        let r = CyberpunkRenderer::new((80, 26));
        let frame = r.frame(&snapshot());
        assert!(frame.contains("NEONCORE"));
        assert!(frame.contains("00042"));
        assert!(frame.contains("RUN"));
        assert!(frame.contains("SWAP"));
        assert!(frame.contains("DEAD"));
        assert!(frame.lines().count() >= 3 + 5 + 3);
    }

    #[test]
    fn test_frame_does_not_mutate_snapshot() {
        let r = CyberpunkRenderer::new((80, 26));
        let snap = snapshot();
        let copy = snap.clone();
        let _ = r.frame(&snap);
        assert_eq!(snap, copy);
    }
}

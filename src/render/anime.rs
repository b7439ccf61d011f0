// src/render/anime.rs
//
// Pastel card dashboard: rounded boxes, one card per process.

use crossterm::style::{Color, Stylize};

use super::{meter, state_label, RenderSnapshot, Renderer, STAT_LABELS};

const PASTEL_PINK: Color = Color::Rgb {
    r: 255,
    g: 183,
    b: 197,
};
const PASTEL_BLUE: Color = Color::Rgb {
    r: 173,
    g: 216,
    b: 230,
};

pub struct AnimeRenderer {
    size: (u16, u16),
}

impl AnimeRenderer {
    pub fn new(size: (u16, u16)) -> Self {
        Self { size }
    }

    fn card_width(&self) -> usize {
        (self.size.0 as usize).saturating_sub(4).max(40)
    }
}

impl Renderer for AnimeRenderer {
    fn frame(&self, snapshot: &RenderSnapshot) -> String {
        let w = self.card_width();
        let mut out = String::new();

        out.push_str(&format!(
            "{}\n",
            format!("╭{}╮", "─".repeat(w)).with(PASTEL_PINK)
        ));
        out.push_str(&format!(
            "{}\n",
            format!("│ ✿ ramsim desktop ✿{:>width$} │", format!("tick {}", snapshot.step), width = w - 21)
                .with(PASTEL_PINK)
                .bold()
        ));
        out.push_str(&format!(
            "{}\n",
            format!("╰{}╯", "─".repeat(w)).with(PASTEL_PINK)
        ));

        let stat_line = STAT_LABELS
            .iter()
            .zip(snapshot.system_stats)
            .map(|(label, value)| format!("{} {:>4.0}%", label.to_lowercase(), value * 100.0))
            .collect::<Vec<_>>()
            .join("  ·  ");
        out.push_str(&format!("{}\n\n", stat_line.with(PASTEL_BLUE)));

        for (pid, row) in snapshot.process_table.iter().enumerate() {
            let [ram, cpu, priority, state_code] = *row;
            let state = state_label(state_code);
            out.push_str(&format!(
                "{}\n",
                format!("╭{}╮", "─".repeat(w)).with(PASTEL_BLUE)
            ));
            out.push_str(&format!(
                "{}\n",
                format!(
                    "│ proc {:<3} {:<4}  ram {} cpu {}  pri {:>4.2} │",
                    pid,
                    state.to_lowercase(),
                    meter(ram, 10, '●', '○'),
                    meter(cpu, 10, '●', '○'),
                    priority
                )
                .with(PASTEL_BLUE)
            ));
            out.push_str(&format!(
                "{}\n",
                format!("╰{}╯", "─".repeat(w)).with(PASTEL_BLUE)
            ));
        }

        out
    }
}

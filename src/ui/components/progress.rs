use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::player::PlayerView;

/// Playback position gauge mirroring the view's progress bounds.
pub struct ProgressWidget<'a> {
    view: &'a PlayerView,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(view: &'a PlayerView) -> Self {
        Self { view }
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let ratio = if self.view.progress_max > 0.0 {
            (self.view.progress_value / self.view.progress_max).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Gauge::default()
            .block(Block::default().borders(Borders::NONE))
            .gauge_style(
                Style::default()
                    .fg(Color::from_u32(0x00f7d44b))
                    .bg(Color::from_u32(0x00464646)),
            )
            .ratio(ratio)
            .label(format!(
                "{} / {}",
                self.view.elapsed_label, self.view.duration_label
            ))
            .render(area, buf);
    }
}

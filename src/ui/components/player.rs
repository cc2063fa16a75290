use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::player::PlayerView;

use super::{
    controls::PlayerControlsWidget, details::DetailsWidget,
    progress::ProgressWidget,
};

/// The whole player pane. Hidden until the first track loads, mirroring
/// the original player surface that only appears once something plays.
pub struct PlayerWidget<'a> {
    view: &'a PlayerView,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(view: &'a PlayerView) -> Self {
        Self { view }
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.view.visible {
            Paragraph::new(Line::from(
                "press n to play something".fg(Color::from_u32(0x00464646)),
            ))
            .centered()
            .render(area, buf);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        DetailsWidget::new(self.view).render(rows[0], buf);
        PlayerControlsWidget::new(self.view).render(rows[1], buf);
        ProgressWidget::new(self.view).render(rows[2], buf);
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    text::{Line, ToSpan},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::player::view::{MuteIcon, PlayPauseIcon, PlayerView};

const ACTIVE: Color = Color::from_u32(0x00f7d44b);
const INACTIVE: Color = Color::from_u32(0x00464646);

/// Transport glyphs plus the volume gauge, driven entirely by the view.
pub struct PlayerControlsWidget<'a> {
    view: &'a PlayerView,
}

impl<'a> PlayerControlsWidget<'a> {
    pub fn new(view: &'a PlayerView) -> Self {
        Self { view }
    }
}

impl Widget for PlayerControlsWidget<'_> {
    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
    ) where
        Self: Sized,
    {
        let play_icon = match self.view.play_icon {
            PlayPauseIcon::Play => "󰐊".fg(ACTIVE),
            PlayPauseIcon::Pause => "󰏤".fg(ACTIVE),
        };
        let loop_icon = if self.view.loop_active {
            "󰑖".fg(ACTIVE)
        } else {
            "󰑗".fg(INACTIVE)
        };
        let mute_icon = match self.view.mute_icon {
            MuteIcon::Muted => "󰝟".fg(ACTIVE),
            MuteIcon::Unmuted => "󰕾".fg(INACTIVE),
        };

        let mut controls_text = Line::default();
        controls_text.push_span(play_icon);
        controls_text.push_span("  ");
        controls_text.push_span(loop_icon);
        controls_text.push_span("  ");
        controls_text.push_span(mute_icon);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Length(12)])
            .split(area);

        let controls = Paragraph::new(controls_text)
            .block(Block::default().borders(Borders::TOP | Borders::BOTTOM))
            .centered();
        controls.render(layout[0], buf);

        let volume_gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::new().fg(ACTIVE).bg(INACTIVE))
            .ratio(f64::from(self.view.volume_slider) / 100.0)
            .label(self.view.volume_label.to_span());

        volume_gauge.render(layout[1], buf);
    }
}

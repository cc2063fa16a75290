use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Stylize},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use crate::player::{view::strip_tags, PlayerView};

/// Now-playing pane: the server's detail fragment flattened to text.
pub struct DetailsWidget<'a> {
    view: &'a PlayerView,
}

impl<'a> DetailsWidget<'a> {
    pub fn new(view: &'a PlayerView) -> Self {
        Self { view }
    }
}

impl Widget for DetailsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = match &self.view.details {
            Some(html) => strip_tags(html)
                .into_iter()
                .enumerate()
                .map(|(i, line)| {
                    if i == 0 {
                        Line::from(line.bold())
                    } else {
                        Line::from(line)
                    }
                })
                .collect(),
            None => vec![Line::from(
                "No track".fg(Color::from_u32(0x00464646)),
            )],
        };

        Paragraph::new(lines)
            .block(Block::bordered())
            .centered()
            .render(area, buf);
    }
}

use flume::{Receiver, Sender};

use ratatui::{
    crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind},
    style::{Color, Style},
    widgets::{block::Title, Block, Widget},
    Frame,
};

use crate::{
    api::SongIndexClient, audio::backend::StreamingElement, config::Config,
    event::events::GlobalEvent, player::PlayerController,
};

use super::{
    components::player::PlayerWidget,
    tui::{self, TerminalEvent},
};

pub struct App {
    pub event_rx: Receiver<GlobalEvent>,
    pub event_tx: Sender<GlobalEvent>,
    pub player: PlayerController<StreamingElement, SongIndexClient>,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let media = StreamingElement::new()?;
        let index = SongIndexClient::new(&config.server_url);
        let player = PlayerController::new(
            media,
            index,
            &config.server_url,
            config.volume,
        );

        Ok(Self {
            event_rx,
            event_tx,
            player,
            has_focus: true,
            should_quit: false,
        })
    }

    /// Handle for seeding commands before the loop starts (the CLI's
    /// `play-all` lands here).
    pub fn command_tx(&self) -> Sender<GlobalEvent> {
        self.event_tx.clone()
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;

        tui.enter()?;

        loop {
            tui.draw(|f| {
                self.ui(f);
            })?;

            if let Some(evt) = tui.next().await {
                self.handle_event(evt).await;
            };

            if self.should_quit {
                break;
            }
        }

        tui.exit()?;

        Ok(())
    }

    async fn handle_event(&mut self, evt: TerminalEvent) {
        match evt {
            TerminalEvent::Tick => self.handle_actions().await,
            TerminalEvent::FocusGained => self.has_focus = true,
            TerminalEvent::FocusLost => self.has_focus = false,
            TerminalEvent::Key(key) => self.handle_key_event(key),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        let send = |event: GlobalEvent| {
            let _ = self.event_tx.send(event);
        };

        match evt.code {
            KeyCode::Char('c')
                if evt.modifiers == event::KeyModifiers::CONTROL =>
            {
                send(GlobalEvent::Quit)
            }
            KeyCode::Char('q') => send(GlobalEvent::Quit),
            KeyCode::Char(' ') => send(GlobalEvent::TogglePlayPause),
            KeyCode::Char('n') => send(GlobalEvent::Next),
            KeyCode::Char('p') => send(GlobalEvent::Previous),
            KeyCode::Char('l') => send(GlobalEvent::ToggleLoop),
            KeyCode::Char('m') => send(GlobalEvent::ToggleMute),
            KeyCode::Char('+') => send(GlobalEvent::Volume(
                self.player.volume_percent().saturating_add(10),
            )),
            KeyCode::Char('-') => send(GlobalEvent::Volume(
                self.player.volume_percent().saturating_sub(10),
            )),
            KeyCode::Char('=') => send(GlobalEvent::Volume(100)),
            KeyCode::Left => send(GlobalEvent::SeekBy(-10)),
            KeyCode::Right => send(GlobalEvent::SeekBy(10)),
            _ => {}
        }
    }

    async fn handle_actions(&mut self) {
        while let Ok(evt) = self.event_rx.try_recv() {
            self.handle_action(evt).await;
        }

        self.player.sync_progress();
    }

    async fn handle_action(&mut self, evt: GlobalEvent) {
        match evt {
            GlobalEvent::PlayAll { kind, value } => {
                self.player.play_all(&kind, &value).await
            }
            GlobalEvent::Next => self.player.next().await,
            GlobalEvent::Previous => self.player.previous().await,
            GlobalEvent::TogglePlayPause => self.player.toggle_play_pause(),
            GlobalEvent::ToggleLoop => self.player.toggle_loop(),
            GlobalEvent::ToggleMute => self.player.toggle_mute(),
            GlobalEvent::Volume(percent) => self.player.set_volume(percent),
            GlobalEvent::SeekBy(secs) => self.player.seek_by(secs),
            GlobalEvent::Quit => self.should_quit = true,
        }
    }

    fn ui(&self, frame: &mut Frame) {
        if self.has_focus {
            self.render(frame);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let buf = frame.buffer_mut();
        buf.set_style(area, Style::new().bg(Color::from_u32(0x00181818)));

        let block = Block::bordered().title(
            Title::from("melos").alignment(ratatui::layout::Alignment::Center),
        );
        let inner = block.inner(area);
        block.render(area, buf);

        PlayerWidget::new(self.player.view()).render(inner, buf);
    }
}

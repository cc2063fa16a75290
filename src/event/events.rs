/// Commands routed to the player from the keymap and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalEvent {
    PlayAll { kind: String, value: String },
    Next,
    Previous,
    TogglePlayPause,
    ToggleLoop,
    ToggleMute,
    Volume(u8),
    SeekBy(i64),
    Quit,
}

use std::panic;

use color_eyre::{
    config::HookBuilder,
    eyre::{self, Result},
};
use tracing::error;

use super::tui::Tui;

/// Panic and error hooks that put the terminal back together before
/// anything is printed.
pub fn install() -> Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();

    let panic_hook = panic_hook.into_panic_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = Tui::restore() {
            error!("unable to restore the terminal: {err:?}");
        }
        panic_hook(panic_info);
    }));

    let eyre_hook = eyre_hook.into_eyre_hook();
    eyre::set_hook(Box::new(move |err| {
        let _ = Tui::restore();
        eyre_hook(err)
    }))?;

    Ok(())
}

//! Progress spinners shown while the external codecs run.

use crate::constants::SPINNER_CHARS;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a standard progress spinner with consistent styling.
///
/// # Returns
///
/// A configured `ProgressBar` instance in spinner mode with cyan styling
/// and the standard spinner character sequence.
pub fn create_progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(SPINNER_CHARS);
    spinner.set_style(style);
    spinner
}

/// Spinner that ticks on its own while a blocking call runs.
///
/// ```ignore
/// let spinner = stage_spinner("Encoding 01 Intro.flac");
/// codec.encode(&request)?;
/// spinner.finish_and_clear();
/// ```
pub fn stage_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = create_progress_spinner();
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

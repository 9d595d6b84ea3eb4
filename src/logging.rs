use crate::{error::PigcelReleaseError, result::Result};

/// Initialize terminal logger with debug or info level filtering for
/// pigcel-release output.
pub fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("pigcel_release")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .map_err(PigcelReleaseError::from)?;

    Ok(())
}

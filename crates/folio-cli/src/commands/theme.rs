use anyhow::Result;
use tracing::info;

use folio_core::{AppConfig, Theme};

pub fn show(config: &AppConfig) -> Result<()> {
    println!("{}", config.ui.theme);
    Ok(())
}

pub fn toggle(config: &mut AppConfig) -> Result<()> {
    let theme = config.ui.theme.toggled();
    set(config, theme)
}

pub fn set(config: &mut AppConfig, theme: Theme) -> Result<()> {
    if config.ui.theme == theme {
        println!("Theme is already {}", theme);
        return Ok(());
    }

    config.ui.theme = theme;
    config.save()?;
    info!(%theme, "Theme preference saved");
    println!("Theme set to {}", theme);
    Ok(())
}

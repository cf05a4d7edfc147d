use crate::columns::ViewMode;
use crate::error::{Result, SalesError};
use crate::fmt::Locale;
use crate::settings::{load_settings, save_settings, Settings};

#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub default_mode: Option<ViewMode>,
    pub currency_prefix: Option<String>,
    pub page_length: Option<usize>,
    pub locale: Option<Locale>,
    pub data_dir: Option<String>,
}

impl SettingsUpdate {
    fn is_empty(&self) -> bool {
        self.default_mode.is_none()
            && self.currency_prefix.is_none()
            && self.page_length.is_none()
            && self.locale.is_none()
            && self.data_dir.is_none()
    }
}

/// Apply `update` to `settings`. A page length of zero is rejected.
pub fn apply(settings: &mut Settings, update: SettingsUpdate) -> Result<()> {
    if update.page_length == Some(0) {
        return Err(SalesError::Settings("page length must be at least 1".into()));
    }
    if let Some(mode) = update.default_mode {
        settings.default_mode = mode;
    }
    if let Some(prefix) = update.currency_prefix {
        settings.currency_prefix = prefix;
    }
    if let Some(n) = update.page_length {
        settings.page_length = n;
    }
    if let Some(locale) = update.locale {
        settings.locale = locale;
    }
    if let Some(dir) = update.data_dir {
        settings.data_dir = expand_home(&dir);
    }
    Ok(())
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().to_string(),
        _ => path.to_string(),
    }
}

pub fn run(update: SettingsUpdate) -> Result<()> {
    let mut settings = load_settings();
    if !update.is_empty() {
        apply(&mut settings, update)?;
        save_settings(&settings)?;
        tracing::info!("settings saved");
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

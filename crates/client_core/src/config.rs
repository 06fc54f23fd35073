use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::SettingsError;

pub const DEFAULT_SETTINGS_FILE: &str = "kinematic.toml";
pub const DEFAULT_TABLE: &str = "kinematic_groups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    /// Signed-in user's JWT. Requests fall back to the anon key when unset.
    pub access_token: Option<String>,
    pub table: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            anon_key: None,
            access_token: None,
            table: DEFAULT_TABLE.into(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    access_token: Option<String>,
    table: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Resolves settings from defaults, then the settings file, then the
/// environment. A missing file is not an error.
pub fn load_settings(path: Option<&Path>) -> ClientSettings {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    let mut settings = ClientSettings::default();
    if let Ok(raw) = fs::read_to_string(&path) {
        settings.apply_file(&raw, &path);
    }
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

impl ClientSettings {
    fn apply_file(&mut self, raw: &str, path: &Path) {
        let file_cfg = match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => file_cfg,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
                return;
            }
        };

        if let Some(v) = file_cfg.supabase_url {
            self.supabase_url = Some(v);
        }
        if let Some(v) = file_cfg.anon_key {
            self.anon_key = Some(v);
        }
        if let Some(v) = file_cfg.access_token {
            self.access_token = Some(v);
        }
        if let Some(v) = file_cfg.table {
            self.table = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
    }

    // APP__* names win over the bare ones
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SUPABASE_URL") {
            self.supabase_url = Some(v);
        }
        if let Some(v) = lookup("APP__SUPABASE_URL") {
            self.supabase_url = Some(v);
        }

        if let Some(v) = lookup("SUPABASE_ANON_KEY") {
            self.anon_key = Some(v);
        }
        if let Some(v) = lookup("APP__SUPABASE_ANON_KEY") {
            self.anon_key = Some(v);
        }

        if let Some(v) = lookup("SUPABASE_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        if let Some(v) = lookup("APP__SUPABASE_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }

        if let Some(v) = lookup("APP__TABLE") {
            self.table = v;
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        non_blank(&self.supabase_url).is_some() && non_blank(&self.anon_key).is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn table_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = non_blank(&self.supabase_url).ok_or(SettingsError::MissingUrl)?;
        table_endpoint(raw, &self.table)
    }
}

pub fn table_endpoint(base_url: &str, table: &str) -> Result<Url, SettingsError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|base| base.join(&format!("rest/v1/{}", table.trim())))
        .map_err(|source| SettingsError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

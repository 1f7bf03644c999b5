use std::{env, fs, io, path::PathBuf, str::FromStr};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub use crate::{encoder::Encoder, paths::Paths};

mod encoder;
mod paths;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Options {
    #[serde(default)]
    pub paths: Paths,

    #[serde(default)]
    pub encoder: Encoder,
}

fn env_override_str<T: FromStr>(value: &mut Option<T>, env_name: &str) {
    if let Some(env_var) = env::var(env_name)
        .ok()
        .and_then(|env_var| T::from_str(&env_var).ok())
    {
        *value = Some(env_var);
    }
}

impl Options {
    pub fn path() -> Option<PathBuf> {
        const SETTINGS_FILENAME: &str = "settings.toml";

        let dirs = ProjectDirs::from("io.github", "scmtools", "scmtools")?;
        let config_dir = dirs.config_dir();

        Some(config_dir.join(SETTINGS_FILENAME))
    }

    pub fn save(&self) -> Result<(), io::Error> {
        let config_path =
            Self::path().ok_or(io::Error::other("Couldn't determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let output = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(config_path, output)?;

        Ok(())
    }

    /// Reads `settings.toml`, falling back to defaults when it is missing or unreadable, then
    /// applies the `SCM_ALIGNMENT` and `SCM_CORPUS_PATH` environment overrides.
    pub fn load() -> Result<Self, io::Error> {
        let mut options = match Self::path() {
            Some(config_path) => Self::from_file(config_path),
            None => Options::default(),
        };

        options.apply_env_overrides();

        Ok(options)
    }

    fn from_file(config_path: PathBuf) -> Self {
        fs::read_to_string(config_path)
            .and_then(|contents| toml::from_str::<Options>(&contents).map_err(io::Error::other))
            .unwrap_or_default()
    }

    fn apply_env_overrides(&mut self) {
        env_override_str(&mut self.encoder.alignment, "SCM_ALIGNMENT");
        env_override_str(&mut self.paths.corpus, "SCM_CORPUS_PATH");
    }
}

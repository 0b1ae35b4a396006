#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::services::DEFAULT_TOP_K;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    HealthCheckTimeout,
    StateFile,
    TopK,
}

fn cache_dir() -> path::PathBuf {
    return dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("dossier");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        #[cfg(not(target_os = "macos"))]
        let config_path = cache_dir().join("config.toml");
        #[cfg(target_os = "macos")]
        let config_path = dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".config/dossier/config.toml");

        let state_path = cache_dir().join("state.yaml");
        let default_top_k = DEFAULT_TOP_K.to_string();

        let res: &str = match key {
            ConfigKey::ApiURL => "http://localhost:8000",
            ConfigKey::HealthCheckTimeout => "1000",
            ConfigKey::TopK => &default_top_k,

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
            ConfigKey::StateFile => return state_path.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    /// Directory receiving `debug.log` when running with `RUST_LOG=dossier`.
    pub fn log_dir() -> path::PathBuf {
        if let Ok(dir) = env::var("DOSSIER_LOG_DIR") {
            return path::PathBuf::from(dir);
        }

        return cache_dir();
    }

    pub fn top_k() -> Result<u32> {
        let val = Config::get(ConfigKey::TopK);
        match val.parse::<u32>() {
            Ok(top_k) if top_k > 0 => return Ok(top_k),
            _ => bail!(format!("top-k must be a positive number, got '{val}'")),
        }
    }

    fn validate() -> Result<()> {
        Config::top_k()?;

        let timeout = Config::get(ConfigKey::HealthCheckTimeout);
        if timeout.parse::<u64>().is_err() {
            bail!(format!(
                "health-check-timeout must be a number of milliseconds, got '{timeout}'"
            ));
        }

        let url = Config::get(ConfigKey::ApiURL);
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!(format!("api-url must be an http(s) URL, got '{url}'"));
        }

        return Ok(());
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::set(key, val_str);
                    } else {
                        bail!(format!("config.toml has an invalid value for key '{key}'"));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::validate()?;

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            state_file = Config::get(ConfigKey::StateFile),
            top_k = Config::get(ConfigKey::TopK),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let description = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    .and_then(|arg| return arg.get_help())
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}

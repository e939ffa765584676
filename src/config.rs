use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://rally1.rallydev.com";
pub const DEFAULT_PAIRING_FIELD: &str = "c_PairingPartner";
pub const DEFAULT_DAYS_BACK: u32 = 30;
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{key} must be a non-negative integer, got '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read config from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk layout of `config.toml`. Every key is optional here; required
/// values may come from the environment instead.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub rally: Option<RallySection>,
    pub report: Option<ReportSection>,
    pub mail: Option<MailSection>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RallySection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub pairing_field: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportSection {
    pub days_back: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MailSection {
    pub address: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rally: RallyConfig,
    pub days_back: u32,
    pub mail: MailConfig,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct RallyConfig {
    pub base_url: String,
    pub api_key: String,
    /// Display name matched against story owners when attributing roles.
    pub username: String,
    pub pairing_field: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Used as sender, recipient and SMTP login.
    pub address: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub password: String,
}

/// Values supplied on the command line, applied after file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub days_back: Option<u32>,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("accepted-report")
        .join("config.toml")
}

impl AppConfig {
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match &overrides.config_path {
            Some(path) => read_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    read_file(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        let mut config = Self::resolve(file, |key| std::env::var(key).ok())?;
        if let Some(days) = overrides.days_back {
            config.days_back = days;
        }
        Ok(config)
    }

    /// Layer environment values over file values and validate the result.
    ///
    /// All missing required keys are reported together, by env name.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let rally = file.rally.unwrap_or_default();
        let report = file.report.unwrap_or_default();
        let mail = file.mail.unwrap_or_default();

        let pick = |key: &str, fallback: Option<String>| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
        };

        let api_key = pick("RALLY_API_KEY", rally.api_key);
        let username = pick("RALLY_USERNAME", rally.username);
        let address = pick("YOUR_EMAIL", mail.address);
        let password = pick("EMAIL_PASSWORD", mail.password);

        let missing: Vec<&'static str> = [
            ("RALLY_API_KEY", api_key.is_none()),
            ("RALLY_USERNAME", username.is_none()),
            ("YOUR_EMAIL", address.is_none()),
            ("EMAIL_PASSWORD", password.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(api_key), Some(username), Some(address), Some(password)) =
            (api_key, username, address, password)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let days_back = match env("DAYS_BACK").filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_number("DAYS_BACK", &raw)?,
            None => report.days_back.unwrap_or(DEFAULT_DAYS_BACK),
        };
        let smtp_port = match env("SMTP_PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_number("SMTP_PORT", &raw)?,
            None => mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
        };

        let base_url = pick("RALLY_BASE_URL", rally.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            rally: RallyConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                username,
                pairing_field: pick("RALLY_PAIRING_FIELD", rally.pairing_field)
                    .unwrap_or_else(|| DEFAULT_PAIRING_FIELD.to_string()),
            },
            days_back,
            mail: MailConfig {
                address,
                smtp_server: pick("SMTP_SERVER", mail.smtp_server)
                    .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                smtp_port,
                password,
            },
            log_level: pick("LOG_LEVEL", file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        rally: RallyConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: "key".into(),
            username: "Jane Doe".into(),
            pairing_field: DEFAULT_PAIRING_FIELD.to_string(),
        },
        days_back: DEFAULT_DAYS_BACK,
        mail: MailConfig {
            address: "jane@example.com".into(),
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            password: "secret".into(),
        },
        log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
}

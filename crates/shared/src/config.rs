//! Application configuration management.
//!
//! Values are layered, lowest precedence first:
//! 1. `config/default.toml` and `config/{RUN_MODE}.toml` (both optional)
//! 2. `TALENT__SECTION__KEY` environment variables
//! 3. The flat keys of the original deployment (`PORT`, `EMAIL_USER`,
//!    `EMAIL_PASS`, `EMAIL_ADMIN`)

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail relay configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Resume upload configuration.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Use TLS when talking to the relay. Disable only for local catchers.
    #[serde(default = "default_true")]
    pub smtp_tls: bool,
    /// SMTP account username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP account password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default)]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Administrative inbox that receives every application.
    #[serde(default)]
    pub admin_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_tls: true,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: String::new(),
            from_name: default_from_name(),
            admin_email: String::new(),
        }
    }
}

impl EmailConfig {
    /// Formatted sender mailbox, `Name <address>` when a display name is set.
    #[must_use]
    pub fn sender(&self) -> String {
        if self.from_name.is_empty() {
            self.from_email.clone()
        } else {
            format!("{} <{}>", self.from_name, self.from_email)
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Talent Portal".to_string()
}

const fn default_true() -> bool {
    true
}

/// Resume upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory that receives accepted uploads.
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Accepted filename suffixes, lower-case and including the dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Keep uploads on disk after the notification has been sent.
    #[serde(default)]
    pub retain_after_send: bool,
}

impl UploadConfig {
    /// Default max file size: 5MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create an upload config rooted at `dir` with default limits.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Keep uploads after sending.
    #[must_use]
    pub fn with_retention(mut self, retain: bool) -> Self {
        self.retain_after_send = retain;
        self
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: default_allowed_extensions(),
            retain_after_send: false,
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

const fn default_max_file_size() -> u64 {
    UploadConfig::DEFAULT_MAX_FILE_SIZE
}

fn default_allowed_extensions() -> Vec<String> {
    vec![".pdf".to_string(), ".doc".to_string(), ".docx".to_string()]
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let flat = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALENT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_extensions")
                    .try_parsing(true),
            )
            .set_override_option("server.port", flat("PORT"))?
            .set_override_option("email.smtp_username", flat("EMAIL_USER"))?
            .set_override_option("email.from_email", flat("EMAIL_USER"))?
            .set_override_option("email.smtp_password", flat("EMAIL_PASS"))?
            .set_override_option("email.admin_email", flat("EMAIL_ADMIN"))?
            .build()?;

        config.try_deserialize()
    }
}

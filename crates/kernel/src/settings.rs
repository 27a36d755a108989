use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use saboga_db::{RoleGrant, UserSpec};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SABOGA_ENV";
const CONFIG_DIR_ENV: &str = "SABOGA_CONFIG_DIR";
const ENV_PREFIX: &str = "SABOGA";

/// Deployment environment the seeder is running against.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub collections: CollectionSettings,
    #[serde(default)]
    pub seed_user: SeedUserSettings,
    #[serde(default)]
    pub generate: GenerateSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// and `SABOGA_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(None)
    }

    /// Like [`Settings::load`], with an explicit config directory taking
    /// precedence over `SABOGA_CONFIG_DIR`.
    pub fn load_with(config_dir: Option<&Path>) -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let config_dir = match (config_dir, std::env::var(CONFIG_DIR_ENV)) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Ok(dir)) => PathBuf::from(dir),
            (None, Err(_)) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir)
    }

    /// Load configuration from an explicit config directory.
    pub fn load_from(config_dir: &Path) -> anyhow::Result<Self> {
        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let parsed = Environment::parse(&environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected overlay wins over any `environment` key in the files.
        settings.environment = parsed;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_name() -> String {
        "boardgames".to_string()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            name: Self::default_name(),
        }
    }
}

/// Names of the collections the seeder owns.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "CollectionSettings::default_boardgames")]
    pub boardgames: String,
    #[serde(default = "CollectionSettings::default_rank_history")]
    pub rank_history: String,
}

impl CollectionSettings {
    fn default_boardgames() -> String {
        "boardgames".to_string()
    }

    fn default_rank_history() -> String {
        "rankhistory".to_string()
    }
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            boardgames: Self::default_boardgames(),
            rank_history: Self::default_rank_history(),
        }
    }
}

/// What to do when the seed user is already defined.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExistingUserPolicy {
    #[default]
    Skip,
    Update,
    Fail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserSettings {
    #[serde(default = "SeedUserSettings::default_name")]
    pub name: String,
    #[serde(default = "SeedUserSettings::default_password")]
    pub password: String,
    #[serde(default = "SeedUserSettings::default_role")]
    pub role: String,
    #[serde(default)]
    pub on_existing: ExistingUserPolicy,
}

impl SeedUserSettings {
    fn default_name() -> String {
        "api-user".to_string()
    }

    fn default_password() -> String {
        "test".to_string()
    }

    fn default_role() -> String {
        "readWrite".to_string()
    }

    /// User definition with the configured role scoped to `database`.
    pub fn user_spec(&self, database: &str) -> UserSpec {
        UserSpec {
            name: self.name.clone(),
            password: self.password.clone(),
            roles: vec![RoleGrant {
                role: self.role.clone(),
                db: database.to_string(),
            }],
        }
    }
}

impl Default for SeedUserSettings {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            password: Self::default_password(),
            role: Self::default_role(),
            on_existing: ExistingUserPolicy::default(),
        }
    }
}

/// Shape of the synthetic development dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSettings {
    #[serde(default = "GenerateSettings::default_games")]
    pub games: usize,
    #[serde(default = "GenerateSettings::default_history_days")]
    pub history_days: u32,
    #[serde(default = "GenerateSettings::default_first_bgg_id")]
    pub first_bgg_id: i32,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl GenerateSettings {
    fn default_games() -> usize {
        20
    }

    fn default_history_days() -> u32 {
        30
    }

    fn default_first_bgg_id() -> i32 {
        1000
    }
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            games: Self::default_games(),
            history_days: Self::default_history_days(),
            first_bgg_id: Self::default_first_bgg_id(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_targets_local_boardgames() {
        let settings = Settings::default();
        assert_eq!(settings.database.uri, "mongodb://localhost:27017");
        assert_eq!(settings.database.name, "boardgames");
        assert_eq!(settings.collections.rank_history, "rankhistory");
    }

    #[test]
    fn seed_user_role_is_scoped_to_database() {
        let settings = Settings::default();
        let user = settings.seed_user.user_spec(&settings.database.name);
        assert_eq!(user.name, "api-user");
        assert_eq!(user.password, "test");
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].role, "readWrite");
        assert_eq!(user.roles[0].db, "boardgames");
        assert_eq!(settings.seed_user.on_existing, ExistingUserPolicy::Skip);
    }

    #[test]
    fn base_file_is_layered_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            r#"
            [database]
            name = "boardgames_dev"

            [seed_user]
            on_existing = "update"

            [generate]
            games = 5
            rng_seed = 42
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(dir.path()).unwrap();
        assert_eq!(settings.database.name, "boardgames_dev");
        assert_eq!(settings.database.uri, "mongodb://localhost:27017");
        assert_eq!(settings.seed_user.on_existing, ExistingUserPolicy::Update);
        assert_eq!(settings.generate.games, 5);
        assert_eq!(settings.generate.history_days, 30);
        assert_eq!(settings.generate.rng_seed, Some(42));
    }

    #[test]
    fn missing_config_dir_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent")).unwrap();
        assert_eq!(settings.collections.boardgames, "boardgames");
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn env_values_keep_their_text() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("SABOGA_SEED_USER__PASSWORD", "0123");
        std::env::set_var("SABOGA_GENERATE__FIRST_BGG_ID", "0042");

        let loaded = Settings::load_from(dir.path());

        std::env::remove_var("SABOGA_SEED_USER__PASSWORD");
        std::env::remove_var("SABOGA_GENERATE__FIRST_BGG_ID");

        let settings = loaded.unwrap();
        assert_eq!(settings.seed_user.password, "0123");
        assert_eq!(settings.generate.first_bgg_id, 42);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(Environment::parse("qa").is_err());
        assert_eq!(Environment::parse("staging").unwrap(), Environment::Staging);
    }
}

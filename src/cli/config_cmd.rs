//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, ShareTarget};
use crate::domain::error::ConfigError;
use crate::domain::recording::{Container, Duration};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let value = normalize_config_value(key, value)?;

    let mut config = store.load().await?;
    *field_mut(&mut config, key) = Some(value.clone());
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(field(&config, key).unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, field(&config, key).unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn field<'a>(config: &'a AppConfig, key: &str) -> Option<&'a str> {
    match key {
        "recordings_dir" => config.recordings_dir.as_deref(),
        "container" => config.container.as_deref(),
        "share_target" => config.share_target.as_deref(),
        _ => config.duration.as_deref(),
    }
}

/// Config field for a key already checked by `check_key`
fn field_mut<'a>(config: &'a mut AppConfig, key: &str) -> &'a mut Option<String> {
    match key {
        "recordings_dir" => &mut config.recordings_dir,
        "container" => &mut config.container,
        "share_target" => &mut config.share_target,
        _ => &mut config.duration,
    }
}

/// Validate a config value and return its canonical form
fn normalize_config_value(key: &str, value: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "container" => value
            .parse::<Container>()
            .map(|c| c.to_string())
            .map_err(|e| invalid(e.to_string())),
        "share_target" => value
            .parse::<ShareTarget>()
            .map(|t| t.to_string())
            .map_err(|e| invalid(e.to_string())),
        "duration" => value
            .parse::<Duration>()
            .map(|d| d.to_string())
            .map_err(|e| invalid(e.to_string())),
        _ => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(invalid("Value must not be empty".to_string()))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    #[test]
    fn container_values() {
        assert_eq!(normalize_config_value("container", "FLAC").unwrap(), "flac");
        assert_eq!(normalize_config_value("container", "wave").unwrap(), "wav");
        assert!(normalize_config_value("container", "mp3").is_err());
    }

    #[test]
    fn share_target_values() {
        assert_eq!(normalize_config_value("share_target", "off").unwrap(), "none");
        assert!(normalize_config_value("share_target", "airdrop").is_err());
    }

    #[test]
    fn duration_values() {
        assert_eq!(normalize_config_value("duration", "90s").unwrap(), "1m30s");
        assert!(normalize_config_value("duration", "0s").is_err());
        assert!(normalize_config_value("duration", "forever").is_err());
    }

    #[test]
    fn recordings_dir_must_not_be_blank() {
        assert!(normalize_config_value("recordings_dir", "  ").is_err());
        assert_eq!(
            normalize_config_value("recordings_dir", " /data/memos ").unwrap(),
            "/data/memos"
        );
    }

    #[test]
    fn unknown_key() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[tokio::test]
    async fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "container", "flac").await.unwrap();
        handle_set(&store, &presenter, "duration", "45s").await.unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.container, Some("flac".to_string()));
        assert_eq!(config.duration, Some("45s".to_string()));
        assert!(config.share_target.is_none());
    }

    #[tokio::test]
    async fn invalid_set_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        assert!(handle_set(&store, &presenter, "container", "ogg").await.is_err());
        assert!(!store.exists());
    }
}

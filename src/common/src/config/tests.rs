#[cfg(test)]
mod tests {
    use crate::config::ConfigLoader;
    use crate::constants::{DEFAULT_WEBHOOK_URL, POLL_INTERVAL_SECS, WEBHOOK_URL_ENV_VAR};
    use rstest::rstest;
    use serial_test::serial;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    #[serial]
    fn test_load_config_with_unit_mapping() {
        std::env::remove_var(WEBHOOK_URL_ENV_VAR);
        let file = write_config(
            r#"{
                "setup": {
                    "project_wd": "/srv/app",
                    "project_name": "app",
                    "slack_webhook_url": "https://hooks.example/x"
                },
                "worker-a": "celery-worker-a.service"
            }"#,
        );

        let config = ConfigLoader::load_config_at(file.path()).unwrap();

        assert_eq!(config.project_wd, PathBuf::from("/srv/app"));
        assert_eq!(config.project_name, "app");
        assert_eq!(config.slack_webhook_url, "https://hooks.example/x");
        assert_eq!(
            config.unit_for_queue("worker-a"),
            Some("celery-worker-a.service")
        );
        assert_eq!(config.unit_for_queue("setup"), None);
        assert_eq!(config.units.len(), 1);
        assert_eq!(config.poll_interval_secs, POLL_INTERVAL_SECS);
        assert_eq!(config.python_bin, PathBuf::from("/srv/app/venv/bin/python3"));
        assert_eq!(config.celery_app(), "app.celery");
    }

    #[test]
    #[serial]
    fn test_webhook_defaults_to_placeholder() {
        std::env::remove_var(WEBHOOK_URL_ENV_VAR);
        let file = write_config(r#"{"setup": {"project_wd": "/srv/app", "project_name": "app"}}"#);

        let config = ConfigLoader::load_config_at(file.path()).unwrap();
        assert_eq!(config.slack_webhook_url, DEFAULT_WEBHOOK_URL);
        assert!(config.units.is_empty());
    }

    #[test]
    #[serial]
    fn test_webhook_env_override() {
        std::env::set_var(WEBHOOK_URL_ENV_VAR, "https://hooks.example/from-env");
        let file = write_config(
            r#"{"setup": {"project_wd": "/srv/app", "project_name": "app", "slack_webhook_url": "https://hooks.example/x"}}"#,
        );

        let config = ConfigLoader::load_config_at(file.path());
        std::env::remove_var(WEBHOOK_URL_ENV_VAR);

        assert_eq!(
            config.unwrap().slack_webhook_url,
            "https://hooks.example/from-env"
        );
    }

    #[test]
    fn test_tunables_are_read_from_setup() {
        let file = write_config(
            r#"{
                "setup": {
                    "project_wd": "/srv/app",
                    "project_name": "app",
                    "poll_interval_secs": 5,
                    "ping_timeout_secs": 3,
                    "worker_marker": "worker",
                    "python_bin": "/usr/bin/python3"
                }
            }"#,
        );

        let config = ConfigLoader::load_config_at(file.path()).unwrap();
        assert_eq!(config.poll_interval().as_secs(), 5);
        assert_eq!(config.ping_timeout().as_secs(), 3);
        assert_eq!(config.worker_marker, "worker");
        assert_eq!(config.python_bin, PathBuf::from("/usr/bin/python3"));
    }

    #[test]
    fn test_non_string_keys_are_ignored() {
        let file = write_config(
            r#"{
                "setup": {"project_wd": "/srv/app", "project_name": "app"},
                "worker-a": "celery-worker-a.service",
                "retries": 3,
                "nested": {"a": "b"}
            }"#,
        );

        let config = ConfigLoader::load_config_at(file.path()).unwrap();
        assert_eq!(config.units.len(), 1);
    }

    #[rstest]
    #[case::dotted("tasks.email", "celery-email.service")]
    #[case::uppercase("Worker-A", "celery-Worker-A.service")]
    #[case::hyphenated("worker-a", "celery-worker-a.service")]
    #[case::underscored("worker_b", "celery-worker-b.service")]
    #[case::nested_dots("app.tasks.email", "celery-app-email.service")]
    fn test_unit_mapping_keys_are_kept_verbatim(#[case] queue: &str, #[case] unit: &str) {
        let document = serde_json::json!({
            "setup": {"project_wd": "/srv/app", "project_name": "app"},
            queue: unit,
        });
        let file = write_config(&document.to_string());

        let config = ConfigLoader::load_config_at(file.path()).unwrap();
        assert_eq!(config.unit_for_queue(queue), Some(unit));
        assert_eq!(config.units.len(), 1);
    }

    #[test]
    fn test_dotted_and_plain_keys_load_together() {
        let file = write_config(
            r#"{
                "setup": {"project_wd": "/srv/app", "project_name": "app"},
                "Worker-A": "celery-Worker-A.service",
                "tasks.email": "celery-email.service"
            }"#,
        );

        let config = ConfigLoader::load_config_at(file.path()).unwrap();
        assert_eq!(
            config.unit_for_queue("Worker-A"),
            Some("celery-Worker-A.service")
        );
        assert_eq!(
            config.unit_for_queue("tasks.email"),
            Some("celery-email.service")
        );
        assert_eq!(config.unit_for_queue("tasks"), None);
    }

    #[test]
    fn test_missing_file_fails() {
        let result = ConfigLoader::load_config_at("non_existent_config.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_setup_fails() {
        let file = write_config(r#"{"worker-a": "celery-worker-a.service"}"#);
        let err = ConfigLoader::load_config_at(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("setup"));
    }

    #[test]
    fn test_missing_project_wd_fails() {
        let file = write_config(r#"{"setup": {"project_name": "app"}}"#);
        let err = ConfigLoader::load_config_at(file.path()).unwrap_err();
        assert!(err.to_string().contains("project_wd"));
    }

    #[test]
    fn test_missing_project_name_fails() {
        let file = write_config(r#"{"setup": {"project_wd": "/srv/app"}}"#);
        let err = ConfigLoader::load_config_at(file.path()).unwrap_err();
        assert!(err.to_string().contains("project_name"));
    }

    #[test]
    fn test_zero_poll_interval_fails() {
        let file = write_config(
            r#"{"setup": {"project_wd": "/srv/app", "project_name": "app", "poll_interval_secs": 0}}"#,
        );
        assert!(ConfigLoader::load_config_at(file.path()).is_err());
    }

    #[rstest]
    #[case::ping("ping_timeout_secs")]
    #[case::command("command_timeout_secs")]
    #[case::webhook("webhook_timeout_secs")]
    fn test_zero_timeout_fails(#[case] key: &str) {
        let mut document = serde_json::json!({
            "setup": {"project_wd": "/srv/app", "project_name": "app"}
        });
        document["setup"][key] = serde_json::json!(0);
        let file = write_config(&document.to_string());

        let err = ConfigLoader::load_config_at(file.path()).unwrap_err();
        assert!(err.to_string().contains(key));
    }

    #[test]
    fn test_malformed_json_fails() {
        let file = write_config(r#"{"setup": "#);
        assert!(ConfigLoader::load_config_at(file.path()).is_err());
    }

    #[test]
    #[serial]
    fn test_resolve_path_prefers_argument() {
        std::env::set_var(crate::constants::CONFIG_PATH_ENV_VAR, "/etc/gaia/env.json");
        assert_eq!(
            ConfigLoader::resolve_path(Some("/tmp/arg.json")),
            PathBuf::from("/tmp/arg.json")
        );
        assert_eq!(
            ConfigLoader::resolve_path(None),
            PathBuf::from("/etc/gaia/env.json")
        );
        std::env::remove_var(crate::constants::CONFIG_PATH_ENV_VAR);
        assert_eq!(
            ConfigLoader::resolve_path(None),
            PathBuf::from(crate::constants::DEFAULT_CONFIG_FILE)
        );
    }
}

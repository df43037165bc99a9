use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use serde::de::DeserializeOwned;

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Layered configuration: embedded defaults, user, project, then env
pub struct SrcvetoConfig {
    figment: Figment,
}

impl SrcvetoConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces both the user and project layers
        if let Some(custom_path) = custom_config {
            tracing::debug!("Loading custom config from {}", custom_path);
            figment = match custom_path.rsplit('.').next() {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                .merge(Yaml::file(user.replace(".toml", ".yml")))
                .merge(Toml::file("srcveto.toml"))
                .merge(Json::file("srcveto.json"))
                .merge(Yaml::file("srcveto.yaml"))
                .merge(Yaml::file("srcveto.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("SRCVETO_").split("__"));

        Ok(SrcvetoConfig { figment })
    }

    /// Typed view of the merged configuration
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .context("Failed to read srcveto configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Extract a nested section, e.g. `"discovery.extensions"`
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.figment
            .extract_inner(path)
            .with_context(|| format!("Failed to read config key '{path}'"))
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/srcveto/config.toml"),
            Err(_) => "~/.config/srcveto/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExcludeReason;
    use figment::Jail;

    /// Keep a developer's ~/.config/srcveto out of the merged layers
    fn isolate_home(jail: &mut Jail) {
        let home = jail.directory().display().to_string();
        jail.set_env("HOME", home);
    }

    #[test]
    fn test_config_loads_defaults() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            let config = SrcvetoConfig::load().expect("Should load default config");
            let settings = config.settings().expect("defaults are valid");

            assert!(settings.filter.use_default_rules);
            assert!(settings.filter.rules.is_empty());
            assert_eq!(settings.pipeline.scope, "*");
            assert!(settings.discovery.extensions.iter().any(|e| e == "S"));
            assert!(!settings.discovery.follow_symlinks);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_adds_rules() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            jail.create_file(
                "srcveto.toml",
                r#"
                [[filter.rules]]
                name = "riscv-vector"
                marker = "rvv"
                reason = "arch_specific_vector_optimization"
                "#,
            )?;

            let settings = SrcvetoConfig::load().unwrap().settings().unwrap();
            assert!(settings.filter.use_default_rules);
            assert_eq!(settings.filter.rules.len(), 1);
            assert_eq!(
                settings.filter.rules[0].reason,
                ExcludeReason::ArchSpecificVectorOptimization
            );
            Ok(())
        });
    }

    #[test]
    fn test_user_config_read_from_home() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            let user_dir = jail.directory().join(".config/srcveto");
            std::fs::create_dir_all(&user_dir).unwrap();
            std::fs::write(
                user_dir.join("config.toml"),
                "[discovery]\nextensions = [\"c\", \"S\"]\n",
            )
            .unwrap();

            let settings = SrcvetoConfig::load().unwrap().settings().unwrap();
            assert_eq!(settings.discovery.extensions, vec!["c".to_string(), "S".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            jail.set_env("SRCVETO_FILTER__USE_DEFAULT_RULES", "false");
            jail.set_env("SRCVETO_PIPELINE__SCOPE", "**/lvgl/**");

            let config = SrcvetoConfig::load().unwrap();
            let settings = config.settings().unwrap();
            assert!(!settings.filter.use_default_rules);
            assert_eq!(settings.pipeline.scope, "**/lvgl/**");
            assert_eq!(config.get::<bool>("filter.use_default_rules").unwrap(), false);
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_yaml() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            jail.create_file(
                "esp32.yaml",
                "discovery:\n  extensions: [\"c\"]\n  follow_symlinks: true\n",
            )?;

            let settings = SrcvetoConfig::load_with_custom_config(Some("esp32.yaml"))
                .unwrap()
                .settings()
                .unwrap();
            assert_eq!(settings.discovery.extensions, vec!["c".to_string()]);
            assert!(settings.discovery.follow_symlinks);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_rule_fails_validation() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            jail.create_file(
                "srcveto.toml",
                r#"
                [[filter.rules]]
                name = "everything"
                marker = ""
                reason = "arch_specific_backend"
                "#,
            )?;

            assert!(SrcvetoConfig::load().unwrap().settings().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config_falls_back_to_defaults() {
        Jail::expect_with(|jail| {
            isolate_home(jail);
            let config = SrcvetoConfig::load_with_custom_config(Some("non_existent.toml"));
            assert!(config.is_ok(), "Should handle missing custom config gracefully");
            assert!(config.unwrap().settings().is_ok());
            Ok(())
        });
    }
}

// Integration tests for Profile module
// This file should be run with cargo test --test test_profile

#[path = "../src/profile/mod.rs"]
mod profile;

use profile::{LanguageEntry, ProfileError, Registry, SnippetsConfig, TimeoutSpec};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    });
}

fn shipped_registry() -> Registry {
    let config = SnippetsConfig::from_toml_str(include_str!("../snippets.toml"))
        .expect("shipped config should parse");
    Registry::new(config)
}

fn entry(
    timeout: Option<TimeoutSpec>,
    memory: Option<u64>,
    crop: Option<usize>,
) -> LanguageEntry {
    LanguageEntry {
        command: Some("python".to_string()),
        image: Some("bosta/python:latest".to_string()),
        timeout,
        memory,
        crop,
    }
}

fn registry_with(tag: &str, language: LanguageEntry) -> Registry {
    let mut config = SnippetsConfig {
        timeout: TimeoutSpec::Seconds(4),
        memory: 8,
        crop: 512,
        ..Default::default()
    };
    config.languages.insert(tag.to_string(), language);
    Registry::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every registered language resolves with a runner and an image
    #[test]
    fn test_all_shipped_languages_resolve() {
        init_tracing();

        let registry = shipped_registry();
        let tags = registry.supported();
        assert_eq!(
            tags,
            vec!["haskell", "javascript", "perl", "php", "python", "ruby", "scala"]
        );

        for tag in tags {
            let profile = registry.resolve(tag).expect("registered language should resolve");
            assert_eq!(profile.tag, tag);
            assert!(!profile.command.is_empty());
            assert!(!profile.image.is_empty());
            assert!(profile.memory_mb > 0);
            assert!(profile.crop_chars > 0);
        }
    }

    /// Absent tags are reported as not supported
    #[test]
    fn test_unknown_language_not_supported() {
        init_tracing();

        let registry = shipped_registry();
        assert!(!registry.is_supported("cobol"));
        assert!(matches!(
            registry.resolve("cobol"),
            Err(ProfileError::NotSupported(tag)) if tag == "cobol"
        ));
        // Lookup is exact
        assert!(registry.resolve("Python").is_err());
    }

    /// Per-language values win; missing ones come from the defaults
    #[test]
    fn test_override_combinations() {
        init_tracing();

        for timeout in [None, Some(TimeoutSpec::Seconds(9))] {
            for memory in [None, Some(32)] {
                for crop in [None, Some(100)] {
                    let registry = registry_with("python", entry(timeout.clone(), memory, crop));
                    let profile = registry.resolve("python").unwrap();

                    assert_eq!(
                        profile.timeout,
                        timeout.clone().unwrap_or(TimeoutSpec::Seconds(4))
                    );
                    assert_eq!(profile.memory_mb, memory.unwrap_or(8));
                    assert_eq!(profile.crop_chars, crop.unwrap_or(512));
                }
            }
        }
    }

    /// Zero and blank overrides are treated as unset
    #[test]
    fn test_falsy_overrides_fall_back() {
        init_tracing();

        let registry = registry_with(
            "python",
            entry(Some(TimeoutSpec::Args("  ".into())), Some(0), Some(0)),
        );
        let profile = registry.resolve("python").unwrap();
        assert_eq!(profile.timeout, TimeoutSpec::Seconds(4));
        assert_eq!(profile.memory_mb, 8);
        assert_eq!(profile.crop_chars, 512);
    }

    /// command and image have no default
    #[test]
    fn test_missing_command_or_image_fails() {
        init_tracing();

        let mut language = entry(None, None, None);
        language.command = None;
        let registry = registry_with("python", language);
        assert!(matches!(
            registry.resolve("python"),
            Err(ProfileError::Incomplete { field: "command", .. })
        ));

        let mut language = entry(None, None, None);
        language.image = Some(String::new());
        let registry = registry_with("python", language);
        assert!(matches!(
            registry.resolve("python"),
            Err(ProfileError::Incomplete { field: "image", .. })
        ));
    }

    /// Integer and multi-token timeout specs both parse from TOML
    #[test]
    fn test_timeout_spec_forms() {
        init_tracing();

        let config = SnippetsConfig::from_toml_str(
            r#"
            timeout = "-s KILL 6"

            [languages.python]
            command = "python"
            image = "bosta/python:latest"

            [languages.ruby]
            command = "ruby"
            image = "bosta/ruby:latest"
            timeout = 3
            "#,
        )
        .unwrap();
        let registry = Registry::new(config);

        let python = registry.resolve("python").unwrap();
        assert_eq!(python.timeout.args(), vec!["-s", "KILL", "6"]);
        assert_eq!(python.timeout.bound_secs(), Some(6));

        let ruby = registry.resolve("ruby").unwrap();
        assert_eq!(ruby.timeout.args(), vec!["3"]);
        assert_eq!(ruby.timeout.bound_secs(), Some(3));

        assert_eq!(TimeoutSpec::Args("--foreground 2s".into()).bound_secs(), None);
    }

    /// Defaults apply when the TOML omits global settings
    #[test]
    fn test_global_defaults() {
        init_tracing();

        let config = SnippetsConfig::from_toml_str("").unwrap();
        assert_eq!(config.timeout, TimeoutSpec::Seconds(4));
        assert_eq!(config.memory, 8);
        assert_eq!(config.crop, 512);
        assert_eq!(config.marker_reaction, "repeat");
        assert!(!config.retain_staged);
        assert_eq!(config.output_limit_bytes, 65536);
        assert!(config.prefetch_images);
        assert!(config.languages.is_empty());
    }

    /// Missing config file falls back to the shipped registry
    #[test]
    fn test_load_missing_file_uses_builtin() {
        init_tracing();

        let config =
            SnippetsConfig::load(std::path::Path::new("/nonexistent/snipbot/snippets.toml"))
                .unwrap();
        assert!(config.languages.contains_key("python"));
        assert_eq!(config.languages["scala"].memory, Some(64));
    }

    /// Broken TOML is an error, not a silent fallback
    #[test]
    fn test_load_invalid_file_fails() {
        init_tracing();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippets.toml");
        std::fs::write(&path, "languages = [").unwrap();

        assert!(matches!(
            SnippetsConfig::load(&path),
            Err(ProfileError::TomlParse(_))
        ));
    }

    /// Image list is distinct, sorted and skips languages that cannot resolve
    #[test]
    fn test_images_for_prefetch() {
        init_tracing();

        let images = shipped_registry().images();
        assert_eq!(
            images,
            vec![
                "bosta/javascript:latest",
                "bosta/php:latest",
                "bosta/python:latest",
                "bosta/ruby:latest",
                "mchakravarty/ghc-7.10.2:latest",
                "python:latest",
                "williamyeh/scala:latest",
            ]
        );

        let with_image = |image: Option<&str>| LanguageEntry {
            command: Some("run".to_string()),
            image: image.map(str::to_string),
            ..Default::default()
        };
        let mut config = SnippetsConfig::default();
        config.languages.insert("python".into(), with_image(Some("img:1")));
        config.languages.insert("python3".into(), with_image(Some("img:1")));
        config.languages.insert("broken".into(), with_image(None));
        assert_eq!(Registry::new(config).images(), vec!["img:1"]);
    }

    /// Diagnostic text lists timeout, memory and crop
    #[test]
    fn test_describe() {
        init_tracing();

        let registry = shipped_registry();
        assert_eq!(
            registry.describe("haskell"),
            "haskell:\n    Timeout  : 8 seconds\n    Memory   : 16MB\n    Crops at : 512 characters"
        );
        assert_eq!(registry.describe("cobol"), "cobol is not supported");
    }
}

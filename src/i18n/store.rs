//! Resource store: the single source of truth for loaded languages.
//!
//! Built once at startup from `<path>/<lang>.json` files and never mutated
//! afterwards, so it can be shared across requests without locking.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::bundle::{fill_gaps, LanguageOption, ResourceBundle, ResourceFile};
use super::coverage::CoverageReport;
use crate::config::I18nOptions;
use crate::error::I18nError;

/// Immutable map from language abbreviation to its resource bundle.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    bundles: HashMap<String, Arc<ResourceBundle>>,

    /// Usable abbreviations, default language first
    languages: Vec<String>,

    default_lang: String,
    default_bundle: Arc<ResourceBundle>,
    coverage: Vec<CoverageReport>,
}

impl ResourceStore {
    /// Load the default language and every configured (or discovered)
    /// language from `options.path`.
    ///
    /// Each non-default language has its gaps filled from the default
    /// language's strings; its own values always win.
    ///
    /// # Errors
    /// Any missing, unreadable or malformed file is an error. There is no
    /// partial mode: the store is either complete or not built at all.
    pub fn load(options: &I18nOptions) -> Result<Self, I18nError> {
        let dir = canonical_dir(&options.path)?;

        let requested = match &options.languages {
            Some(languages) => languages.clone(),
            None => discover_languages(&dir)?,
        };

        let default_lang = options.default_lang.clone();
        let default_file = read_resource_file(&dir, &default_lang)?;
        let default_bundle = Arc::new(ResourceBundle {
            lang: default_lang.clone(),
            language: default_file
                .language
                .unwrap_or_else(|| default_lang.clone()),
            strings: default_file.strings,
        });

        let mut bundles = HashMap::new();
        bundles.insert(default_lang.clone(), Arc::clone(&default_bundle));
        let mut languages = vec![default_lang.clone()];
        let mut coverage = Vec::new();

        for lang in requested {
            if bundles.contains_key(&lang) {
                debug!("Skipping duplicate language '{}'", lang);
                continue;
            }

            let file = read_resource_file(&dir, &lang)?;

            let report = CoverageReport::compare(&lang, &default_bundle.strings, &file.strings);
            if !report.inherited.is_empty() {
                warn!(
                    "Language '{}' is missing {} strings, filled from '{}'",
                    lang,
                    report.inherited.len(),
                    default_lang
                );
            }

            let bundle = ResourceBundle {
                lang: lang.clone(),
                language: file.language.unwrap_or_else(|| lang.clone()),
                strings: fill_gaps(&default_bundle.strings, file.strings),
            };

            bundles.insert(lang.clone(), Arc::new(bundle));
            languages.push(lang);
            coverage.push(report);
        }

        info!(
            "Loaded {} languages from {} (default '{}')",
            languages.len(),
            dir.display(),
            default_lang
        );

        Ok(Self {
            bundles,
            languages,
            default_lang,
            default_bundle,
            coverage,
        })
    }

    /// Get a bundle by its exact abbreviation.
    pub fn get(&self, lang: &str) -> Option<&Arc<ResourceBundle>> {
        self.bundles.get(lang)
    }

    /// Get a bundle, falling back to the default bundle for unknown codes.
    pub fn get_or_default(&self, lang: &str) -> &Arc<ResourceBundle> {
        self.get(lang).unwrap_or(&self.default_bundle)
    }

    /// Check if a language is loaded.
    pub fn contains(&self, lang: &str) -> bool {
        self.bundles.contains_key(lang)
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn default_bundle(&self) -> &Arc<ResourceBundle> {
        &self.default_bundle
    }

    /// Usable abbreviations for content negotiation, default first.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// `{name, value}` entries for every loaded language, in load order.
    pub fn language_options(&self) -> Vec<LanguageOption> {
        self.languages
            .iter()
            .filter_map(|lang| self.bundles.get(lang))
            .map(|bundle| LanguageOption {
                name: bundle.language.clone(),
                value: bundle.lang.clone(),
            })
            .collect()
    }

    /// Key coverage of each non-default language, computed at load time.
    pub fn coverage(&self) -> &[CoverageReport] {
        &self.coverage
    }

    /// Number of loaded languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf, I18nError> {
    let dir = path
        .canonicalize()
        .map_err(|e| I18nError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !dir.is_dir() {
        return Err(I18nError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(dir)
}

/// Every `*.json` file in `dir`, by file stem, sorted for a stable load order.
fn discover_languages(dir: &Path) -> Result<Vec<String>, I18nError> {
    let entries = std::fs::read_dir(dir).map_err(|source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut languages = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| I18nError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            languages.push(stem.to_string());
        }
    }

    languages.sort();
    Ok(languages)
}

fn validate_code(lang: &str) -> Result<(), I18nError> {
    let invalid = lang.is_empty()
        || lang.contains(['/', '\\', '\0'])
        || lang.contains("..");
    if invalid {
        return Err(I18nError::InvalidLanguageCode(lang.to_string()));
    }
    Ok(())
}

/// Read and parse `<dir>/<lang>.json`, refusing files that resolve outside
/// of `dir` (e.g. through a symlink).
fn read_resource_file(dir: &Path, lang: &str) -> Result<ResourceFile, I18nError> {
    validate_code(lang)?;

    let path = dir.join(format!("{}.json", lang));
    let resolved = path.canonicalize().map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            I18nError::MissingFile {
                lang: lang.to_string(),
                path: path.clone(),
            }
        } else {
            I18nError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;

    if !resolved.starts_with(dir) {
        return Err(I18nError::OutsideDirectory {
            path: resolved,
            dir: dir.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(&resolved).map_err(|source| I18nError::Io {
        path: resolved.clone(),
        source,
    })?;

    let value: Value = serde_json::from_str(&raw).map_err(|source| I18nError::Parse {
        path: resolved.clone(),
        source,
    })?;

    if !value.is_object() {
        return Err(I18nError::NotAnObject {
            path: resolved,
            what: "file",
        });
    }
    if value.get("strings").is_some_and(|s| !s.is_object()) {
        return Err(I18nError::NotAnObject {
            path: resolved,
            what: "strings",
        });
    }

    let file: ResourceFile =
        serde_json::from_value(value).map_err(|source| I18nError::Parse {
            path: resolved.clone(),
            source,
        })?;

    if let Some(declared) = file.lang.as_deref().filter(|declared| *declared != lang) {
        warn!(
            "{} declares lang '{}', serving it as '{}'",
            resolved.display(),
            declared,
            lang
        );
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_lang(dir: &TempDir, lang: &str, value: Value) {
        std::fs::write(
            dir.path().join(format!("{}.json", lang)),
            serde_json::to_string(&value).expect("serialize"),
        )
        .expect("Failed to write language file");
    }

    /// An empty `languages` slice means discovery.
    fn options(dir: &TempDir, languages: &[&str]) -> I18nOptions {
        I18nOptions {
            path: dir.path().to_path_buf(),
            languages: if languages.is_empty() {
                None
            } else {
                Some(languages.iter().map(|s| s.to_string()).collect())
            },
            ..I18nOptions::default()
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write_lang(
            &dir,
            "en",
            json!({"lang": "en", "language": "English", "strings": {"greeting": "Hello", "farewell": "Goodbye"}}),
        );
        write_lang(
            &dir,
            "es",
            json!({"lang": "es", "language": "Español", "strings": {"greeting": "Hola"}}),
        );
        dir
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_load_discovers_languages() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        assert_eq!(store.languages(), &["en".to_string(), "es".to_string()]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.default_lang(), "en");
    }

    #[test]
    fn test_discovery_ignores_other_files() {
        let dir = fixture();
        std::fs::write(dir.path().join("README.md"), "notes").expect("write");
        std::fs::create_dir(dir.path().join("nested.json")).expect("mkdir");

        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_fills_gaps_from_default() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        let es = store.get("es").expect("es loaded");
        assert_eq!(es.get("greeting"), Some("Hola"));
        assert_eq!(es.get("farewell"), Some("Goodbye"));
    }

    #[test]
    fn test_every_bundle_covers_default_keys() {
        let dir = fixture();
        write_lang(&dir, "fr", json!({"language": "Français", "strings": {"extra": "x"}}));
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        let default_keys: Vec<_> = store.default_bundle().strings.keys().collect();
        for lang in store.languages() {
            let bundle = store.get(lang).expect("loaded");
            for key in &default_keys {
                assert!(bundle.strings.contains_key(*key), "{} lacks {}", lang, key);
            }
        }
    }

    #[test]
    fn test_default_is_first_and_duplicates_skipped() {
        let dir = fixture();
        let store =
            ResourceStore::load(&options(&dir, &["es", "en", "es"])).expect("Should load");
        assert_eq!(store.languages(), &["en".to_string(), "es".to_string()]);
    }

    #[test]
    fn test_configured_languages_limit_loading() {
        let dir = fixture();
        write_lang(&dir, "fr", json!({"strings": {}}));

        let store = ResourceStore::load(&options(&dir, &["es"])).expect("Should load");
        assert!(!store.contains("fr"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_missing_metadata_defaults_to_abbreviation() {
        let dir = fixture();
        write_lang(&dir, "de", json!({}));

        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");
        let de = store.get("de").expect("de loaded");
        assert_eq!(de.lang, "de");
        assert_eq!(de.language, "de");
        assert_eq!(de.get("greeting"), Some("Hello"));
    }

    #[test]
    fn test_language_options_in_load_order() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        let options = store.language_options();
        assert_eq!(
            options,
            vec![
                LanguageOption {
                    name: "English".to_string(),
                    value: "en".to_string()
                },
                LanguageOption {
                    name: "Español".to_string(),
                    value: "es".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_coverage_reports_inherited_keys() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        let coverage = store.coverage();
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0].lang, "es");
        assert_eq!(coverage[0].inherited, vec!["farewell".to_string()]);
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_or_default_for_unknown_code() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");

        let bundle = store.get_or_default("zz");
        assert!(Arc::ptr_eq(bundle, store.default_bundle()));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let dir = fixture();
        let store = ResourceStore::load(&options(&dir, &[])).expect("Should load");
        assert!(store.get("ES").is_none());
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_missing_directory() {
        let dir = fixture();
        let mut opts = options(&dir, &[]);
        opts.path = dir.path().join("does-not-exist");

        let result = ResourceStore::load(&opts);
        assert!(matches!(result, Err(I18nError::InvalidDirectory { .. })));
    }

    #[test]
    fn test_path_is_a_file() {
        let dir = fixture();
        let mut opts = options(&dir, &[]);
        opts.path = dir.path().join("en.json");

        let result = ResourceStore::load(&opts);
        assert!(matches!(result, Err(I18nError::InvalidDirectory { .. })));
    }

    #[test]
    fn test_missing_declared_language() {
        let dir = fixture();
        let result = ResourceStore::load(&options(&dir, &["fr"]));
        assert!(matches!(result, Err(I18nError::MissingFile { ref lang, .. }) if lang == "fr"));
    }

    #[test]
    fn test_missing_default_language() {
        let dir = fixture();
        let mut opts = options(&dir, &[]);
        opts.default_lang = "pt".to_string();

        let result = ResourceStore::load(&opts);
        assert!(matches!(result, Err(I18nError::MissingFile { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let dir = fixture();
        std::fs::write(dir.path().join("fr.json"), "{ not json").expect("write");

        let result = ResourceStore::load(&options(&dir, &[]));
        assert!(matches!(result, Err(I18nError::Parse { .. })));
    }

    #[test]
    fn test_file_must_be_an_object() {
        let dir = fixture();
        write_lang(&dir, "fr", json!(["not", "an", "object"]));

        let result = ResourceStore::load(&options(&dir, &[]));
        assert!(matches!(result, Err(I18nError::NotAnObject { what: "file", .. })));
    }

    #[test]
    fn test_strings_must_be_an_object() {
        let dir = fixture();
        write_lang(&dir, "fr", json!({"strings": "nope"}));

        let result = ResourceStore::load(&options(&dir, &[]));
        assert!(matches!(result, Err(I18nError::NotAnObject { what: "strings", .. })));
    }

    #[test]
    fn test_path_traversal_code_rejected() {
        let dir = fixture();
        let result = ResourceStore::load(&options(&dir, &["../secrets"]));
        assert!(matches!(result, Err(I18nError::InvalidLanguageCode(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_directory_rejected() {
        let dir = fixture();
        let outside = TempDir::new().expect("Failed to create temp dir");
        let target = outside.path().join("fr.json");
        std::fs::write(&target, r#"{"strings": {}}"#).expect("write");
        std::os::unix::fs::symlink(&target, dir.path().join("fr.json")).expect("symlink");

        let result = ResourceStore::load(&options(&dir, &["fr"]));
        assert!(matches!(result, Err(I18nError::OutsideDirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_directory_allowed() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("es.json"), dir.path().join("mx.json"))
            .expect("symlink");

        let store = ResourceStore::load(&options(&dir, &["mx"])).expect("Should load");
        let mx = store.get("mx").expect("mx loaded");
        assert_eq!(mx.lang, "mx");
        assert_eq!(mx.get("greeting"), Some("Hola"));
    }
}

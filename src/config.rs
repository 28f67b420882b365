use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::RewriteError;
use crate::search::MethodMatcher;
use crate::typeck::Classpath;

pub const DEFAULT_LEGACY_EXCEPTION: &str = "java.io.IOException";
pub const DEFAULT_REPLACEMENT_EXCEPTION: &str = "tools.jackson.core.JacksonException";
pub const DEFAULT_API_PATTERNS: [&str; 3] = [
    "com.fasterxml.jackson.databind.ObjectMapper *(..)",
    "com.fasterxml.jackson.databind.ObjectReader *(..)",
    "com.fasterxml.jackson.databind.ObjectWriter *(..)",
];

/// Rewriter configuration, usually read from `jrewrite.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub catch_migration: CatchMigrationConfig,
    pub classpath: ClasspathConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CatchMigrationConfig {
    pub legacy_exception: String,
    pub replacement_exception: String,
    pub api_patterns: Vec<String>,
    /// Whether calls resolved to a subtype's override count as the API when
    /// telling API calls apart from other legacy sources. Finding the API in
    /// the first place always requires the pattern's own declaring type.
    pub match_overrides: bool,
    /// Labels reported alongside the recipe name.
    pub tags: Vec<String>,
}

impl Default for CatchMigrationConfig {
    fn default() -> Self {
        Self {
            legacy_exception: DEFAULT_LEGACY_EXCEPTION.to_string(),
            replacement_exception: DEFAULT_REPLACEMENT_EXCEPTION.to_string(),
            api_patterns: DEFAULT_API_PATTERNS.iter().map(|p| p.to_string()).collect(),
            match_overrides: true,
            tags: vec!["jackson-3".to_string()],
        }
    }
}

impl CatchMigrationConfig {
    /// Compile the configured API patterns, honouring `match-overrides`.
    pub fn matchers(&self) -> Result<Vec<MethodMatcher>, RewriteError> {
        self.compile(self.match_overrides)
    }

    /// The API patterns matched against the declaring type only.
    pub fn exact_matchers(&self) -> Result<Vec<MethodMatcher>, RewriteError> {
        self.compile(false)
    }

    fn compile(&self, match_overrides: bool) -> Result<Vec<MethodMatcher>, RewriteError> {
        self.api_patterns.iter().map(|p| MethodMatcher::parse(p, match_overrides)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClasspathConfig {
    /// Extra Java stub files declaring library types. Relative paths are
    /// resolved against the directory of the config file.
    pub stubs: Vec<PathBuf>,
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, RewriteError> {
        let config: Config = toml::from_str(text).map_err(|e| RewriteError::config(e.to_string(), path))?;
        config.validate(path)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, RewriteError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RewriteError::config(format!("cannot read config: {e}"), path))?;
        let mut config = Self::from_toml_str(&text, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for stub in &mut config.classpath.stubs {
            if stub.is_relative() {
                *stub = base.join(&*stub);
            }
        }
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), RewriteError> {
        let rule = &self.catch_migration;
        for (key, value) in [
            ("legacy-exception", &rule.legacy_exception),
            ("replacement-exception", &rule.replacement_exception),
        ] {
            if value.is_empty() || value.split('.').any(|seg| seg.is_empty()) {
                return Err(RewriteError::config(format!("{key} must be a fully qualified class name, got '{value}'"), path));
            }
        }
        if rule.legacy_exception == rule.replacement_exception {
            return Err(RewriteError::config("legacy-exception and replacement-exception must differ", path));
        }
        if rule.api_patterns.is_empty() {
            return Err(RewriteError::config("api-patterns must not be empty", path));
        }
        rule.matchers()?;
        Ok(())
    }

    /// The built-in classpath extended with the configured stub files.
    pub fn classpath(&self) -> Result<Classpath, RewriteError> {
        let mut classpath = Classpath::standard().clone();
        if self.classpath.stubs.is_empty() {
            return Ok(classpath);
        }
        let mut sources = Vec::with_capacity(self.classpath.stubs.len());
        for stub in &self.classpath.stubs {
            let text = std::fs::read_to_string(stub)
                .map_err(|e| RewriteError::config(format!("cannot read stub: {e}"), stub))?;
            sources.push(text);
        }
        let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
        classpath.add_sources(&refs)?;
        Ok(classpath)
    }
}

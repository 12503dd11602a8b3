//! Writing generated modules to disk.

use crate::error::CodegenError;
use crate::generator::{GeneratedModule, MODULE_EXTENSION};
use crate::lua::MODULE_HEADER;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when all namespaces go into one module.
pub const SINGLE_FILE_STEM: &str = "rmc_protocols";

/// How modules are laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One file per namespace.
    #[default]
    PerNamespace,
    /// Every namespace in one file.
    SingleFile,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Target directory; created if missing.
    pub dir: PathBuf,
    /// File layout.
    pub mode: OutputMode,
}

impl OutputConfig {
    /// Creates a per-namespace configuration for a directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mode: OutputMode::PerNamespace,
        }
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Joins modules into one source with a single header.
#[must_use]
pub fn render_single_file(modules: &[GeneratedModule]) -> String {
    let mut source = format!("\n{MODULE_HEADER}\n");
    for module in modules {
        source.push_str(&format!("\n-- namespace {}\n", module.namespace));
        source.push_str(&module.body);
    }
    source
}

/// Returns the files `write_modules` would produce, with their contents.
#[must_use]
pub fn plan_files(config: &OutputConfig, modules: &[GeneratedModule]) -> Vec<(PathBuf, String)> {
    match config.mode {
        OutputMode::PerNamespace => modules
            .iter()
            .map(|m| (config.dir.join(m.file_name()), m.source()))
            .collect(),
        OutputMode::SingleFile => vec![(
            config
                .dir
                .join(format!("{SINGLE_FILE_STEM}.{MODULE_EXTENSION}")),
            render_single_file(modules),
        )],
    }
}

/// Writes modules to disk, returning the written paths.
///
/// # Errors
/// Returns [`CodegenError::Write`] if the directory or a file cannot be
/// written.
pub fn write_modules(
    config: &OutputConfig,
    modules: &[GeneratedModule],
) -> Result<Vec<PathBuf>, CodegenError> {
    ensure_dir(&config.dir)?;

    let mut written = Vec::new();
    for (path, source) in plan_files(config, modules) {
        std::fs::write(&path, source).map_err(|source| CodegenError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote dissector module");
        written.push(path);
    }
    Ok(written)
}

fn ensure_dir(dir: &Path) -> Result<(), CodegenError> {
    std::fs::create_dir_all(dir).map_err(|source| CodegenError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(namespace: &str, body: &str) -> GeneratedModule {
        GeneratedModule {
            namespace: namespace.to_string(),
            body: body.to_string(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_write_per_namespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("plugins").join("quazal");
        let config = OutputConfig::new(&target);
        let modules = [module("Auth", "-- auth\n"), module("Match", "-- match\n")];

        let written = write_modules(&config, &modules).expect("write");
        assert_eq!(
            written,
            vec![target.join("Auth.lua.noload"), target.join("Match.lua.noload")]
        );
        let auth = std::fs::read_to_string(&written[0]).expect("read");
        assert_eq!(auth, modules[0].source());
        assert!(auth.contains("-- auth"));
    }

    #[test]
    fn test_write_single_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = OutputConfig::new(dir.path()).with_mode(OutputMode::SingleFile);
        let modules = [module("Auth", "-- auth\n"), module("Match", "-- match\n")];

        let written = write_modules(&config, &modules).expect("write");
        assert_eq!(written, vec![dir.path().join("rmc_protocols.lua.noload")]);
        let text = std::fs::read_to_string(&written[0]).expect("read");
        assert_eq!(text.matches(MODULE_HEADER).count(), 1);
        let auth_at = text.find("-- auth").expect("auth");
        let match_at = text.find("-- match").expect("match");
        assert!(auth_at < match_at);
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").expect("write");
        let config = OutputConfig::new(&file);
        assert!(matches!(
            write_modules(&config, &[module("A", "")]),
            Err(CodegenError::Write { .. })
        ));
    }
}

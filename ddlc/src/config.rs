//! Default output directory.
//!
//! Generated modules go to the Wireshark personal plugin directory, under
//! `quazal/` where the RMC dissector loads them from.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the output directory.
pub const OUT_DIR_ENV: &str = "DDLC_OUT_DIR";

/// Subdirectory of the plugin directory holding generated modules.
const PLUGIN_SUBDIR: &str = "quazal";

/// Environment values the default directory depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutDirEnv {
    /// `DDLC_OUT_DIR`.
    pub out_dir: Option<OsString>,
    /// `APPDATA` (Windows).
    pub appdata: Option<OsString>,
    /// `HOME`.
    pub home: Option<OsString>,
    /// Running on Windows.
    pub windows: bool,
}

impl OutDirEnv {
    /// Captures the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            out_dir: std::env::var_os(OUT_DIR_ENV),
            appdata: std::env::var_os("APPDATA"),
            home: std::env::var_os("HOME"),
            windows: cfg!(windows),
        }
    }

    /// Picks the output directory, if one can be derived.
    #[must_use]
    pub fn resolve(&self) -> Option<PathBuf> {
        let non_empty = |v: &Option<OsString>| v.clone().filter(|s| !s.is_empty());

        if let Some(dir) = non_empty(&self.out_dir) {
            return Some(PathBuf::from(dir));
        }
        if self.windows {
            return non_empty(&self.appdata).map(|appdata| {
                PathBuf::from(appdata)
                    .join("Wireshark")
                    .join("plugins")
                    .join(PLUGIN_SUBDIR)
            });
        }
        non_empty(&self.home).map(|home| {
            PathBuf::from(home)
                .join(".local")
                .join("lib")
                .join("wireshark")
                .join("plugins")
                .join(PLUGIN_SUBDIR)
        })
    }
}

/// Returns the default output directory for this process.
#[must_use]
pub fn default_out_dir() -> Option<PathBuf> {
    OutDirEnv::from_process().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let env = OutDirEnv {
            out_dir: Some("/tmp/out".into()),
            home: Some("/home/u".into()),
            ..OutDirEnv::default()
        };
        assert_eq!(env.resolve(), Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_unix_plugin_dir() {
        let env = OutDirEnv {
            out_dir: Some(OsString::new()),
            home: Some("/home/u".into()),
            ..OutDirEnv::default()
        };
        assert_eq!(
            env.resolve(),
            Some(PathBuf::from("/home/u/.local/lib/wireshark/plugins/quazal"))
        );
    }

    #[test]
    fn test_windows_plugin_dir() {
        let env = OutDirEnv {
            appdata: Some("C:/Users/u/AppData/Roaming".into()),
            home: Some("/home/u".into()),
            windows: true,
            ..OutDirEnv::default()
        };
        let dir = env.resolve().expect("dir");
        assert!(dir.starts_with("C:/Users/u/AppData/Roaming"));
        assert!(dir.ends_with("Wireshark/plugins/quazal"));
    }

    #[test]
    fn test_nothing_known() {
        assert_eq!(OutDirEnv::default().resolve(), None);
        let env = OutDirEnv {
            home: Some("/home/u".into()),
            windows: true,
            ..OutDirEnv::default()
        };
        assert_eq!(env.resolve(), None);
    }
}

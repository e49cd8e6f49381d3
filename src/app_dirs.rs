use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "tomato";
const LOG_FILE: &str = "tomato.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> Option<PathBuf> {
        match std::env::var_os("HOME") {
            Some(home) => Some(Self::log_path_under(Path::new(&home))),
            None => ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().join(LOG_FILE)),
        }
    }

    /// `$HOME/.local/state/tomato/tomato.log` for the given home directory.
    pub fn log_path_under(home: &Path) -> PathBuf {
        home.join(".local")
            .join("state")
            .join(APP_NAME)
            .join(LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_lives_in_state_dir() {
        let path = AppDirs::log_path_under(Path::new("/home/me"));
        assert_eq!(path, PathBuf::from("/home/me/.local/state/tomato/tomato.log"));
    }
}

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Sends log records to `path`, appending. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr.
pub fn init_file_logger(path: &Path) -> io::Result<()> {
    let builder = file_logger(path)?;
    init(builder);
    Ok(())
}

fn file_logger(path: &Path) -> io::Result<Builder> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.target(Target::Pipe(Box::new(file)));
    Ok(builder)
}

fn init(mut builder: Builder) {
    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("tomato.log");
        let builder = file_logger(&path);
        assert!(builder.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn unopenable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = init_file_logger(&blocker.join("tomato.log")).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn records_reach_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tomato.log");
        let mut builder = file_logger(&path).unwrap();
        builder.filter_level(log::LevelFilter::Info);
        let logger = builder.build();

        log::Log::log(
            &logger,
            &log::Record::builder()
                .args(format_args!("phase WORK -> SHORT BREAK"))
                .level(log::Level::Info)
                .target("tomato::session")
                .build(),
        );
        log::Log::flush(&logger);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("phase WORK -> SHORT BREAK"));
    }
}

use std::{ffi::OsString, fs::File, io::Read, path::PathBuf};

use tracing::debug;

use super::error::ConfigResult;

/// Points at a config file explicitly, wins over every other location.
pub const CONFIG_PATH_ENV: &str = "LEARNED_CONFIG";

pub fn find_config_file(use_local: bool) -> PathBuf {
    #[cfg(unix)]
    let home = std::env::var_os("HOME");
    #[cfg(windows)]
    let home = std::env::var_os("APPDATA");
    #[cfg(not(any(unix, windows)))]
    let home = None;

    resolve_config_file(use_local, std::env::var_os(CONFIG_PATH_ENV), home)
}

/// `explicit` > `./config.toml` when `use_local` > `<home>/.config/learned/config.toml` > `./config.toml`
fn resolve_config_file(
    use_local: bool,
    explicit: Option<OsString>,
    home: Option<OsString>,
) -> PathBuf {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    if use_local {
        return PathBuf::from("./config.toml");
    }

    if let Some(home) = home {
        let mut path = PathBuf::from(home);
        if cfg!(unix) {
            path = path.join(".config");
        }
        path = path.join(crate::APPLICATION_NAME).join("config.toml");

        if path.exists() {
            return path;
        }
    }

    PathBuf::from("./config.toml")
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    let filename = find_config_file(use_local);

    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(crate::config::error::ConfigError::ConfigNotFound);
    }

    let filename = filename.canonicalize()?;
    debug!("using {} as configuration file", filename.display());

    let mut fd = File::open(filename)?;
    let mut buf = Vec::new();
    fd.read_to_end(&mut buf)?;

    Ok(buf)
}

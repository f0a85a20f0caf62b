//! Path utilities: data directory location and `~` handling.
//!
//! The data directory holds the default dataset (`rankings.json`) and the trace log. It
//! is `$RANKTRAIL_DATA_DIR` when set, otherwise `~/.local/share/ranktrail`.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RANKTRAIL_DATA_DIR";

const DEFAULT_DATA_SUBDIR: &str = ".local/share/ranktrail";

fn home_dir() -> Option<String> {
    std::env::var("HOME").ok().filter(|h| !h.is_empty())
}

/// Returns the data directory for ranktrail files.
///
/// Falls back to `./.ranktrail` when neither the override nor `$HOME` is available.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var(DATA_DIR_ENV).ok().as_deref(),
        home_dir().as_deref(),
    )
}

fn resolve_data_dir(override_dir: Option<&str>, home: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_with_home(dir, home));
    }

    home.map_or_else(
        || PathBuf::from(".ranktrail"),
        |home| PathBuf::from(home).join(DEFAULT_DATA_SUBDIR),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or any path when `$HOME` is unset, are returned as is.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_with_home(path, home_dir().as_deref())
}

fn expand_with_home(path: &str, home: Option<&str>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

/// Replaces a leading home directory with `~` for display.
#[must_use]
pub fn contract_home(path: &str) -> String {
    contract_with_home(path, home_dir().as_deref())
}

fn contract_with_home(path: &str, home: Option<&str>) -> String {
    let Some(home) = home.map(|h| h.trim_end_matches('/')).filter(|h| !h.is_empty()) else {
        return path.to_string();
    };

    match path.strip_prefix(home) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_and_is_expanded() {
        assert_eq!(
            resolve_data_dir(Some("~/data"), Some("/home/ana")),
            PathBuf::from("/home/ana/data")
        );
        assert_eq!(
            resolve_data_dir(Some("/srv/ranktrail"), Some("/home/ana")),
            PathBuf::from("/srv/ranktrail")
        );
    }

    #[test]
    fn blank_override_falls_back_to_home() {
        assert_eq!(
            resolve_data_dir(Some("  "), Some("/home/ana")),
            PathBuf::from("/home/ana/.local/share/ranktrail")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from(".ranktrail"));
    }

    #[test]
    fn tilde_expansion() {
        let home = Some("/home/ana/");
        assert_eq!(expand_with_home("~/rankings.json", home), "/home/ana/rankings.json");
        assert_eq!(expand_with_home("~", Some("/home/ana")), "/home/ana");
        assert_eq!(expand_with_home("~bob/x", home), "~bob/x");
        assert_eq!(expand_with_home("/abs/path", home), "/abs/path");
        assert_eq!(expand_with_home("~/x", None), "~/x");
    }

    #[test]
    fn home_contraction() {
        let home = Some("/home/ana");
        assert_eq!(contract_with_home("/home/ana/.local/share", home), "~/.local/share");
        assert_eq!(contract_with_home("/home/ana", home), "~");
        assert_eq!(contract_with_home("/home/anabel/x", home), "/home/anabel/x");
        assert_eq!(contract_with_home("/tmp/x", None), "/tmp/x");
    }
}

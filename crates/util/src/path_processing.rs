use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        temp_env::with_var("HOME", Some("/home/grower"), || {
            assert_eq!(expand_tilde("~/sprout/data.json"), PathBuf::from("/home/grower/sprout/data.json"));
            assert_eq!(expand_tilde("~"), PathBuf::from("/home/grower"));
        });
    }

    #[test]
    fn leaves_other_paths_untouched() {
        assert_eq!(expand_tilde("  ./data.json "), PathBuf::from("./data.json"));
        assert_eq!(expand_tilde("/etc/sprout~"), PathBuf::from("/etc/sprout~"));
    }
}

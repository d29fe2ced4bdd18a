use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = trimmed.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_paths_through() {
        assert_eq!(expand_tilde("/tmp/out.json"), PathBuf::from("/tmp/out.json"));
        assert_eq!(expand_tilde("  relative/file "), PathBuf::from("relative/file"));
    }

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_tilde("~/prefs.json");
        assert!(expanded.ends_with("prefs.json"));
        assert!(!expanded.to_string_lossy().starts_with('~') || home_dir().is_none());
    }
}

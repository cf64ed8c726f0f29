//! Item filtering.

/// Case-insensitive substring filter over item name and folder.
///
/// An empty (or absent) pattern matches everything, so `bwssh` with no
/// `--filter` processes the whole vault.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Lowercased pattern; `None` means match-all.
    pattern: Option<String>,
}

impl FilterSpec {
    pub fn new(pattern: &str) -> Self {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self {
                pattern: Some(trimmed.to_lowercase()),
            }
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.pattern.is_none()
    }

    /// True when the pattern occurs in the item name or its folder name.
    pub fn matches(&self, name: &str, folder: Option<&str>) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        if name.to_lowercase().contains(pattern) {
            return true;
        }
        folder.is_some_and(|f| f.to_lowercase().contains(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_everything() {
        let f = FilterSpec::new("");
        assert!(f.is_match_all());
        assert!(f.matches("github", None));
        assert!(f.matches("", Some("Work")));
    }

    #[test]
    fn whitespace_only_pattern_is_match_all() {
        assert!(FilterSpec::new("   ").is_match_all());
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let f = FilterSpec::new("WORK");
        assert!(f.matches("gitlab-work", None));
        assert!(f.matches("GitLab-Work", None));
        assert!(!f.matches("github", None));
    }

    #[test]
    fn folder_name_participates_in_matching() {
        let f = FilterSpec::new("infra");
        assert!(f.matches("deploy key", Some("Infrastructure")));
        assert!(!f.matches("deploy key", Some("Personal")));
        assert!(!f.matches("deploy key", None));
    }
}

//! Case-insensitive include/exclude filtering of repository names.

use std::collections::HashSet;

/// Name filter built once per profile.
///
/// The include list distinguishes "not configured" (every name passes) from
/// "configured but empty" (no name passes). Exclusion is applied after
/// inclusion, so a name on both lists is excluded.
#[derive(Debug, Clone)]
pub struct NameFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl NameFilter {
    /// Build a filter from raw profile lists, lowercasing each entry once.
    pub fn new(include: Option<&[String]>, exclude: &[String]) -> Self {
        Self {
            include: include.map(|names| names.iter().map(|n| n.to_lowercase()).collect()),
            exclude: exclude.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    /// Whether a repository with this name should be backed up.
    pub fn allows(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if let Some(include) = &self.include {
            if !include.contains(&name) {
                return false;
            }
        }
        !self.exclude.contains(&name)
    }
}

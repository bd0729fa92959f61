//! Worksheet labels: at most 31 characters, a few forbidden characters,
//! unique regardless of case.

use std::collections::HashSet;

pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Hands out labels that are valid and unique within one workbook.
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize and truncate `wanted`; a label already handed out (compared
    /// case-insensitively) gets a ` (n)` suffix, `n` starting at 2.
    pub fn claim(&mut self, wanted: &str) -> String {
        let base = sanitize(wanted);

        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let head: String = base.chars().take(keep).collect();
            candidate = format!("{}{}", head.trim_end(), suffix);
            n += 1;
        }

        self.taken.insert(candidate.to_lowercase());
        candidate
    }
}

fn sanitize(raw: &str) -> String {
    let replaced: String = raw
        .trim()
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches('\'');

    let label: String = trimmed.chars().take(MAX_SHEET_NAME_LEN).collect();
    if label.trim().is_empty() {
        "Sheet".to_string()
    } else {
        label
    }
}

/// Sheet name as used in a formula reference: always quoted, inner
/// apostrophes doubled.
pub fn sheet_ref(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_cut_to_31() {
        let mut namer = SheetNamer::new();
        let label = namer.claim("A very long client project name indeed");
        assert_eq!(label.chars().count(), 31);
        assert_eq!(label, "A very long client project name");
    }

    #[test]
    fn truncation_collisions_get_a_suffix() {
        let mut namer = SheetNamer::new();
        let a = namer.claim("Consulting engagement Alpha Beta 2024");
        let b = namer.claim("Consulting engagement Alpha Beta 2025");
        assert_ne!(a, b);
        assert!(b.ends_with(" (2)"));
        assert!(b.chars().count() <= MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn collisions_ignore_case() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.claim("All Projects"), "All Projects");
        assert_eq!(namer.claim("all projects"), "all projects (2)");
        assert_eq!(namer.claim("ALL PROJECTS"), "ALL PROJECTS (3)");
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.claim("a/b:c"), "a_b_c");
    }

    #[test]
    fn references_are_quoted() {
        assert_eq!(sheet_ref("Time Entries"), "'Time Entries'");
        assert_eq!(sheet_ref("O'Brien"), "'O''Brien'");
    }
}

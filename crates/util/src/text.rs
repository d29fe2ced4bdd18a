//! Small text helpers shared by the TUI components.

/// Truncates `input` to at most `max_chars` characters, replacing the tail
/// with a single ellipsis when content was removed. The ellipsis counts
/// toward the budget.
pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    let total = input.chars().count();
    if total <= max_chars {
        return input.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let head: String = input.chars().take(max_chars - 1).collect();
    format!("{head}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_strings_intact() {
        assert_eq!(truncate_with_ellipsis("Document Parser", 20), "Document Parser");
        assert_eq!(truncate_with_ellipsis("", 4), "");
    }

    #[test]
    fn truncates_within_budget() {
        let truncated = truncate_with_ellipsis("Output Generation", 10);
        assert_eq!(truncated, "Output Ge…");
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let truncated = truncate_with_ellipsis("héllö wörld", 6);
        assert_eq!(truncated.chars().count(), 6);
    }

    #[test]
    fn zero_budget_yields_empty_string() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }
}

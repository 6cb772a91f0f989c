/*!
 * Identifier list parsing
 */

/// Split a newline-delimited identifier list
///
/// Blank and whitespace-only lines are dropped, the rest are trimmed.
/// Order and duplicates are preserved.
pub fn split_identifiers(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_removed() {
        assert_eq!(split_identifiers("a\n\n  \nb\nb\n"), vec!["a", "b", "b"]);
    }

    #[test]
    fn test_duplicates_and_order_kept() {
        let input = "spaces/nielsr/LayoutLMv2-FUNSD\nspaces/valhalla/glide-text2im\n\n    \n   \nspaces/valhalla/glide-text2im\n  \nspaces/valhalla/glide-text2im\n";
        assert_eq!(
            split_identifiers(input),
            vec![
                "spaces/nielsr/LayoutLMv2-FUNSD",
                "spaces/valhalla/glide-text2im",
                "spaces/valhalla/glide-text2im",
                "spaces/valhalla/glide-text2im",
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_identifiers("").is_empty());
        assert!(split_identifiers(" \n\t\n").is_empty());
    }

    #[test]
    fn test_crlf_and_padding() {
        assert_eq!(
            split_identifiers("  models/gpt2 \r\nmodels/distilgpt2\r\n"),
            vec!["models/gpt2", "models/distilgpt2"]
        );
    }
}

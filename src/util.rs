/// Formats a coin amount with the currency marker and thousands
/// separators, e.g. `⏣ 1,204` or `- ⏣ 50`.
pub fn format_coins(amount: i64) -> String {
    if amount < 0 {
        format!("- ⏣ {}", group_thousands(amount.unsigned_abs()))
    } else {
        format!("⏣ {}", group_thousands(amount as u64))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Shortens text to at most `max_chars` characters, collapsing
/// whitespace and cutting at a word boundary with a `...` marker.
/// Used for AFK reasons shown in mention replies.
pub fn shorten(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    const PLACEHOLDER: &str = "...";
    let budget = max_chars.saturating_sub(PLACEHOLDER.len());

    let mut out = String::new();
    for word in collapsed.split(' ') {
        let needed = if out.is_empty() {
            word.chars().count()
        } else {
            word.chars().count() + 1
        };

        if out.chars().count() + needed > budget {
            break;
        }

        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    // A single overlong word still has to fit the budget.
    if out.is_empty() {
        out = collapsed.chars().take(budget).collect();
    }

    out.push_str(PLACEHOLDER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_are_grouped() {
        assert_eq!(format_coins(0), "⏣ 0");
        assert_eq!(format_coins(999), "⏣ 999");
        assert_eq!(format_coins(1204), "⏣ 1,204");
        assert_eq!(format_coins(1_000_000), "⏣ 1,000,000");
    }

    #[test]
    fn negative_coins_carry_a_sign() {
        assert_eq!(format_coins(-50), "- ⏣ 50");
        assert_eq!(format_coins(-12345), "- ⏣ 12,345");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(shorten("brb lunch", 75), "brb lunch");
    }

    #[test]
    fn long_text_is_cut_at_a_word_boundary() {
        let reason = "gone to walk the dog around the block and then some";
        let short = shorten(reason, 30);

        assert!(short.chars().count() <= 30);
        assert!(short.ends_with("..."));
        assert!(!short.contains("  "));
    }

    #[test]
    fn overlong_single_word_is_truncated() {
        let short = shorten(&"a".repeat(100), 10);

        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(shorten("back   in\n five", 75), "back in five");
    }
}

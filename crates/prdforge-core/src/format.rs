// ABOUTME: Small text helpers for compact terminal output: section headers, bullet lists, previews.

/// A bold section header underlined to the title's width.
pub fn section_header(title: &str, emoji: &str) -> String {
    format!(
        "\n{} **{}**\n{}",
        emoji,
        title.to_uppercase(),
        "─".repeat(title.chars().count() + 4)
    )
}

/// Format up to `max_items` entries as `• item` lines, noting how many
/// were left out. Existing bullet markers on items are stripped.
pub fn bullet_list(items: &[String], max_items: usize) -> String {
    if items.is_empty() {
        return "• No items available".to_string();
    }

    let mut lines: Vec<String> = items
        .iter()
        .take(max_items)
        .map(|item| {
            let clean = item
                .trim()
                .trim_start_matches(['-', '•', '*'])
                .trim_start();
            format!("• {}", clean)
        })
        .collect();

    if items.len() > max_items {
        lines.push(format!("• ... and {} more", items.len() - max_items));
    }

    lines.join("\n")
}

/// First `max` characters of `text`, with an ellipsis when truncated.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}

/// Numbered list, one entry per line, indented for terminal output.
pub fn numbered_list(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("   {}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

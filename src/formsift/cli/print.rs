use colored::Colorize;
use formsift::filter::{FilterMessage, MessageLevel};
use formsift::model::{Container, Item};
use std::collections::HashSet;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;

pub fn print_messages(messages: &[FilterMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
        }
    }
}

/// Prints the visible items of `container`, marking highlighted nodes.
///
/// `marked` holds `(item index, node path)` pairs.
pub fn print_items(container: &Container, marked: &HashSet<(usize, Vec<usize>)>) {
    let visible: Vec<(usize, &Item)> = container
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.hidden)
        .collect();

    if visible.is_empty() {
        println!("No items match.");
        return;
    }

    for (index, item) in &visible {
        let idx_str = format!("{:>3}. ", index + 1);
        let available = LINE_WIDTH.saturating_sub(idx_str.width());

        let mut used = 0;
        let mut parts = Vec::new();
        item.walk(&mut |path, node| {
            let Some(text) = node.text.as_deref() else {
                return;
            };
            if used >= available {
                return;
            }
            let text = truncate_to_width(text, available - used);
            used += text.width() + 1;
            if marked.contains(&(*index, path.to_vec())) {
                parts.push(text.black().on_yellow().to_string());
            } else {
                parts.push(text);
            }
        });

        println!("{}{}", idx_str.dimmed(), parts.join(" "));
    }

    println!(
        "{}",
        format!("{} of {} items shown", visible.len(), container.items.len()).dimmed()
    );
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Ada", 10), "Ada");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate_to_width("Lovelace", 5), "Love…");
    }
}

//! Utility helpers for command parsing and display formatting.

use std::collections::HashSet;

/// Display labels for the built-in island items.
const ITEM_LABELS: &[(&str, &str)] = &[
    ("bakir_para", "Copper Coin"),
    ("mesale", "Torch"),
    ("gumus_anahtar", "Silver Key"),
    ("ay_diski", "Moon Disk"),
    ("sifali_ot", "Healing Herb"),
];

/// Normalize command text for matching: trim, lowercase, collapse
/// internal whitespace to single spaces.
#[must_use]
pub fn normalize_command(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clamp an integer into `[minimum, maximum]`.
#[must_use]
pub fn clamp(value: i32, minimum: i32, maximum: i32) -> i32 {
    value.min(maximum).max(minimum)
}

/// Human-readable label for an item id, title-casing unknown ids.
#[must_use]
pub fn item_label(item_id: &str) -> String {
    if let Some((_, label)) = ITEM_LABELS.iter().find(|(id, _)| *id == item_id) {
        return (*label).to_string();
    }
    item_id
        .split('_')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Readable inventory text: "Empty" or comma-joined item labels.
#[must_use]
pub fn format_inventory(items: &[String]) -> String {
    if items.is_empty() {
        return "Empty".to_string();
    }
    items
        .iter()
        .map(|item| item_label(item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove duplicates while preserving first-seen order.
#[must_use]
pub fn dedupe_preserve_order(values: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values {
        if seen.insert(value.as_str()) {
            ordered.push(value.as_str());
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_command("  CODE   274 "), "code 274");
        assert_eq!(normalize_command("\tUse\n Herb"), "use herb");
        assert_eq!(normalize_command("   "), "");
    }

    #[test]
    fn clamp_respects_bounds() {
        assert_eq!(clamp(7, 0, 5), 5);
        assert_eq!(clamp(-2, 0, 5), 0);
        assert_eq!(clamp(3, 0, 5), 3);
    }

    #[test]
    fn item_label_falls_back_to_title_case() {
        assert_eq!(item_label("mesale"), "Torch");
        assert_eq!(item_label("rusty_lantern"), "Rusty Lantern");
    }

    #[test]
    fn inventory_formats_empty_and_labels() {
        assert_eq!(format_inventory(&[]), "Empty");
        let items = vec!["bakir_para".to_string(), "odd_shell".to_string()];
        assert_eq!(format_inventory(&items), "Copper Coin, Odd Shell");
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let values: Vec<String> = ["camp", "marsh", "camp", "lake_shore", "marsh"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            dedupe_preserve_order(&values),
            vec!["camp", "marsh", "lake_shore"]
        );
    }
}

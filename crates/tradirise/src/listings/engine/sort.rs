use std::cmp::Ordering;

use crate::listings::domain::{parse_timestamp, Listing};
use crate::listings::filters::SortMode;
use crate::listings::schema::ListingSchema;

/// Comparator for one sort mode. Unrecognized modes compare everything as equal.
pub fn compare<T: Listing>(schema: &ListingSchema<T>, a: &T, b: &T, mode: &SortMode) -> Ordering {
    match mode {
        SortMode::Newest => created_key(b).cmp(&created_key(a)),
        SortMode::Oldest => created_key(a).cmp(&created_key(b)),
        SortMode::AvailableSoon => available_key(schema, a).cmp(&available_key(schema, b)),
        SortMode::NameAz => locale_cmp(&schema.display_name(a), &schema.display_name(b)),
        SortMode::Unrecognized(_) => Ordering::Equal,
    }
}

/// Stable in-place ordering of `indices` into `source`.
pub fn sort_indices<T: Listing>(
    schema: &ListingSchema<T>,
    source: &[T],
    indices: &mut [usize],
    mode: &SortMode,
) {
    if !mode.is_recognized() {
        return;
    }
    indices.sort_by(|&a, &b| compare(schema, &source[a], &source[b], mode));
}

// Unparseable timestamps order as the oldest.
fn created_key<T: Listing>(record: &T) -> Option<chrono::NaiveDateTime> {
    parse_timestamp(record.created_at())
}

// Undated records go last.
fn available_key<T>(schema: &ListingSchema<T>, record: &T) -> (bool, Option<chrono::NaiveDate>) {
    let date = schema.date_of(record);
    (date.is_none(), date)
}

/// Collation approximating a locale-aware compare.
///
/// Primary strength ignores case and Latin diacritics (so "Ōtautahi" sorts with "Otautahi"),
/// then accents break ties, then lowercase sorts before uppercase, then raw text. The result
/// is a total order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| -> Vec<char> {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(fold_diacritic)
            .collect()
    };
    let secondary = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).collect() };
    let tertiary = |s: &str| -> Vec<(bool, char)> {
        s.chars().map(|c| (c.is_uppercase(), c)).collect()
    };

    primary(a)
        .cmp(&primary(b))
        .then_with(|| secondary(a).cmp(&secondary(b)))
        .then_with(|| tertiary(a).cmp(&tertiary(b)))
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collation_ignores_case_at_primary_strength() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zeke", "aaron"), Ordering::Greater);
    }

    #[test]
    fn collation_groups_macrons_with_plain_vowels() {
        let mut regions = vec!["Whanganui", "Ōtautahi", "Auckland", "Otago"];
        regions.sort_by(|a, b| locale_cmp(a, b));
        assert_eq!(regions, vec!["Auckland", "Otago", "Ōtautahi", "Whanganui"]);
    }

    #[test]
    fn collation_breaks_ties_deterministically() {
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("e", "é"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}

//! Diacritic-insensitive, plural-tolerant string comparison used by all
//! string-based conditions (`Class`, `BaseType`, `HasExplicitMod`, ...).
//!
//! The game client treats `"Maelström"` and `"Maelstrom"` as the same base
//! type, and accepts both singular and plural item-class names
//! (`"Map"`/`"Maps"`). Neither tolerance is optional; a filter author who
//! forgets an umlaut or writes the wrong plural form still expects a match.

fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => {
            if c.is_uppercase() { 'A' } else { 'a' }
        }
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => {
            if c.is_uppercase() { 'E' } else { 'e' }
        }
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => {
            if c.is_uppercase() { 'I' } else { 'i' }
        }
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => {
            if c.is_uppercase() { 'O' } else { 'o' }
        }
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => {
            if c.is_uppercase() { 'U' } else { 'u' }
        }
        'ý' | 'ÿ' | 'Ý' | 'Ÿ' => {
            if c.is_uppercase() { 'Y' } else { 'y' }
        }
        'ñ' | 'Ñ' => {
            if c.is_uppercase() { 'N' } else { 'n' }
        }
        'ç' | 'Ç' => {
            if c.is_uppercase() { 'C' } else { 'c' }
        }
        other => other,
    }
}

fn normalize(s: &str) -> String {
    s.chars().map(strip_diacritic).collect()
}

/// Strips one trailing ASCII `s` if present, giving the singular form used
/// to bridge `"Map"`/`"Maps"`-style comparisons.
fn singularize(s: &str) -> &str {
    s.strip_suffix('s').unwrap_or(s)
}

fn plural_tolerant_eq(a: &str, b: &str) -> bool {
    a == b || singularize(a) == singularize(b)
}

fn plural_tolerant_contains(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle) || singularize(haystack).contains(singularize(needle))
}

/// Compares `haystack` (an item's field, e.g. its base type name) against
/// `needle` (a condition operand), ignoring diacritics and tolerating
/// singular/plural mismatches. `exact` selects full-string equality versus
/// substring containment.
pub fn compare_strings_ignore_diacritics(haystack: &str, needle: &str, exact: bool) -> bool {
    let h = normalize(haystack);
    let n = normalize(needle);
    if exact {
        plural_tolerant_eq(&h, &n)
    } else {
        plural_tolerant_contains(&h, &n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diacritics_are_ignored() {
        assert!(compare_strings_ignore_diacritics("Maelström", "Maelstrom", true));
    }

    #[test]
    fn plural_and_singular_are_equal_under_exact_match() {
        assert!(compare_strings_ignore_diacritics("Map", "Maps", true));
        assert!(compare_strings_ignore_diacritics("Maps", "Map", true));
    }

    #[test]
    fn exact_match_rejects_proper_substrings() {
        assert!(!compare_strings_ignore_diacritics("Studded Leather Belt", "Leather Belt", true));
    }

    #[test]
    fn substring_match_accepts_partial_names() {
        assert!(compare_strings_ignore_diacritics("Studded Leather Belt", "Leather Belt", false));
    }

    #[test]
    fn substring_match_is_case_sensitive() {
        assert!(!compare_strings_ignore_diacritics("Leather Belt", "leather", false));
    }
}

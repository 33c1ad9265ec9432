//! "Did you mean" suggestions for mistyped identifiers.

/// Find the closest candidate to `input`. Returns (candidate, is_exact).
///
/// Checked in order: exact (case-insensitive), prefix, suffix, then
/// Levenshtein distance of at most 3.
pub fn closest<'a>(input: &str, candidates: &[&'a str]) -> Option<(&'a str, bool)> {
    let input = input.to_lowercase();
    if input.is_empty() {
        return None;
    }

    if let Some(c) = candidates.iter().find(|c| c.to_lowercase() == input) {
        return Some((*c, true));
    }
    if let Some(c) = candidates.iter().find(|c| c.to_lowercase().starts_with(&input)) {
        return Some((*c, false));
    }
    if let Some(c) = candidates.iter().find(|c| c.to_lowercase().ends_with(&input)) {
        return Some((*c, false));
    }

    candidates
        .iter()
        .map(|c| (*c, levenshtein(&input, &c.to_lowercase())))
        .filter(|(_, dist)| *dist > 0 && *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(c, _)| (c, false))
}

/// Hint text for an unknown identifier, if anything is close enough.
pub fn did_you_mean(input: &str, candidates: &[&str]) -> Option<String> {
    match closest(input, candidates) {
        Some((candidate, false)) => Some(format!("Did you mean '{}'?", candidate)),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: &[&str] = &["nextjs", "nuxt", "astro", "sveltekit", "vue", "remix", "laravel"];

    #[test]
    fn exact_match_is_not_a_suggestion() {
        assert_eq!(closest("Astro", IDS), Some(("astro", true)));
        assert_eq!(did_you_mean("astro", IDS), None);
    }

    #[test]
    fn prefix_and_suffix_matches() {
        assert_eq!(closest("svelte", IDS), Some(("sveltekit", false)));
        assert_eq!(closest("kit", IDS), Some(("sveltekit", false)));
    }

    #[test]
    fn typos_within_distance() {
        assert_eq!(did_you_mean("nextj", IDS), Some("Did you mean 'nextjs'?".to_string()));
        assert_eq!(did_you_mean("larvel", IDS), Some("Did you mean 'laravel'?".to_string()));
        assert_eq!(did_you_mean("django-rest", IDS), None);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }
}

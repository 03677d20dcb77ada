//! City-name normalization for the weather provider query string.

/// Map a human city name to the token used as the weather provider's
/// `q` query value.
///
/// The transform is order-sensitive: (1) lowercase, (2) collapse each
/// whitespace run to a single `+` (leading and trailing runs
/// included), (3) substitute accented letters with their base form.
/// The result is used verbatim in the query string; no percent
/// encoding happens beyond the `+` substitution, which is what the
/// provider's query contract expects.
///
/// Two distinct names may normalize to the same token; that loss is
/// accepted.
pub fn query_token(name: &str) -> String {
    let lowered = name.to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push('+');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    collapsed.chars().map(strip_diacritic).collect()
}

/// Fixed substitution table for Latin accents and the Portuguese ç.
///
/// Only lowercase forms appear here; lowercasing has already happened
/// by the time this runs.
fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        _ => c,
    }
}

use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for SAMI track identification
///
/// SAMI `lang:` declarations carry BCP-47-style tags (`en-US`, `fr`, `fra`).
/// Tracks are keyed by the uppercased primary subtag (`EN`, `FR`), validated
/// against ISO 639-1/639-3 and the common ISO 639-2/B aliases.
/// Track key used when a class has no language mapping
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Map an ISO 639-2/B code to its 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(part2t)
}

/// Normalize a language tag to its uppercase track key.
///
/// The primary subtag is taken before any `-`/`_` region or script subtag,
/// validated as an ISO 639-1 or 639-3 code, and rendered as the two-letter
/// uppercase code when one exists (three-letter uppercase otherwise).
pub fn normalize_lang_tag(tag: &str) -> Result<String> {
    let primary = tag
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if primary.len() == 2 {
        if Language::from_639_1(&primary).is_some() {
            return Ok(primary.to_uppercase());
        }
    } else if primary.len() == 3 {
        let part2t = part2b_to_part2t(&primary).unwrap_or(&primary);
        if let Some(lang) = Language::from_639_3(part2t) {
            return Ok(match lang.to_639_1() {
                Some(code) => code.to_uppercase(),
                None => part2t.to_uppercase(),
            });
        }
    }

    Err(anyhow!("Invalid language tag: {}", tag))
}

/// Normalize a tag, falling back to [`DEFAULT_LANGUAGE`] when it is invalid
pub fn normalize_or_default(tag: &str) -> String {
    normalize_lang_tag(tag).unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string())
}

/// Compare two language tags after normalization.
///
/// Tags that cannot be normalized fall back to a case-insensitive literal
/// comparison, so unknown-but-equal tags still match.
pub fn language_codes_match(first: &str, second: &str) -> bool {
    match (normalize_lang_tag(first), normalize_lang_tag(second)) {
        (Ok(a), Ok(b)) => a == b,
        _ => first.trim().eq_ignore_ascii_case(second.trim()),
    }
}

/// Human-readable language name for a tag, for logs and track listings
pub fn get_language_name(tag: &str) -> Result<String> {
    let key = normalize_lang_tag(tag)?.to_lowercase();
    let language = if key.len() == 2 {
        Language::from_639_1(&key)
    } else {
        Language::from_639_3(&key)
    };
    language
        .map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language tag: {}", tag))
}

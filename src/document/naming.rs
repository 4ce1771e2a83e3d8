//! Name disambiguation for tables and table columns

/// Characters stripped from both ends of user-supplied names
const RESERVED_EDGE_CHARS: &[char] = &['@', '$', '!', ':'];

/// Pick a name that does not collide with `existing`.
///
/// With an empty `requested` name a fresh `{base}{separator}{n}` is
/// generated, where `base` is `default` minus trailing digits and `n` is one
/// more than the largest suffix already in use (starting at 1). A requested
/// name is trimmed; it is kept unless it collides with another name, in
/// which case a numbered variant of it is generated. Keeping `current`
/// (the name being renamed) never counts as a collision.
pub fn unique_name(
    default: &str,
    existing: &[String],
    requested: &str,
    current: &str,
    separator: &str,
) -> String {
    let base = default.trim_end_matches(|c: char| c.is_ascii_digit());

    let requested = requested
        .trim()
        .trim_matches(|c: char| RESERVED_EDGE_CHARS.contains(&c));
    if requested.is_empty() {
        return generate(base, existing, separator);
    }

    if requested != current && existing.iter().any(|name| name == requested) {
        return generate(requested, existing, separator);
    }
    requested.to_string()
}

fn generate(base: &str, existing: &[String], separator: &str) -> String {
    let prefix = format!("{base}{separator}");
    let suffix = existing
        .iter()
        .filter_map(|name| name.strip_prefix(&prefix))
        .filter_map(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        })
        .map(|n| n.saturating_add(1))
        .fold(1, u64::max);
    format!("{prefix}{suffix}")
}

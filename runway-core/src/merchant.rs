//! Merchant normalization: free-text statement descriptions to canonical keys.

/// Known vendors matched by substring, checked before the generic fallback.
const KNOWN_VENDORS: &[(&[&str], &str)] = &[
    (&["amzn", "amazon aws"], "Amazon AWS"),
    (&["stripe"], "Stripe"),
    (&["google"], "Google"),
    (&["microsoft"], "Microsoft"),
    (&["salesforce"], "Salesforce"),
    (&["zoom"], "Zoom"),
    (&["slack"], "Slack"),
    (&["hubspot"], "HubSpot"),
];

/// Map a description to its merchant key.
///
/// Case-insensitive and deterministic. Unknown merchants fall back to the
/// first whitespace-delimited token with non-alphanumeric characters
/// stripped, which can legitimately be empty.
pub fn normalize_merchant(description: &str) -> String {
    let lower = description.to_lowercase();
    for (needles, canonical) in KNOWN_VENDORS {
        if needles.iter().any(|needle| lower.contains(needle)) {
            return (*canonical).to_string();
        }
    }
    description
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

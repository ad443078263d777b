/// IANA protocol numbers with a known name. Anything else passes through as its own token.
const PROTOCOL_NAMES: &[(i64, &str)] = &[(6, "tcp"), (17, "udp"), (1, "icmp")];

pub fn protocol_name(number: i64) -> Option<&'static str> {
    PROTOCOL_NAMES
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, name)| *name)
}

/// Canonical lowercase protocol name for a raw token.
///
/// Integer tokens found in the protocol table map to their name. Every other token,
/// including unmapped numbers, is returned lowercased, so normalizing an already
/// canonical value is a no-op.
pub fn normalize_protocol(raw: &str) -> String {
    match raw.parse::<i64>().ok().and_then(protocol_name) {
        Some(name) => name.to_string(),
        None => raw.to_lowercase(),
    }
}

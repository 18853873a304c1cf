//! Activation message construction.

/// Domain-separation prefix for activation signatures, protocol version 1.
///
/// Both the sign and verify paths prepend this constant. Changing it is a
/// breaking protocol bump: every previously issued activation stops
/// verifying.
pub const ACTIVATION_DOMAIN_V1: &[u8] = b"keyloft.activation.v1:";

/// Builds the exact byte sequence covered by an activation signature:
/// `prefix || license_key_hex || ':' || machine_id`, UTF-8.
///
/// `license_key_hex` must already be canonical lowercase hex; both the
/// sign and verify paths run [`keyloft_keys::normalize`] first so hex-
/// and word-format input produce the identical message.
#[must_use]
pub fn activation_message(license_key_hex: &str, machine_id: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        ACTIVATION_DOMAIN_V1.len() + license_key_hex.len() + 1 + machine_id.len(),
    );
    message.extend_from_slice(ACTIVATION_DOMAIN_V1);
    message.extend_from_slice(license_key_hex.as_bytes());
    message.push(b':');
    message.extend_from_slice(machine_id.as_bytes());
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_layout() {
        let message = activation_message("aabb", "machine-1");
        let mut expected = ACTIVATION_DOMAIN_V1.to_vec();
        expected.extend_from_slice(b"aabb:machine-1");
        assert_eq!(message, expected);
    }

    #[test]
    fn prefix_is_versioned() {
        assert!(ACTIVATION_DOMAIN_V1.ends_with(b"v1:"));
    }
}

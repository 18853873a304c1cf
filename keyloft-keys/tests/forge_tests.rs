use keyloft_keys::{
    generate_license_key, normalize, CanonicalKey, Dictionary, KeyFormat, HEX_LEN, WORD_COUNT,
};

#[test]
fn generated_hex_key_is_canonical() {
    let key = generate_license_key(KeyFormat::Hex);
    assert_eq!(key.len(), HEX_LEN);
    assert!(key.bytes().all(|b| b.is_ascii_hexdigit()));
    assert_eq!(key, key.to_lowercase());
    assert_eq!(normalize(&key).unwrap(), key);
}

#[test]
fn generated_word_key_decodes() {
    let key = generate_license_key(KeyFormat::Word);
    let tokens = key.split(['-', ' ']).count();
    assert_eq!(tokens, WORD_COUNT);
    assert!(CanonicalKey::from_words(&key, Dictionary::embedded()).is_ok());
}

#[test]
fn generated_keys_are_unique() {
    let a = generate_license_key(KeyFormat::Hex);
    let b = generate_license_key(KeyFormat::Hex);
    assert_ne!(a, b);
}

#[test]
fn random_keys_differ() {
    assert_ne!(CanonicalKey::random(), CanonicalKey::random());
}

#[test]
fn generated_word_key_normalizes_to_hex() {
    let key = generate_license_key(KeyFormat::Word);
    let hex = normalize(&key).unwrap();
    assert_eq!(hex.len(), HEX_LEN);
}

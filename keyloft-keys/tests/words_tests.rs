use keyloft_keys::{CanonicalKey, Dictionary, KeyError, GROUP_SIZE, KEY_LEN, WORD_COUNT};

fn sample_key() -> CanonicalKey {
    let mut bytes = [0u8; KEY_LEN];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (i * 3) as u8;
    }
    CanonicalKey::from_bytes(bytes)
}

// ── Encoding shape ───────────────────────────────────────────────

#[test]
fn encode_produces_sixteen_groups_of_four() {
    let words = sample_key().to_words(Dictionary::embedded());
    let groups: Vec<&str> = words.split(' ').collect();
    assert_eq!(groups.len(), WORD_COUNT / GROUP_SIZE);
    for group in groups {
        assert_eq!(group.split('-').count(), GROUP_SIZE);
    }
}

#[test]
fn encode_uses_dictionary_order() {
    let key = CanonicalKey::from_bytes([0u8; KEY_LEN]);
    let words = key.to_words(Dictionary::embedded());
    let first = words.split(['-', ' ']).next().unwrap();
    assert_eq!(first, Dictionary::embedded().word(0));
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn word_roundtrip() {
    let key = sample_key();
    let dict = Dictionary::embedded();
    let words = key.to_words(dict);
    assert_eq!(CanonicalKey::from_words(&words, dict).unwrap(), key);
}

#[test]
fn decode_is_case_insensitive() {
    let key = sample_key();
    let dict = Dictionary::embedded();
    let lowered = key.to_words(dict).to_lowercase();
    assert_eq!(CanonicalKey::from_words(&lowered, dict).unwrap(), key);
}

#[test]
fn decode_accepts_hyphen_only_input() {
    let key = sample_key();
    let dict = Dictionary::embedded();
    let hyphenated = key.to_words(dict).replace(' ', "-");
    assert_eq!(CanonicalKey::from_words(&hyphenated, dict).unwrap(), key);
}

#[test]
fn decode_rejects_sixty_three_words() {
    let dict = Dictionary::embedded();
    let words = sample_key().to_words(dict);
    let truncated = words.rsplit_once('-').unwrap().0;
    assert!(matches!(
        CanonicalKey::from_words(truncated, dict),
        Err(KeyError::WordCount { expected: 64, actual: 63 })
    ));
}

#[test]
fn decode_rejects_sixty_five_words() {
    let dict = Dictionary::embedded();
    let mut words = sample_key().to_words(dict);
    words.push_str("-APPLE");
    assert!(matches!(
        CanonicalKey::from_words(&words, dict),
        Err(KeyError::WordCount { expected: 64, actual: 65 })
    ));
}

#[test]
fn decode_rejects_unknown_word() {
    let dict = Dictionary::embedded();
    let words = sample_key().to_words(dict);
    let (_, rest) = words.split_once('-').unwrap();
    let tampered = format!("QWERTYUIOP-{rest}");
    match CanonicalKey::from_words(&tampered, dict) {
        Err(KeyError::UnknownWord(word)) => assert_eq!(word, "QWERTYUIOP"),
        other => panic!("expected UnknownWord, got {other:?}"),
    }
}

// ── Dictionary loading ───────────────────────────────────────────

#[test]
fn embedded_dictionary_covers_every_byte() {
    let dict = Dictionary::embedded();
    for value in 0..=255u8 {
        let word = dict.word(value);
        assert_eq!(dict.value(word), Some(value), "word {word:?}");
    }
}

#[test]
fn parse_rejects_short_dictionary() {
    let source = "ALPHA\nBRAVO\nCHARLIE\n";
    assert!(matches!(
        Dictionary::parse(source),
        Err(KeyError::DictionaryTooSmall { required: 256, actual: 3 })
    ));
}

#[test]
fn parse_rejects_duplicate_words() {
    // 256 entries, but APPLE appears twice (case-insensitively).
    let mut lines: Vec<String> = (0..254).map(|i| format!("WORD{i}")).collect();
    lines.push("APPLE".to_string());
    lines.push("apple".to_string());
    let source = lines.join("\n");
    assert!(matches!(
        Dictionary::parse(&source),
        Err(KeyError::DuplicateWord { .. })
    ));
}

#[test]
fn parse_ignores_blank_lines() {
    let mut lines: Vec<String> = (0..256).map(|i| format!("WORD{i}")).collect();
    lines.insert(10, String::new());
    lines.insert(100, "   ".to_string());
    let dict = Dictionary::parse(&lines.join("\n")).unwrap();
    assert_eq!(dict.value("WORD0"), Some(0));
    assert_eq!(dict.value("WORD255"), Some(255));
}

#[test]
fn entries_past_the_code_page_are_ignored() {
    let mut lines: Vec<String> = (0..256).map(|i| format!("WORD{i}")).collect();
    lines.push("EXTRA".to_string());
    let dict = Dictionary::parse(&lines.join("\n")).unwrap();
    assert_eq!(dict.value("EXTRA"), None);
}

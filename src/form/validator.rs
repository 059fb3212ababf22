//! Field validation rules.
//!
//! Pure predicates over raw field text. The patterns and the domain
//! allow-list are business rules and are kept exactly as agreed.

use std::sync::LazyLock;

use regex::Regex;

/// Mail domains accepted by [`validate_email`].
pub const ALLOWED_EMAIL_DOMAINS: [&str; 6] = [
    "ya.ru",
    "yandex.ru",
    "yandex.ua",
    "yandex.by",
    "yandex.kz",
    "yandex.com",
];

/// Upper bound for the sum of all digits in a phone number.
pub const MAX_PHONE_DIGIT_SUM: u32 = 30;

// Astral-plane characters are accepted too: the ranges were written against
// UTF-16 code units, where those characters are surrogate pairs inside
// U+2800..U+FFFD.
static LETTERS_OR_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\x{00C0}-\x{1FFF}\x{2800}-\x{FFFD}\x{10000}-\x{10FFFF} ]*$")
        .expect("letters pattern is valid")
});

static THREE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+ \S+ \S+$").expect("three words pattern is valid"));

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[^@]+$").expect("email pattern is valid")
});

static PHONE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+7\([0-9]{3}\)[0-9]{3}-[0-9]{2}-[0-9]{2}$").expect("phone pattern is valid")
});

/// Surname, given name and patronymic: three words of letters separated by
/// single spaces.
pub fn validate_fio(text: &str) -> bool {
    LETTERS_OR_SPACES.is_match(text) && THREE_WORDS.is_match(text)
}

/// `local@domain` where the domain is one of [`ALLOWED_EMAIL_DOMAINS`].
pub fn validate_email(text: &str) -> bool {
    EMAIL_SHAPE.is_match(text)
        && ALLOWED_EMAIL_DOMAINS
            .iter()
            .any(|domain| text.ends_with(&format!("@{domain}")))
}

/// `+7(DDD)DDD-DD-DD` whose digits add up to at most [`MAX_PHONE_DIGIT_SUM`].
pub fn validate_phone(text: &str) -> bool {
    PHONE_SHAPE.is_match(text) && digit_sum(text) <= MAX_PHONE_DIGIT_SUM
}

fn digit_sum(text: &str) -> u32 {
    text.chars().filter_map(|c| c.to_digit(10)).sum()
}

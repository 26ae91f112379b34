use std::sync::LazyLock;

use regex::Regex;

use crate::task::Kwargs;

/// Registry name of the credit card callable.
pub const NAME: &str = "credit_card";

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{4}[ -]){3}\d{1,4}\b|\b\d{13,19}\b")
        .expect("credit card candidate pattern should compile")
});

/// Card-number candidates that pass the Luhn checksum.
pub fn find(text: &str, _kwargs: &Kwargs) -> Vec<String> {
    CANDIDATE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| luhn_valid(s))
        .map(String::from)
        .collect()
}

/// Luhn checksum over the digits of `number`, ignoring separators.
pub fn luhn_valid(number: &str) -> bool {
    let mut sum = 0;
    let mut count = 0;
    for (i, d) in number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
    {
        let v = if i % 2 == 1 {
            let doubled = d * 2;
            if doubled > 9 {
                doubled - 9
            } else {
                doubled
            }
        } else {
            d
        };
        sum += v;
        count += 1;
    }
    count >= 13 && sum % 10 == 0
}

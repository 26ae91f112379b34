use std::sync::LazyLock;

use regex::Regex;

use crate::task::Kwargs;

/// Registry name of the Spanish DNI callable.
pub const NAME: &str = "es_dni";

const LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{8})-?([A-Z])\b").expect("dni candidate pattern should compile")
});

/// DNI candidates whose check letter matches the number.
pub fn find(text: &str, _kwargs: &Kwargs) -> Vec<String> {
    CANDIDATE
        .captures_iter(text)
        .filter(|caps| {
            let Ok(number) = caps[1].parse::<u32>() else {
                return false;
            };
            caps[2].as_bytes()[0] == LETTERS[(number % 23) as usize]
        })
        .map(|caps| caps[0].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_letter() {
        let text = "DNI 12345678Z y 12345678-A, también 00000000T";
        assert_eq!(find(text, &Kwargs::new()), vec!["12345678Z", "00000000T"]);
    }
}

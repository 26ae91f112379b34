use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::task::{EntityIter, StructuredTask, TaskArgs};

/// Registry name of the IBAN structured task.
pub const NAME: &str = "iban";

static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2}\d{2}(?: ?[A-Z0-9]{4}){2,7}(?: ?[A-Z0-9]{1,3})?\b")
        .expect("iban candidate pattern should compile")
});

/// Bank account numbers in IBAN format, printed compact or in groups of
/// four.
pub struct IbanTask {
    args: TaskArgs,
}

impl IbanTask {
    pub fn build(args: &TaskArgs) -> Result<Box<dyn StructuredTask>> {
        Ok(Box::new(Self { args: args.clone() }))
    }
}

impl StructuredTask for IbanTask {
    fn find<'a>(&'a self, text: &'a str, chunk_id: &'a str) -> Result<EntityIter<'a>> {
        Ok(Box::new(
            CANDIDATE
                .find_iter(text)
                .filter(|m| iban_valid(m.as_str()))
                .map(move |m| self.args.entity(m.as_str(), chunk_id, m.start())),
        ))
    }

    fn type_name(&self) -> &str {
        NAME
    }
}

/// ISO 13616 check: move the first four characters to the end, map letters
/// to 10..35 and require the number to be 1 modulo 97.
pub fn iban_valid(iban: &str) -> bool {
    let compact: String = iban.chars().filter(|c| !c.is_whitespace()).collect();
    if !compact.is_ascii() || !(15..=34).contains(&compact.len()) {
        return false;
    }
    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut rem: u32 = 0;
    for c in rearranged {
        let Some(v) = c.to_digit(36) else {
            return false;
        };
        rem = if v >= 10 { (rem * 100 + v) % 97 } else { (rem * 10 + v) % 97 };
    }
    rem == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PiiCategory;

    #[test]
    fn test_iban_checksum() {
        assert!(iban_valid("GB82 WEST 1234 5698 7654 32"));
        assert!(iban_valid("DE89370400440532013000"));
        assert!(!iban_valid("GB83 WEST 1234 5698 7654 32"));
    }

    #[test]
    fn test_task_finds_grouped_iban() {
        let args = TaskArgs::new(PiiCategory::BankAccount, "*", None, "iban", "iban");
        let task = IbanTask::build(&args).unwrap();
        let text = "pay GB82 WEST 1234 5698 7654 32 now";
        let found: Vec<_> = task.find(text, "c").unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "GB82 WEST 1234 5698 7654 32");
        assert_eq!(found[0].pos, 4);
        assert_eq!(found[0].category, PiiCategory::BankAccount);
    }
}

//! Built-in detector definitions.
//!
//! These are detector content rather than engine: a small, illustrative set
//! covering every implementation kind and every specificity level.

pub mod bitcoin;
pub mod credit_card;
pub mod es_dni;
pub mod iban;

use std::sync::Arc;

use serde_json::json;

use crate::category::PiiCategory;
use crate::definition::{DetectorDefinition, LANG_ANY};
use crate::task::{StructuredCtor, TaskRegistry};

const EMAIL_PATTERN: &str = r"[\w\.=-]+ @ [\w\.-]+ \. [\w]{2,3}";

const IPV4_PATTERN: &str = r"
    \b
    (?: (?: 25[0-5] | 2[0-4]\d | 1\d\d | [1-9]?\d ) \. ){3}
    (?: 25[0-5] | 2[0-4]\d | 1\d\d | [1-9]?\d )
    \b";

const PHONE_EN_PATTERN: &str = r"
    (?: \(\d{3}\)\x20? | \b\d{3}[\x20.-]? )
    \d{3} [\x20.-] \d{4}
    \b";

const SSN_US_PATTERN: &str = r"\b \d{3} - \d{2} - \d{4} \b";

const SIN_CA_PATTERN: &str = r"\b \d{3} [\x20-] \d{3} [\x20-] \d{3} \b";

/// Register the built-in callables and structured task types.
pub fn register(registry: &mut TaskRegistry) {
    registry.register_callable(credit_card::NAME, credit_card::find);
    registry.register_callable(bitcoin::NAME, bitcoin::find);
    registry.register_callable(es_dni::NAME, es_dni::find);
    registry.register_structured(iban::NAME, iban::IbanTask::build);
}

/// The built-in definitions.
pub fn definitions() -> Vec<DetectorDefinition> {
    let iban_ctor: StructuredCtor = Arc::new(iban::IbanTask::build);
    vec![
        DetectorDefinition::pattern(PiiCategory::EmailAddress, LANG_ANY, EMAIL_PATTERN)
            .with_name("email address")
            .with_doc("Email address"),
        DetectorDefinition::pattern(PiiCategory::IpAddress, LANG_ANY, IPV4_PATTERN)
            .with_name("ipv4 address")
            .with_doc("IPv4 address in dotted-quad notation"),
        DetectorDefinition::callable(
            PiiCategory::CreditCard,
            LANG_ANY,
            credit_card::NAME,
            Arc::new(credit_card::find),
        )
        .with_name("credit card")
        .with_doc("Credit card number, validated with the Luhn checksum"),
        DetectorDefinition::callable(
            PiiCategory::BitcoinAddress,
            LANG_ANY,
            bitcoin::NAME,
            Arc::new(bitcoin::find),
        )
        .with_name("bitcoin address")
        .with_doc("Legacy/P2SH bitcoin address, validated with Base58Check"),
        DetectorDefinition::structured(PiiCategory::BankAccount, LANG_ANY, iban::NAME, iban_ctor)
            .with_name("iban")
            .with_doc("International bank account number, validated with mod-97"),
        DetectorDefinition::pattern(PiiCategory::PhoneNumber, "en", PHONE_EN_PATTERN)
            .with_name("phone number")
            .with_doc("North American style phone number, needs a nearby keyword")
            .with_context(json!({
                "value": ["phone", "call", "tel", "telephone", "mobile", "cell", "fax"],
                "width": [32, 16],
            })),
        DetectorDefinition::pattern(PiiCategory::GovId, "en", SSN_US_PATTERN)
            .with_country("us")
            .with_name("us social security number")
            .with_doc("US Social Security Number")
            .with_context(json!(["ssn", "social security"])),
        DetectorDefinition::pattern(PiiCategory::GovId, "en", SIN_CA_PATTERN)
            .with_country("ca")
            .with_name("canadian social insurance number")
            .with_doc("Canadian Social Insurance Number")
            .with_context(json!(["sin", "social insurance"])),
        DetectorDefinition::callable(PiiCategory::GovId, "es", es_dni::NAME, Arc::new(es_dni::find))
            .with_country("es")
            .with_name("spanish dni")
            .with_doc("Spanish DNI, validated with its check letter"),
    ]
}

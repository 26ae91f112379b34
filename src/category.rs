use serde::{Deserialize, Serialize};

/// The closed set of PII categories known to the engine.
///
/// The discriminant is the stable ordering value: tasks run in ascending
/// order of it, and externally supplied definitions must name one of these
/// variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum PiiCategory {
    Person = 1,
    Age = 2,
    BirthDate = 3,
    DeathDate = 4,
    Date = 5,
    Location = 6,
    StreetAddress = 7,
    Norp = 8,
    Occupation = 9,
    EmailAddress = 10,
    PhoneNumber = 11,
    Url = 12,
    Username = 13,
    Password = 14,
    CreditCard = 15,
    BankAccount = 16,
    IpAddress = 17,
    GovId = 18,
    TaxId = 19,
    HealthId = 20,
    LicensePlate = 21,
    BitcoinAddress = 22,
    Other = 23,
}

impl PiiCategory {
    pub const ALL: [PiiCategory; 23] = [
        PiiCategory::Person,
        PiiCategory::Age,
        PiiCategory::BirthDate,
        PiiCategory::DeathDate,
        PiiCategory::Date,
        PiiCategory::Location,
        PiiCategory::StreetAddress,
        PiiCategory::Norp,
        PiiCategory::Occupation,
        PiiCategory::EmailAddress,
        PiiCategory::PhoneNumber,
        PiiCategory::Url,
        PiiCategory::Username,
        PiiCategory::Password,
        PiiCategory::CreditCard,
        PiiCategory::BankAccount,
        PiiCategory::IpAddress,
        PiiCategory::GovId,
        PiiCategory::TaxId,
        PiiCategory::HealthId,
        PiiCategory::LicensePlate,
        PiiCategory::BitcoinAddress,
        PiiCategory::Other,
    ];

    /// Stable ordering value.
    pub fn ordinal(self) -> u16 {
        self as u16
    }

    /// Canonical upper-case name, as used in definition batches and counters.
    pub fn name(self) -> &'static str {
        match self {
            PiiCategory::Person => "PERSON",
            PiiCategory::Age => "AGE",
            PiiCategory::BirthDate => "BIRTH_DATE",
            PiiCategory::DeathDate => "DEATH_DATE",
            PiiCategory::Date => "DATE",
            PiiCategory::Location => "LOCATION",
            PiiCategory::StreetAddress => "STREET_ADDRESS",
            PiiCategory::Norp => "NORP",
            PiiCategory::Occupation => "OCCUPATION",
            PiiCategory::EmailAddress => "EMAIL_ADDRESS",
            PiiCategory::PhoneNumber => "PHONE_NUMBER",
            PiiCategory::Url => "URL",
            PiiCategory::Username => "USERNAME",
            PiiCategory::Password => "PASSWORD",
            PiiCategory::CreditCard => "CREDIT_CARD",
            PiiCategory::BankAccount => "BANK_ACCOUNT",
            PiiCategory::IpAddress => "IP_ADDRESS",
            PiiCategory::GovId => "GOV_ID",
            PiiCategory::TaxId => "TAX_ID",
            PiiCategory::HealthId => "HEALTH_ID",
            PiiCategory::LicensePlate => "LICENSE_PLATE",
            PiiCategory::BitcoinAddress => "BITCOIN_ADDRESS",
            PiiCategory::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PiiCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        PiiCategory::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| format!("unknown pii category: {s}"))
    }
}

// crates/atlas-core/src/alias.rs
use std::collections::HashMap;

/// Alpha-3 codes callers commonly send in place of alpha-2.
const COMMON_ALPHA3: &[(&str, &str)] = &[
    ("USA", "US"),
    ("GBR", "GB"),
    ("DEU", "DE"),
    ("FRA", "FR"),
    ("ITA", "IT"),
    ("ESP", "ES"),
    ("CAN", "CA"),
    ("AUS", "AU"),
    ("JPN", "JP"),
    ("CHN", "CN"),
    ("IND", "IN"),
    ("BRA", "BR"),
    ("MEX", "MX"),
    ("RUS", "RU"),
    ("KOR", "KR"),
    ("NLD", "NL"),
    ("CHE", "CH"),
    ("SWE", "SE"),
    ("NOR", "NO"),
    ("DNK", "DK"),
    ("FIN", "FI"),
    ("POL", "PL"),
    ("AUT", "AT"),
    ("BEL", "BE"),
    ("IRL", "IE"),
    ("PRT", "PT"),
    ("NZL", "NZ"),
    ("ZAF", "ZA"),
];

/// Fixed 3→2 letter code mapping applied before exact code lookup.
///
/// Keys and values are stored uppercase; [`AliasTable::lookup`] uppercases
/// its argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// The built-in table of common alpha-3 codes.
    pub fn common() -> Self {
        Self::from_pairs(COMMON_ALPHA3.iter().copied())
    }

    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| {
                (
                    k.as_ref().trim().to_uppercase(),
                    v.as_ref().trim().to_uppercase(),
                )
            })
            .collect();
        Self { map }
    }

    pub fn lookup(&self, alpha3: &str) -> Option<&str> {
        self.map.get(&alpha3.trim().to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::common()
    }
}

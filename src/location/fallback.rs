//! Embedded last-resort location table, used when both the cache and the
//! remote geo-data provider are unavailable. Deliberately small: well-known
//! countries and a handful of major cities each.

pub struct FallbackCountry {
    pub code: &'static str,
    pub name: &'static str,
    pub cities: &'static [&'static str],
}

pub static FALLBACK_COUNTRIES: &[FallbackCountry] = &[
    FallbackCountry {
        code: "US",
        name: "United States",
        cities: &[
            "New York",
            "Los Angeles",
            "Chicago",
            "Houston",
            "Phoenix",
            "San Francisco",
            "Seattle",
            "Miami",
        ],
    },
    FallbackCountry {
        code: "GB",
        name: "United Kingdom",
        cities: &["London", "Manchester", "Birmingham", "Leeds", "Glasgow"],
    },
    FallbackCountry {
        code: "CA",
        name: "Canada",
        cities: &["Toronto", "Vancouver", "Montreal", "Calgary", "Ottawa"],
    },
    FallbackCountry {
        code: "AU",
        name: "Australia",
        cities: &["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide"],
    },
    FallbackCountry {
        code: "PH",
        name: "Philippines",
        cities: &["Manila", "Quezon City", "Cebu City", "Davao City", "Makati"],
    },
    FallbackCountry {
        code: "IN",
        name: "India",
        cities: &["Mumbai", "Delhi", "Bengaluru", "Chennai", "Hyderabad"],
    },
    FallbackCountry {
        code: "DE",
        name: "Germany",
        cities: &["Berlin", "Munich", "Hamburg", "Frankfurt", "Cologne"],
    },
    FallbackCountry {
        code: "FR",
        name: "France",
        cities: &["Paris", "Lyon", "Marseille", "Toulouse", "Nice"],
    },
    FallbackCountry {
        code: "SG",
        name: "Singapore",
        cities: &["Singapore"],
    },
    FallbackCountry {
        code: "JP",
        name: "Japan",
        cities: &["Tokyo", "Osaka", "Nagoya", "Fukuoka", "Sapporo"],
    },
];

/// Looks a country up by ISO code or English name, case-insensitively.
pub fn lookup(country: &str) -> Option<&'static FallbackCountry> {
    let needle = country.trim();
    FALLBACK_COUNTRIES.iter().find(|candidate| {
        candidate.code.eq_ignore_ascii_case(needle) || candidate.name.eq_ignore_ascii_case(needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_by_code_and_name() {
        assert_eq!(lookup("PH").unwrap().name, "Philippines");
        assert_eq!(lookup("philippines").unwrap().code, "PH");
        assert!(lookup("Atlantis").is_none());
    }

    #[test]
    fn philippines_fallback_contains_cebu() {
        assert!(lookup("PH").unwrap().cities.contains(&"Cebu City"));
    }
}

//! Closed set of region codes found in the Eurostat life expectancy extract.
//!
//! Codes are ISO-3166 derived, with Eurostat's own conventions where they
//! differ (`EL` for Greece, `UK` for the United Kingdom) plus regional
//! aggregates such as `EU27_2020`.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownRegionError;

macro_rules! regions {
    ($($variant:ident => $code:literal, $name:literal;)+) => {
        /// A region accepted by the region filter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Region {
            $(
                #[doc = $name]
                $variant,
            )+
        }

        impl Region {
            /// Every region, in declaration order.
            pub const ALL: &'static [Region] = &[$(Region::$variant),+];

            /// Canonical (uppercase) code as used in the source data.
            pub fn code(&self) -> &'static str {
                match self {
                    $(Region::$variant => $code,)+
                }
            }

            /// English display name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Region::$variant => $name,)+
                }
            }
        }
    };
}

regions! {
    Albania => "AL", "Albania";
    Armenia => "AM", "Armenia";
    Austria => "AT", "Austria";
    Azerbaijan => "AZ", "Azerbaijan";
    Belgium => "BE", "Belgium";
    Bulgaria => "BG", "Bulgaria";
    Belarus => "BY", "Belarus";
    Switzerland => "CH", "Switzerland";
    Cyprus => "CY", "Cyprus";
    Czechia => "CZ", "Czechia";
    Germany => "DE", "Germany";
    GermanyIncludingFormerGdr => "DE_TOT", "Germany including former GDR";
    Denmark => "DK", "Denmark";
    EuroArea18 => "EA18", "Euro area (18 countries)";
    EuroArea19 => "EA19", "Euro area (19 countries)";
    Estonia => "EE", "Estonia";
    Eea30From2007 => "EEA30_2007", "European Economic Area (EU27 2007-2013 and IS, LI, NO)";
    Eea31 => "EEA31", "European Economic Area (EU28 and IS, LI, NO)";
    Efta => "EFTA", "European Free Trade Association";
    Greece => "EL", "Greece";
    Spain => "ES", "Spain";
    Eu27From2007 => "EU27_2007", "European Union (27 countries, 2007-2013)";
    Eu27From2020 => "EU27_2020", "European Union (27 countries, from 2020)";
    Eu28 => "EU28", "European Union (28 countries)";
    Finland => "FI", "Finland";
    France => "FR", "France";
    MetropolitanFrance => "FX", "France (metropolitan)";
    Georgia => "GE", "Georgia";
    Croatia => "HR", "Croatia";
    Hungary => "HU", "Hungary";
    Ireland => "IE", "Ireland";
    Iceland => "IS", "Iceland";
    Italy => "IT", "Italy";
    Liechtenstein => "LI", "Liechtenstein";
    Lithuania => "LT", "Lithuania";
    Luxembourg => "LU", "Luxembourg";
    Latvia => "LV", "Latvia";
    Moldova => "MD", "Moldova";
    Montenegro => "ME", "Montenegro";
    NorthMacedonia => "MK", "North Macedonia";
    Malta => "MT", "Malta";
    Netherlands => "NL", "Netherlands";
    Norway => "NO", "Norway";
    Poland => "PL", "Poland";
    Portugal => "PT", "Portugal";
    Romania => "RO", "Romania";
    Serbia => "RS", "Serbia";
    Russia => "RU", "Russia";
    Sweden => "SE", "Sweden";
    Slovenia => "SI", "Slovenia";
    Slovakia => "SK", "Slovakia";
    SanMarino => "SM", "San Marino";
    Turkey => "TR", "Türkiye";
    Ukraine => "UA", "Ukraine";
    UnitedKingdom => "UK", "United Kingdom";
    Kosovo => "XK", "Kosovo";
}

impl Region {
    /// Look up a region by its canonical code.
    ///
    /// Matching is exact: `"pt"` and `" PT"` are not members.
    pub fn from_code(code: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Membership check against the enumeration.
    pub fn is_valid_code(code: &str) -> bool {
        Region::from_code(code).is_some()
    }

    /// True for single countries (two-letter codes), false for aggregates.
    pub fn is_country(&self) -> bool {
        self.code().len() == 2
    }

    /// All single-country regions, aggregates excluded.
    pub fn countries() -> Vec<Region> {
        Region::ALL.iter().copied().filter(Region::is_country).collect()
    }

    /// Lower-cased code, used to name output files.
    pub fn file_stem(&self) -> String {
        self.code().to_ascii_lowercase()
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::Portugal
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = UnknownRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_code(s).ok_or_else(|| UnknownRegionError {
            code: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countries_are_two_letter_codes() {
        let countries = Region::countries();
        assert!(!countries.is_empty());
        assert!(countries.iter().all(|c| c.code().len() == 2));
        assert!(!countries.contains(&Region::Eu27From2020));
    }

    #[test]
    fn test_parse_known_codes() {
        assert_eq!("PT".parse::<Region>(), Ok(Region::Portugal));
        assert_eq!("EU27_2020".parse::<Region>(), Ok(Region::Eu27From2020));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "pt".parse::<Region>().unwrap_err();
        assert_eq!(err.code, "pt");
        assert!(!Region::is_valid_code("Pt"));
    }

    #[test]
    fn test_unknown_code() {
        assert!("ZZ".parse::<Region>().is_err());
        assert!(!Region::is_valid_code(""));
    }

    #[test]
    fn test_codes_are_unique_and_uppercase() {
        let mut codes: Vec<&str> = Region::ALL.iter().map(Region::code).collect();
        assert!(codes.iter().all(|c| c.to_ascii_uppercase() == *c));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Region::ALL.len());
    }

    #[test]
    fn test_default_and_file_stem() {
        assert_eq!(Region::default(), Region::Portugal);
        assert_eq!(Region::Eu27From2020.file_stem(), "eu27_2020");
    }
}

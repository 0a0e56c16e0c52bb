//! Static region lookup data.
//!
//! FIPS state codes mapped to display names and postal abbreviations,
//! covering the 50 states, DC, and the surveyed territories. Read-only for
//! the life of the process.

/// One entry in the region table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub fips: u32,
    pub name: &'static str,
    pub abbrev: &'static str,
}

/// FIPS codes of surveyed territories (Guam, Puerto Rico, U.S. Virgin
/// Islands). Excluded from the 50-states-plus-DC merge set.
const TERRITORY_FIPS: &[u32] = &[66, 72, 78];

/// Territory display names as they appear in registry exports.
pub const TERRITORY_NAMES: &[&str] = &[
    "Puerto Rico",
    "Guam",
    "American Samoa",
    "Commonwealth of the Northern Mariana Islands",
    "Virgin Islands",
    "U.S. Virgin Islands",
];

pub static REGIONS: &[Region] = &[
    Region { fips: 1, name: "Alabama", abbrev: "AL" },
    Region { fips: 2, name: "Alaska", abbrev: "AK" },
    Region { fips: 4, name: "Arizona", abbrev: "AZ" },
    Region { fips: 5, name: "Arkansas", abbrev: "AR" },
    Region { fips: 6, name: "California", abbrev: "CA" },
    Region { fips: 8, name: "Colorado", abbrev: "CO" },
    Region { fips: 9, name: "Connecticut", abbrev: "CT" },
    Region { fips: 10, name: "Delaware", abbrev: "DE" },
    Region { fips: 11, name: "District of Columbia", abbrev: "DC" },
    Region { fips: 12, name: "Florida", abbrev: "FL" },
    Region { fips: 13, name: "Georgia", abbrev: "GA" },
    Region { fips: 15, name: "Hawaii", abbrev: "HI" },
    Region { fips: 16, name: "Idaho", abbrev: "ID" },
    Region { fips: 17, name: "Illinois", abbrev: "IL" },
    Region { fips: 18, name: "Indiana", abbrev: "IN" },
    Region { fips: 19, name: "Iowa", abbrev: "IA" },
    Region { fips: 20, name: "Kansas", abbrev: "KS" },
    Region { fips: 21, name: "Kentucky", abbrev: "KY" },
    Region { fips: 22, name: "Louisiana", abbrev: "LA" },
    Region { fips: 23, name: "Maine", abbrev: "ME" },
    Region { fips: 24, name: "Maryland", abbrev: "MD" },
    Region { fips: 25, name: "Massachusetts", abbrev: "MA" },
    Region { fips: 26, name: "Michigan", abbrev: "MI" },
    Region { fips: 27, name: "Minnesota", abbrev: "MN" },
    Region { fips: 28, name: "Mississippi", abbrev: "MS" },
    Region { fips: 29, name: "Missouri", abbrev: "MO" },
    Region { fips: 30, name: "Montana", abbrev: "MT" },
    Region { fips: 31, name: "Nebraska", abbrev: "NE" },
    Region { fips: 32, name: "Nevada", abbrev: "NV" },
    Region { fips: 33, name: "New Hampshire", abbrev: "NH" },
    Region { fips: 34, name: "New Jersey", abbrev: "NJ" },
    Region { fips: 35, name: "New Mexico", abbrev: "NM" },
    Region { fips: 36, name: "New York", abbrev: "NY" },
    Region { fips: 37, name: "North Carolina", abbrev: "NC" },
    Region { fips: 38, name: "North Dakota", abbrev: "ND" },
    Region { fips: 39, name: "Ohio", abbrev: "OH" },
    Region { fips: 40, name: "Oklahoma", abbrev: "OK" },
    Region { fips: 41, name: "Oregon", abbrev: "OR" },
    Region { fips: 42, name: "Pennsylvania", abbrev: "PA" },
    Region { fips: 44, name: "Rhode Island", abbrev: "RI" },
    Region { fips: 45, name: "South Carolina", abbrev: "SC" },
    Region { fips: 46, name: "South Dakota", abbrev: "SD" },
    Region { fips: 47, name: "Tennessee", abbrev: "TN" },
    Region { fips: 48, name: "Texas", abbrev: "TX" },
    Region { fips: 49, name: "Utah", abbrev: "UT" },
    Region { fips: 50, name: "Vermont", abbrev: "VT" },
    Region { fips: 51, name: "Virginia", abbrev: "VA" },
    Region { fips: 53, name: "Washington", abbrev: "WA" },
    Region { fips: 54, name: "West Virginia", abbrev: "WV" },
    Region { fips: 55, name: "Wisconsin", abbrev: "WI" },
    Region { fips: 56, name: "Wyoming", abbrev: "WY" },
    Region { fips: 66, name: "Guam", abbrev: "GU" },
    Region { fips: 72, name: "Puerto Rico", abbrev: "PR" },
    Region { fips: 78, name: "U.S. Virgin Islands", abbrev: "VI" },
];

/// Looks up a region by FIPS code. Unknown codes return `None`; callers keep
/// the row and leave name/abbreviation blank.
pub fn region_for(fips: u32) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.fips == fips)
}

/// Looks up a postal abbreviation by full state name.
pub fn abbrev_for_name(name: &str) -> Option<&'static str> {
    REGIONS.iter().find(|r| r.name == name).map(|r| r.abbrev)
}

/// Abbreviations of the 50 states plus DC, the key set for the combined
/// summary.
pub fn state_abbrevs() -> Vec<&'static str> {
    REGIONS
        .iter()
        .filter(|r| !TERRITORY_FIPS.contains(&r.fips))
        .map(|r| r.abbrev)
        .collect()
}

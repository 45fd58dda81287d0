//! New Mexico sales regions.
//!
//! Maps city names to one of five sales territories. Cities that do not
//! appear in any territory fall into [`OTHER_REGION`].

/// Region assigned to cities outside every named territory.
pub const OTHER_REGION: &str = "Other";

/// Region assigned when no city name is available.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Named territories and their member cities.
pub const REGIONS: &[(&str, &[&str])] = &[
    (
        "Northern New Mexico",
        &[
            "Santa Fe",
            "Los Alamos",
            "Taos",
            "Espanola",
            "Las Vegas",
            "White Rock",
            "Alcalde",
            "El Prado",
            "Taos Ski Valley",
            "Questa",
            "Red River",
            "Angel Fire",
            "Chama",
            "Raton",
            "Eagle Nest",
            "Mora",
            "Picuris Pueblo",
        ],
    ),
    (
        "Central New Mexico",
        &[
            "Albuquerque",
            "Albquerque",
            "Rio Rancho",
            "Bernalillo",
            "Los Lunas",
            "Belen",
            "Bosque Farms",
            "Corrales",
            "Los Ranchos",
            "Placitas",
            "Cedar Crest",
            "Edgewood",
            "Moriarty",
            "Estancia",
            "Madrid",
            "Peralta",
            "Rio Communities",
            "Pena Blanca",
            "San Ysidro",
        ],
    ),
    (
        "Southern New Mexico",
        &[
            "Las Cruces",
            "Roswell",
            "Carlsbad",
            "Alamogordo",
            "Mesilla",
            "Mesilla Park",
            "Anthony",
            "Santa Teresa",
            "Sunland Park",
            "Hatch",
            "Arrey",
            "Truth or Consequences",
            "Elephant Butte",
            "Silver City",
            "Deming",
            "Columbus",
            "Lordsburg",
            "Bayard",
            "San Lorenzo",
            "Vado",
            "Tularosa",
            "Cloudcroft",
            "Ruidoso",
            "Ruidoso Downs",
            "Carrizozo",
            "Capitan",
            "Alto",
            "Lovington",
            "Hobbs",
            "Artesia",
            "Eunice",
            "Jal",
            "Loving",
            "Tatum",
        ],
    ),
    (
        "Western New Mexico",
        &[
            "Farmington",
            "Gallup",
            "Grants",
            "Aztec",
            "Bloomfield",
            "Kirtland",
            "Cuba",
            "Milan",
            "Socorro",
            "Yah Ta Hey",
            "Jemez Springs",
        ],
    ),
    (
        "Eastern New Mexico",
        &[
            "Clovis",
            "Portales",
            "Tucumcari",
            "Fort Sumner",
            "Santa Rosa",
            "Logan",
            "Clayton",
            "Vaughn",
            "Texico",
            "Glenrio",
            "Rodeo",
            "Timberon",
        ],
    ),
];

/// Substring guesses for city names that are not listed verbatim.
///
/// Matching is case-sensitive except for the `ABQ` abbreviation.
const GUESSES: &[(&str, &str)] = &[
    ("Albuquerque", "Central New Mexico"),
    ("Santa Fe", "Northern New Mexico"),
    ("Las Cruces", "Southern New Mexico"),
    ("Farmington", "Western New Mexico"),
];

/// Returns the region for a city.
///
/// Exact (trimmed) membership wins; otherwise a handful of major-city
/// substrings are tried before falling back to [`OTHER_REGION`]. A blank
/// city yields [`UNKNOWN_REGION`].
#[must_use]
pub fn region_for_city(city: &str) -> &'static str {
    let city = city.trim();
    if city.is_empty() {
        return UNKNOWN_REGION;
    }

    for (region, cities) in REGIONS {
        if cities.contains(&city) {
            return *region;
        }
    }

    if city.to_uppercase().contains("ABQ") {
        return "Central New Mexico";
    }

    GUESSES
        .iter()
        .find(|(needle, _)| city.contains(needle))
        .map_or(OTHER_REGION, |(_, region)| *region)
}

/// Returns the named regions in display order.
#[must_use]
pub fn all_regions() -> Vec<&'static str> {
    REGIONS.iter().map(|(name, _)| *name).collect()
}

/// Returns the named regions followed by [`OTHER_REGION`].
#[must_use]
pub fn all_regions_with_other() -> Vec<&'static str> {
    let mut regions = all_regions();
    regions.push(OTHER_REGION);
    regions
}

/// Returns the member cities of a region, or an empty slice.
#[must_use]
pub fn cities_in_region(region: &str) -> &'static [&'static str] {
    REGIONS
        .iter()
        .find(|(name, _)| *name == region)
        .map_or(&[][..], |(_, cities)| *cities)
}

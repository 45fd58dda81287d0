//! City centroid reference table.
//!
//! Approximate town-center coordinates for the places retail locations
//! are reported in. Lookups are by exact city name as it appears in the
//! sales data, so known misspellings are listed alongside the correct
//! spelling.

use std::collections::BTreeMap;

use dispo_map_sales_models::Coordinate;

/// `(city, lat, lng)` for every known place.
pub const CITY_CENTROIDS: &[(&str, f64, f64)] = &[
    // ── Northern ──────────────────────────────────────────────────────
    ("Santa Fe", 35.6870, -105.9378),
    ("Los Alamos", 35.8881, -106.3070),
    ("Taos", 36.4072, -105.5731),
    ("Espanola", 35.9911, -106.0806),
    ("Las Vegas", 35.5939, -105.2239),
    ("White Rock", 35.8253, -106.2139),
    ("Alcalde", 36.0889, -106.0553),
    ("El Prado", 36.4364, -105.5767),
    ("Taos Ski Valley", 36.5958, -105.4536),
    ("Questa", 36.7039, -105.5950),
    ("Red River", 36.7081, -105.4069),
    ("Angel Fire", 36.3931, -105.2850),
    ("Chama", 36.9030, -106.5792),
    ("Raton", 36.9034, -104.4391),
    ("Eagle Nest", 36.5547, -105.2636),
    ("Mora", 35.9742, -105.3300),
    ("Picuris Pueblo", 36.2003, -105.7064),
    ("Ranchos de Taos", 36.3586, -105.6097),
    // ── Central ───────────────────────────────────────────────────────
    ("Albuquerque", 35.0844, -106.6504),
    ("Albquerque", 35.0844, -106.6504),
    ("Rio Rancho", 35.2328, -106.6630),
    ("Bernalillo", 35.3000, -106.5511),
    ("Los Lunas", 34.8062, -106.7334),
    ("Belen", 34.6628, -106.7764),
    ("Bosque Farms", 34.8548, -106.7053),
    ("Corrales", 35.2378, -106.6067),
    ("Los Ranchos", 35.1620, -106.6425),
    ("Placitas", 35.3069, -106.4245),
    ("Cedar Crest", 35.1086, -106.3700),
    ("Edgewood", 35.0614, -106.1914),
    ("Moriarty", 34.9900, -106.0492),
    ("Estancia", 34.7584, -106.0558),
    ("Madrid", 35.4050, -106.1531),
    ("Peralta", 34.8370, -106.6906),
    ("Rio Communities", 34.6434, -106.7334),
    ("Pena Blanca", 35.5756, -106.3331),
    ("San Ysidro", 35.5592, -106.7731),
    ("Tijeras", 35.0867, -106.3847),
    ("Sandia Park", 35.1631, -106.3700),
    // ── Southern ──────────────────────────────────────────────────────
    ("Las Cruces", 32.3199, -106.7637),
    ("Roswell", 33.3943, -104.5230),
    ("Carlsbad", 32.4207, -104.2288),
    ("Alamogordo", 32.8995, -105.9603),
    ("Mesilla", 32.2740, -106.8011),
    ("Mesilla Park", 32.2765, -106.7733),
    ("Anthony", 32.0040, -106.6058),
    ("Santa Teresa", 31.8559, -106.6391),
    ("Sunland Park", 31.7965, -106.5799),
    ("Hatch", 32.6654, -107.1536),
    ("Arrey", 32.8487, -107.3217),
    ("Truth or Consequences", 33.1284, -107.2528),
    ("Elephant Butte", 33.1906, -107.2236),
    ("Silver City", 32.7701, -108.2803),
    ("Deming", 32.2687, -107.7586),
    ("Columbus", 31.8276, -107.6400),
    ("Lordsburg", 32.3504, -108.7087),
    ("Bayard", 32.7617, -108.1306),
    ("San Lorenzo", 32.8089, -107.9222),
    ("Vado", 32.1118, -106.6622),
    ("Tularosa", 33.0740, -106.0186),
    ("Cloudcroft", 32.9573, -105.7428),
    ("Ruidoso", 33.3317, -105.6731),
    ("Ruidoso Downs", 33.3290, -105.6103),
    ("Carrizozo", 33.6418, -105.8772),
    ("Capitan", 33.5454, -105.5722),
    ("Alto", 33.3920, -105.6800),
    ("Lovington", 32.9440, -103.3486),
    ("Hobbs", 32.7026, -103.1360),
    ("Artesia", 32.8423, -104.4033),
    ("Eunice", 32.4373, -103.1591),
    ("Jal", 32.1132, -103.1938),
    ("Loving", 32.2859, -104.0955),
    ("Tatum", 33.2571, -103.3177),
    // ── Western ───────────────────────────────────────────────────────
    ("Farmington", 36.7281, -108.2187),
    ("Gallup", 35.5281, -108.7426),
    ("Grants", 35.1473, -107.8514),
    ("Aztec", 36.8222, -107.9929),
    ("Bloomfield", 36.7111, -107.9845),
    ("Kirtland", 36.7342, -108.3590),
    ("Cuba", 36.0222, -106.9587),
    ("Milan", 35.1698, -107.8906),
    ("Socorro", 34.0584, -106.8914),
    ("Yah Ta Hey", 35.6336, -108.7842),
    ("Jemez Springs", 35.7686, -106.6928),
    // ── Eastern ───────────────────────────────────────────────────────
    ("Clovis", 34.4048, -103.2052),
    ("Portales", 34.1862, -103.3344),
    ("Tucumcari", 35.1717, -103.7250),
    ("Fort Sumner", 34.4712, -104.2455),
    ("Santa Rosa", 34.9387, -104.6825),
    ("Logan", 35.3628, -103.4127),
    ("Clayton", 36.4517, -103.1841),
    ("Vaughn", 34.6012, -105.2078),
    ("Texico", 34.3898, -103.0513),
    ("Glenrio", 35.1806, -103.0414),
    ("Rodeo", 31.8373, -109.0306),
    ("Timberon", 32.6273, -105.6897),
];

/// City name → centroid lookup table.
#[derive(Debug, Clone, Default)]
pub struct CentroidTable {
    entries: BTreeMap<String, Coordinate>,
}

impl CentroidTable {
    /// Builds a table from `(city, lat, lng)` rows, skipping non-finite
    /// coordinates. Later duplicates do not replace earlier ones.
    #[must_use]
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a (&'a str, f64, f64)>) -> Self {
        let mut entries = BTreeMap::new();
        for (city, lat, lng) in rows {
            if let Some(coordinate) = Coordinate::new(*lat, *lng) {
                entries.entry((*city).to_string()).or_insert(coordinate);
            }
        }
        Self { entries }
    }

    /// The built-in New Mexico table.
    #[must_use]
    pub fn new_mexico() -> Self {
        Self::from_rows(CITY_CENTROIDS)
    }

    /// Exact-name lookup.
    #[must_use]
    pub fn get(&self, city: &str) -> Option<Coordinate> {
        self.entries.get(city).copied()
    }

    /// Number of places in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no places.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Real Las Vegas places for realistic itinerary fixtures.
//!
//! Strip coordinates sourced from OpenStreetMap via Overpass API; grocery
//! and museum coordinates are approximate.

use itinerary_planner::traits::CandidatePlace;

/// A named place with coordinates and a rating.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64, rating: f64) -> Self {
        Self {
            name,
            lat,
            lng,
            rating,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Candidate as a search provider would return it.
    pub fn candidate(&self) -> CandidatePlace {
        CandidatePlace {
            id: self.name.to_lowercase().replace(' ', "-"),
            name: self.name.to_string(),
            address: format!("{}, Las Vegas, NV", self.name),
            lat: self.lat,
            lng: self.lng,
            rating: self.rating,
            is_open: Some(true),
        }
    }
}

// ============================================================================
// Hotels / venues (fixed commitments happen here)
// ============================================================================

pub const BELLAGIO: Place = Place::new("Bellagio", 36.1126, -115.1767, 4.6);
pub const CAESARS_PALACE: Place = Place::new("Caesars Palace", 36.1162, -115.1745, 4.5);
pub const MGM_GRAND: Place = Place::new("MGM Grand", 36.1023654, -115.1688720, 4.3);
pub const WYNN: Place = Place::new("Wynn Las Vegas", 36.1263781, -115.1658180, 4.7);

// ============================================================================
// Restaurants
// ============================================================================

pub const RESTAURANTS: &[Place] = &[
    Place::new("Spago by Wolfgang Puck", 36.1139368, -115.1741462, 4.5),
    Place::new("Rao's", 36.1163982, -115.1763053, 4.2),
    Place::new("Yard House", 36.1177147, -115.1691992, 4.3),
    Place::new("Gordon Ramsay Steak", 36.1127744, -115.1712029, 4.6),
    Place::new("Hash House A Go Go", 36.1181377, -115.1710989, 4.4),
    Place::new("Il Fornaio", 36.1024474, -115.1740110, 4.1),
    Place::new("Wolfgang Puck Bar & Grill", 36.1022046, -115.1696020, 4.2),
    Place::new("Otto Pizzeria", 36.1231219, -115.1684514, 4.0),
];

// ============================================================================
// Cafés and bakeries
// ============================================================================

pub const CAFES: &[Place] = &[
    Place::new("Payard Patisserie", 36.1166582, -115.1759111, 4.4),
    Place::new("Le Macaron", 36.1217180, -115.1689230, 4.5),
    Place::new("Grand Lux Cafe", 36.1216416, -115.1685024, 4.2),
    Place::new("Coco's Bakery", 36.1004202, -115.1652380, 3.9),
    Place::new("Pyramid Cafe", 36.0956586, -115.1761902, 3.7),
];

// ============================================================================
// Groceries
// ============================================================================

pub const GROCERIES: &[Place] = &[
    Place::new("Whole Foods Market Town Square", 36.0716, -115.1760, 4.3),
    Place::new("Smith's Food and Drug Tropicana", 36.1003, -115.1421, 3.9),
];

// ============================================================================
// Museums
// ============================================================================

pub const MUSEUMS: &[Place] = &[
    Place::new("The Mob Museum", 36.1728, -115.1410, 4.7),
    Place::new("The Neon Museum", 36.1770, -115.1351, 4.6),
];

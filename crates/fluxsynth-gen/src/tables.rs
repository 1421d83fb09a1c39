//! Fixed lookup tables used by the modulo-indexed derivations.
//!
//! Table sizes are load-bearing: `FIRST_NAMES` (20) and `LAST_NAMES` (25)
//! give 500 distinct generated name pairs without per-row randomness, and
//! every `index % len` site below relies on the documented length.

pub const CHANNEL: &str = "FLUX1";
pub const APP_NAME: &str = "Flux+";
pub const COUNTRY: &str = "FR";

pub const CUSTOMER_ID_PREFIX: &str = "CUST-";
pub const DUPLICATE_ID_SUFFIX: &str = "_DUP";

pub const AD_BREAK_INTERVAL_SECS: u32 = 180;
pub const AD_BREAK_DURATION_SECS: u32 = 30;

pub const FIRST_NAMES: [&str; 20] = [
    "Jean", "Marie", "Pierre", "Sophie", "Michel", "Catherine", "Philippe", "Nathalie", "Alain",
    "Isabelle", "François", "Sylvie", "Bernard", "Martine", "Patrick", "Christine", "Daniel",
    "Françoise", "Thierry", "Monique",
];

pub const LAST_NAMES: [&str; 25] = [
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Petit", "Richard", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefebvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    "Vincent", "Fournier", "Morel", "Girard", "Andre", "Lefevre", "Mercier",
];

pub const EMAIL_DOMAINS: [&str; 6] = [
    "gmail.com",
    "orange.fr",
    "free.fr",
    "wanadoo.fr",
    "sfr.fr",
    "laposte.net",
];

pub const PROFESSIONS: [&str; 8] = [
    "Engineer",
    "Teacher",
    "Student",
    "Nurse",
    "Sales",
    "Artist",
    "Manager",
    "Consultant",
];

/// Regions used by the calendar-weighted synthesizer (`slot_index % 6`).
pub const REGIONS_6: [&str; 6] = [
    "Île-de-France",
    "Auvergne-Rhône-Alpes",
    "Provence-Alpes-Côte d'Azur",
    "Nouvelle-Aquitaine",
    "Occitanie",
    "Hauts-de-France",
];

/// Regions used by the high-volume synthesizer (`event_id % 8`).
pub const REGIONS_8: [&str; 8] = [
    "Île-de-France",
    "Auvergne-Rhône-Alpes",
    "Provence-Alpes-Côte d'Azur",
    "Nouvelle-Aquitaine",
    "Occitanie",
    "Hauts-de-France",
    "Grand Est",
    "Normandie",
];

/// Cities used by the calendar-weighted synthesizer (`event_seq % 6`).
pub const CITIES_6: [&str; 6] = ["Paris", "Lyon", "Marseille", "Bordeaux", "Toulouse", "Lille"];

/// Cities used by the high-volume synthesizer (`event_id % 10`).
pub const CITIES_10: [&str; 10] = [
    "Paris",
    "Lyon",
    "Marseille",
    "Toulouse",
    "Nice",
    "Nantes",
    "Strasbourg",
    "Montpellier",
    "Bordeaux",
    "Lille",
];

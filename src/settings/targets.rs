/// Root-level collections wiped by a run, in the order they are processed.
pub const COLLECTIONS_TO_CLEAR: &[&str] = &[
    "bookings",
    "departments",
    "employers",
    "hotels",
    "roles",
    "services",
    "shift_presets",
    "shifts",
    "users",
];

pub fn default_collections() -> Vec<String> {
    COLLECTIONS_TO_CLEAR.iter().map(|c| c.to_string()).collect()
}

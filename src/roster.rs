//! Fixed enumerations shared by filters, goals, and actions.
//!
//! The roster and client profiles mirror what the collection app offers on
//! its form; visit rows should only ever carry these values, but nothing
//! here assumes they do.

pub const STAFF_ROSTER: &[&str] = &[
    "Ana Julia",
    "Bruno Carvalho",
    "Carla Dias",
    "Daniel Martins",
    "Fernanda Souza",
    "Victor Alexandre",
    "Vinicius Alexandre",
];

pub const CLIENT_PROFILES: &[&str] = &[
    "Residencial",
    "Comercial",
    "Industrial",
    "Agronegócio",
    "Condomínio",
];

/// True when the name matches a roster entry exactly.
pub fn is_on_roster(name: &str) -> bool {
    STAFF_ROSTER.contains(&name.trim())
}

/// True when the profile label is one of the known enumeration values.
pub fn is_known_profile(profile: &str) -> bool {
    CLIENT_PROFILES.contains(&profile.trim())
}

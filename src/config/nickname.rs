//! Random nickname generator.
//!
//! Produces nicknames in the format `AdjectiveNounNN` (e.g. `QuietCrow7`),
//! short enough for IRC's typical 9-character nickname limit.

use rand::RngExt;

const ADJECTIVES: &[&str] = &[
    "Quiet", "Amber", "Vivid", "Dusk", "Pale", "Wry", "Keen", "Odd", "Blue", "Gray", "Swift",
    "Loud", "Idle", "Warm", "Dim", "Tall",
];

const NOUNS: &[&str] = &[
    "Crow", "Heron", "Finch", "Moth", "Pike", "Otter", "Stoat", "Wren", "Newt", "Toad", "Koi",
    "Lark", "Gull", "Hare", "Vole", "Crab",
];

/// Generate a nickname like `QuietCrow7`.
pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let num: u8 = rng.random_range(0..100);
    format!("{}{}{}", adj, noun, num)
}

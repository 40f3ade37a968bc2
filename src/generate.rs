//! Random credentials for new entries and temporary mailboxes.
use rand::Rng;
use rand::seq::{IndexedRandom as _, SliceRandom as _};

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!#$%&*+-=?@^_~";

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "dusty", "eager", "fuzzy", "gentle", "hollow", "icy", "jolly",
    "keen", "lucky", "mellow", "nimble", "odd", "plain", "quiet", "rapid", "silent", "tidy",
    "urban", "vivid", "witty", "young", "zesty",
];

const NOUNS: &[&str] = &[
    "badger", "cedar", "delta", "falcon", "garnet", "harbor", "island", "juniper", "kettle",
    "lantern", "meadow", "nebula", "otter", "pebble", "quartz", "raven", "summit", "thistle",
    "umber", "valley", "willow", "yarrow", "zephyr",
];

const FIRST_NAMES: &[&str] = &[
    "Alex", "Blake", "Casey", "Dana", "Elliot", "Frankie", "Jordan", "Kai", "Logan", "Morgan",
    "Noel", "Parker", "Quinn", "Riley", "Sage", "Taylor",
];

const LAST_NAMES: &[&str] = &[
    "Archer", "Bennett", "Carver", "Dalton", "Ellis", "Fletcher", "Garner", "Hayes", "Ingram",
    "Keller", "Lowell", "Marsh", "Norris", "Porter", "Reyes", "Sutton",
];

/// Generate a password of `length` characters.
///
/// For `length >= 4` the result contains at least one lowercase letter, one
/// uppercase letter, one digit and, when `symbols` is set, one symbol.
pub fn password<R: Rng + ?Sized>(rng: &mut R, length: usize, symbols: bool) -> String {
    let mut classes: Vec<&[u8]> = vec![LOWER, UPPER, DIGITS];
    if symbols {
        classes.push(SYMBOLS);
    }
    let pool: Vec<u8> = classes.iter().flat_map(|c| c.iter().copied()).collect();

    let mut out: Vec<u8> = Vec::with_capacity(length);
    if length >= classes.len() {
        for class in &classes {
            out.extend(class.choose(rng));
        }
    }
    while out.len() < length {
        out.extend(pool.choose(rng));
    }
    out.shuffle(rng);
    String::from_utf8_lossy(&out).into_owned()
}

/// Generate a username like `quietotter42`.
pub fn username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("plain");
    let noun = NOUNS.choose(rng).copied().unwrap_or("otter");
    let number: u8 = rng.random_range(10..100);
    format!("{adjective}{noun}{number}")
}

/// Generate a full name like `Riley Marsh`.
pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Marsh");
    format!("{first} {last}")
}

/// Content for a freshly generated entry.
pub fn new_entry_content<R: Rng + ?Sized>(rng: &mut R, length: usize, symbols: bool) -> String {
    format!(
        "{}\nusername: {}\nname: {}\n",
        password(rng, length, symbols),
        username(rng),
        full_name(rng)
    )
}

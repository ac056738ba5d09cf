#[cfg(feature = "uuid")]
use uuid::Uuid;

#[cfg(not(any(feature = "rand", feature = "uuid")))]
compile_error!("enable the `rand` or the `uuid` feature to generate names");

/// Random values are drawn from `[0, 2^52)`, the range a double holds exactly.
const RANDOM_SCALE: u64 = 1 << 52;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Represents a randomly generated name segment: the process id followed by
/// a base-36 random fragment.
///
/// Low collision probability only; uniqueness comes from exclusive creation.
pub(crate) struct RandomName {
    name: String,
}

impl RandomName {
    pub fn new() -> Self {
        let pid = std::process::id();
        Self {
            name: format!("{}{}", pid, to_base36(random_fragment())),
        }
    }
}

impl AsRef<str> for RandomName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

#[cfg(all(feature = "rand", not(feature = "uuid")))]
fn random_fragment() -> u64 {
    rand::random_range(0..RANDOM_SCALE)
}

#[cfg(feature = "uuid")]
fn random_fragment() -> u64 {
    // The low 52 bits of a v4 UUID carry no version or variant bits.
    (Uuid::new_v4().as_u128() as u64) % RANDOM_SCALE
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

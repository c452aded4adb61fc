use rand::Rng;
use std::fmt;

/// A plane exists from the moment a landing commits until the take-off that
/// removed it clears the runway.
#[derive(Debug)]
pub struct Plane {
    name: String,
}

impl Plane {
    pub fn new(rng: &mut impl Rng) -> Plane {
        Plane { name: callsign(rng, 2, 4) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Random callsign: `letters` uppercase letters followed by `digits` digits.
/// Unique enough for display, not guaranteed globally unique.
pub fn callsign(rng: &mut impl Rng, letters: usize, digits: usize) -> String {
    let mut name = String::with_capacity(letters + digits);
    for _ in 0..letters {
        name.push(rng.gen_range(b'A'..=b'Z') as char);
    }
    for _ in 0..digits {
        name.push(rng.gen_range(b'0'..=b'9') as char);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callsign_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let name = callsign(&mut rng, 2, 4);
            assert_eq!(6, name.len());
            assert!(name[..2].chars().all(|c| c.is_ascii_uppercase()));
            assert!(name[2..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_plane_displays_its_callsign() {
        let mut rng = rand::thread_rng();
        let plane = Plane::new(&mut rng);
        assert_eq!(plane.name(), plane.to_string());
    }
}

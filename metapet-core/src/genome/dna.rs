//! Genome — three 60-digit base-7 channels
//!
//! A genome is immutable once built. Every constructor validates shape
//! (exactly 60 digits per channel, each in [0,6]) and fails loudly rather
//! than clamping, so a genome that exists is always well-formed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Digits per channel
pub const GENOME_LENGTH: usize = 60;
/// Base of every digit
pub const DIGIT_BASE: u8 = 7;
/// Total digit slots across the three channels
pub const TOTAL_DIGITS: usize = GENOME_LENGTH * 3;

/// Largest multiple of 7 below 256, for unbiased byte → digit mapping
const REJECTION_LIMIT: u8 = 252;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Blue,
    Black,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Blue, Channel::Black];

    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Blue => 1,
            Channel::Black => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Blue => "blue",
            Channel::Black => "black",
        };
        f.write_str(name)
    }
}

/// Shape violations — caller contract errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenomeError {
    #[error("{channel} channel has {len} digits, expected 60")]
    WrongLength { channel: Channel, len: usize },

    #[error("{channel} channel digit {value} at position {position} is not base-7")]
    DigitOutOfRange { channel: Channel, position: usize, value: u8 },

    #[error("position {position} is outside the 60-digit channel")]
    PositionOutOfRange { position: usize },

    #[error("malformed genome text: {0}")]
    Parse(String),
}

/// Wire shape, validated on the way in
#[derive(Serialize, Deserialize)]
struct GenomeRepr {
    red: Vec<u8>,
    blue: Vec<u8>,
    black: Vec<u8>,
}

/// Heritable material of one companion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GenomeRepr", into = "GenomeRepr")]
pub struct Genome {
    channels: [Vec<u8>; 3],
}

impl TryFrom<GenomeRepr> for Genome {
    type Error = GenomeError;
    fn try_from(r: GenomeRepr) -> Result<Self, Self::Error> {
        Genome::new(r.red, r.blue, r.black)
    }
}

impl From<Genome> for GenomeRepr {
    fn from(g: Genome) -> Self {
        let [red, blue, black] = g.channels;
        Self { red, blue, black }
    }
}

impl Genome {
    /// Build a genome, validating every channel
    pub fn new(red: Vec<u8>, blue: Vec<u8>, black: Vec<u8>) -> Result<Self, GenomeError> {
        let channels = [red, blue, black];
        for (channel, digits) in Channel::ALL.iter().zip(&channels) {
            validate_channel(*channel, digits)?;
        }
        Ok(Self { channels })
    }

    /// Every digit set to `digit`
    pub fn uniform(digit: u8) -> Result<Self, GenomeError> {
        let ch = vec![digit; GENOME_LENGTH];
        Self::new(ch.clone(), ch.clone(), ch)
    }

    /// Uniformly random genome
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut draw = || -> Vec<u8> {
            (0..GENOME_LENGTH).map(|_| rng.gen_range(0..DIGIT_BASE)).collect()
        };
        let channels = [draw(), draw(), draw()];
        Self { channels }
    }

    /// Expand opaque seed material into a genome.
    ///
    /// SHA-256 of `material || counter` is drawn byte by byte; bytes at or
    /// above 252 are rejected so every digit is uniform over [0,6].
    pub fn from_seed_material(material: &str) -> Self {
        let mut digits = Vec::with_capacity(TOTAL_DIGITS);
        let mut counter: u32 = 0;
        while digits.len() < TOTAL_DIGITS {
            let mut hasher = Sha256::new();
            hasher.update(material.as_bytes());
            hasher.update(counter.to_le_bytes());
            for byte in hasher.finalize() {
                if byte < REJECTION_LIMIT && digits.len() < TOTAL_DIGITS {
                    digits.push(byte % DIGIT_BASE);
                }
            }
            counter += 1;
        }
        let black = digits.split_off(2 * GENOME_LENGTH);
        let blue = digits.split_off(GENOME_LENGTH);
        Self { channels: [digits, blue, black] }
    }

    pub fn channel(&self, channel: Channel) -> &[u8] {
        &self.channels[channel.index()]
    }

    pub fn red(&self) -> &[u8] {
        self.channel(Channel::Red)
    }

    pub fn blue(&self) -> &[u8] {
        self.channel(Channel::Blue)
    }

    pub fn black(&self) -> &[u8] {
        self.channel(Channel::Black)
    }

    /// Digits at one position: (red, blue, black)
    pub fn column(&self, position: usize) -> Option<(u8, u8, u8)> {
        Some((
            *self.red().get(position)?,
            *self.blue().get(position)?,
            *self.black().get(position)?,
        ))
    }

    /// Iterate all 180 digits as (channel, position, digit)
    pub fn digits(&self) -> impl Iterator<Item = (Channel, usize, u8)> + '_ {
        Channel::ALL.into_iter().flat_map(move |c| {
            self.channel(c).iter().enumerate().map(move |(i, &d)| (c, i, d))
        })
    }

    /// Return a copy with one digit replaced
    pub fn with_digit(&self, channel: Channel, position: usize, digit: u8) -> Result<Self, GenomeError> {
        if digit >= DIGIT_BASE {
            return Err(GenomeError::DigitOutOfRange { channel, position, value: digit });
        }
        let mut next = self.clone();
        match next.channels[channel.index()].get_mut(position) {
            Some(slot) => *slot = digit,
            None => return Err(GenomeError::PositionOutOfRange { position }),
        }
        Ok(next)
    }

    /// Canonical text form (`red-blue-black`), used for seeding and fingerprints
    pub fn fingerprint(&self) -> String {
        self.to_string()
    }
}

fn validate_channel(channel: Channel, digits: &[u8]) -> Result<(), GenomeError> {
    if digits.len() != GENOME_LENGTH {
        return Err(GenomeError::WrongLength { channel, len: digits.len() });
    }
    if let Some((position, &value)) = digits.iter().enumerate().find(|&(_, &d)| d >= DIGIT_BASE) {
        return Err(GenomeError::DigitOutOfRange { channel, position, value });
    }
    Ok(())
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ch) in self.channels.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            for d in ch {
                write!(f, "{}", d)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = GenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [red, blue, black] = parts.as_slice() else {
            return Err(GenomeError::Parse(format!("expected 3 channels, found {}", parts.len())));
        };
        let parse = |text: &str| -> Result<Vec<u8>, GenomeError> {
            text.chars()
                .map(|c| {
                    c.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(|| GenomeError::Parse(format!("unexpected character {:?}", c)))
                })
                .collect()
        };
        Genome::new(parse(*red)?, parse(*blue)?, parse(*black)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_wrong_length() {
        let ok = vec![0u8; 60];
        let err = Genome::new(ok.clone(), vec![0; 59], ok).unwrap_err();
        assert_eq!(err, GenomeError::WrongLength { channel: Channel::Blue, len: 59 });
    }

    #[test]
    fn test_rejects_out_of_range_digit() {
        let mut black = vec![3u8; 60];
        black[17] = 7;
        let err = Genome::new(vec![0; 60], vec![0; 60], black).unwrap_err();
        assert_eq!(
            err,
            GenomeError::DigitOutOfRange { channel: Channel::Black, position: 17, value: 7 }
        );
        assert!(Genome::uniform(9).is_err());
    }

    #[test]
    fn test_text_form() {
        let g = Genome::uniform(1).unwrap();
        let text = g.to_string();
        assert_eq!(text.len(), 182);
        assert_eq!(text.parse::<Genome>().unwrap(), g);
        assert!("123-456".parse::<Genome>().is_err());
        assert!(g.to_string().replace('1', "x").parse::<Genome>().is_err());
    }

    #[test]
    fn test_seed_material_is_deterministic() {
        let a = Genome::from_seed_material("companion-alpha");
        let b = Genome::from_seed_material("companion-alpha");
        let c = Genome::from_seed_material("companion-beta");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.digits().all(|(_, _, d)| d < 7));
        assert_eq!(a.digits().count(), TOTAL_DIGITS);
    }

    #[test]
    fn test_random_is_valid() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let g = Genome::random(&mut rng);
        assert!(Genome::new(g.red().to_vec(), g.blue().to_vec(), g.black().to_vec()).is_ok());
    }

    #[test]
    fn test_json_validates_on_load() {
        let g = Genome::from_seed_material("json");
        let json = serde_json::to_string(&g).unwrap();
        let back: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);

        let bad = r#"{"red":[1,2],"blue":[],"black":[]}"#;
        assert!(serde_json::from_str::<Genome>(bad).is_err());
    }

    #[test]
    fn test_with_digit_copies() {
        let g = Genome::uniform(0).unwrap();
        let h = g.with_digit(Channel::Red, 5, 6).unwrap();
        assert_eq!(g.red()[5], 0);
        assert_eq!(h.red()[5], 6);
        assert!(g.with_digit(Channel::Red, 5, 7).is_err());
        assert!(g.with_digit(Channel::Red, 60, 1).is_err());
    }
}

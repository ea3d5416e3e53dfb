use std::collections::HashSet;

use rainbow_lookup::Algorithm;

use crate::error::Error;
use crate::worker::compute_record;

/// Printable ASCII: digits, letters, punctuation and space.
pub const DEFAULT_CHARSET: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    " ",
);

/// Longest candidate a keyspace may describe.
pub const MAX_LENGTH: usize = 64;

/// Every string over a charset, up to a fixed length, as a candidate source.
///
/// Candidates are numbered from zero: shorter strings first (in inclusive
/// mode), then in charset order with the last character changing fastest.
/// Over `ab` at length 2 that is `aa`, `ab`, `ba`, `bb`.
#[derive(Debug, Clone)]
pub struct Keyspace {
    charset: Vec<char>,
    min_length: usize,
    max_length: usize,
    next: u64,
    end: u64,
}

impl Keyspace {
    /// Strings of exactly `length` characters, or of 1 to `length` characters
    /// when `inclusive`. Repeated charset characters count once.
    pub fn new(charset: &str, length: usize, inclusive: bool) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        let charset: Vec<char> = charset.chars().filter(|c| seen.insert(*c)).collect();
        if charset.is_empty() {
            return Err(Error::Keyspace("charset is empty".into()));
        }
        if length == 0 || length > MAX_LENGTH {
            return Err(Error::Keyspace(format!("length must be between 1 and {MAX_LENGTH}")));
        }

        let min_length = if inclusive { 1 } else { length };
        let base = charset.len() as u64;
        let mut size = 0u64;
        for len in min_length..=length {
            size = base
                .checked_pow(len as u32)
                .and_then(|n| size.checked_add(n))
                .ok_or_else(|| Error::Keyspace("more than 2^64 candidates".into()))?;
        }

        Ok(Self { charset, min_length, max_length: length, next: 0, end: size })
    }

    /// Starts `count` candidates further in.
    pub fn with_skip(mut self, count: u64) -> Self {
        self.next = self.next.saturating_add(count).min(self.end);
        self
    }

    /// Stops after at most `count` more candidates.
    pub fn with_limit(mut self, count: u64) -> Self {
        self.end = self.end.min(self.next.saturating_add(count));
        self
    }

    /// Index of the next candidate and one past the last.
    pub fn range(&self) -> (u64, u64) {
        (self.next, self.end)
    }

    pub fn remaining(&self) -> u64 {
        self.end - self.next
    }

    /// Rough table size in bytes for the remaining candidates, based on the
    /// record of the longest one.
    pub fn estimated_size(&self, algorithms: &[Algorithm]) -> u64 {
        let longest: String = std::iter::repeat_n(self.charset[0], self.max_length).collect();
        let record = compute_record(longest, algorithms).map(|r| r.len() as u64 + 1).unwrap_or(0);
        record.saturating_mul(self.remaining())
    }

    /// The candidate at `index`, which must be below the full keyspace size.
    fn candidate(&self, mut index: u64) -> String {
        let base = self.charset.len() as u64;
        let mut length = self.min_length;
        while length < self.max_length {
            let size = base.pow(length as u32);
            if index < size {
                break;
            }
            index -= size;
            length += 1;
        }

        let mut chars = vec![self.charset[0]; length];
        for slot in chars.iter_mut().rev() {
            *slot = self.charset[(index % base) as usize];
            index /= base;
        }
        chars.into_iter().collect()
    }
}

impl Iterator for Keyspace {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.end {
            return None;
        }
        let candidate = self.candidate(self.next);
        self.next += 1;
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(keyspace: Keyspace) -> Vec<String> {
        keyspace.collect()
    }

    #[test]
    fn test_fixed_length() {
        let keyspace = Keyspace::new("ab", 2, false).unwrap();
        assert_eq!(keyspace.remaining(), 4);
        assert_eq!(collect(keyspace), ["aa", "ab", "ba", "bb"]);

        let words = collect(Keyspace::new("xyz", 3, false).unwrap());
        assert_eq!(words.len(), 27);
        assert_eq!(words.first().unwrap(), "xxx");
        assert_eq!(words.last().unwrap(), "zzz");
        assert!(words.iter().all(|w| w.chars().count() == 3));
        assert_eq!(words.iter().collect::<HashSet<_>>().len(), 27);
    }

    #[test]
    fn test_inclusive() {
        let keyspace = Keyspace::new("ab", 2, true).unwrap();
        assert_eq!(keyspace.remaining(), 6);
        assert_eq!(collect(keyspace), ["a", "b", "aa", "ab", "ba", "bb"]);
        assert_eq!(Keyspace::new("abc", 3, true).unwrap().count(), 3 + 9 + 27);
    }

    #[test]
    fn test_skip_and_limit() {
        let keyspace = Keyspace::new("abc", 2, false).unwrap().with_skip(2).with_limit(3);
        assert_eq!(keyspace.range(), (2, 5));
        assert_eq!(collect(keyspace), ["ac", "ba", "bb"]);

        // Inclusive numbering runs across lengths.
        let keyspace = Keyspace::new("ab", 2, true).unwrap().with_skip(1).with_limit(2);
        assert_eq!(collect(keyspace), ["b", "aa"]);

        assert_eq!(Keyspace::new("ab", 2, false).unwrap().with_skip(10).count(), 0);
        assert_eq!(Keyspace::new("ab", 2, false).unwrap().with_skip(3).with_limit(100).count(), 1);
    }

    #[test]
    fn test_default_charset() {
        assert_eq!(DEFAULT_CHARSET.len(), 95);
        let keyspace = Keyspace::new(DEFAULT_CHARSET, 2, false).unwrap();
        assert_eq!(keyspace.remaining(), 95 * 95);
        assert_eq!(Keyspace::new(DEFAULT_CHARSET, 3, true).unwrap().remaining(), 95 + 9025 + 857_375);
    }

    #[test]
    fn test_repeated_charset_characters() {
        assert_eq!(collect(Keyspace::new("aab", 1, false).unwrap()), ["a", "b"]);
    }

    #[test]
    fn test_invalid_keyspace() {
        assert!(matches!(Keyspace::new("", 3, false), Err(Error::Keyspace(_))));
        assert!(matches!(Keyspace::new("ab", 0, false), Err(Error::Keyspace(_))));
        assert!(matches!(Keyspace::new("ab", MAX_LENGTH + 1, false), Err(Error::Keyspace(_))));
        assert!(matches!(Keyspace::new(DEFAULT_CHARSET, 12, false), Err(Error::Keyspace(_))));
        assert!(Keyspace::new("a", MAX_LENGTH, true).is_ok());
    }

    #[test]
    fn test_estimated_size() {
        let keyspace = Keyspace::new("ab", 3, false).unwrap();
        let line = compute_record("aaa".into(), &[Algorithm::Md5]).unwrap().len() as u64 + 1;
        assert_eq!(keyspace.estimated_size(&[Algorithm::Md5]), line * 8);
        assert_eq!(keyspace.with_skip(8).estimated_size(&[Algorithm::Md5]), 0);
    }
}

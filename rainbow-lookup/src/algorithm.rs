use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use md4::Md4;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sha2::{Sha224, Sha256, Sha384, Sha512};

/// A digest kind the table can hold a column for.
///
/// Variants are declared in table column order, which is also the order
/// digests appear in a serialized [`Entry`](crate::Entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    /// MD4 over the UTF-16LE encoding of the preimage.
    Ntlm,
}

impl Algorithm {
    /// Every supported algorithm, in column order.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Ntlm,
    ];

    /// Column name, also the name callers use in requests.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Ntlm => "ntlm",
        }
    }

    /// Computes the lowercase hex digest of `preimage`.
    pub fn digest_hex(self, preimage: &str) -> String {
        let bytes = preimage.as_bytes();
        match self {
            Algorithm::Md5 => hex::encode(Md5::digest(bytes)),
            Algorithm::Sha1 => hex::encode(Sha1::digest(bytes)),
            Algorithm::Sha224 => hex::encode(Sha224::digest(bytes)),
            Algorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            Algorithm::Sha384 => hex::encode(Sha384::digest(bytes)),
            Algorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
            Algorithm::Ntlm => {
                let utf16le: Vec<u8> =
                    preimage.encode_utf16().flat_map(u16::to_le_bytes).collect();
                hex::encode(Md4::digest(&utf16le))
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm '{0}'")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseAlgorithmError(name.to_string()))
    }
}

/// The algorithms a lookup engine accepts.
///
/// Loaded from configuration so deployments can narrow the set (for example
/// to md5 only while only that column is populated) without code changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    algorithms: BTreeSet<Algorithm>,
}

impl AllowList {
    pub fn new(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self { algorithms: algorithms.into_iter().collect() }
    }

    /// Parses a comma-separated list such as `"md5,sha1"`.
    ///
    /// Blank items are ignored. An entirely blank list is rejected since an
    /// engine that accepts nothing is a misconfiguration.
    pub fn parse(list: &str) -> Result<Self, ParseAlgorithmError> {
        let algorithms = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Algorithm::from_str)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if algorithms.is_empty() {
            return Err(ParseAlgorithmError(list.to_string()));
        }
        Ok(Self { algorithms })
    }

    /// Resolves a caller-supplied name, returning `None` if it is unknown or
    /// not allowed.
    pub fn resolve(&self, name: &str) -> Option<Algorithm> {
        Algorithm::from_str(name).ok().filter(|alg| self.algorithms.contains(alg))
    }

    pub fn contains(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn iter(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.algorithms.iter().copied()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(Algorithm::ALL)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn digest_bytes(alg: Algorithm, preimage: &str) -> Vec<u8> {
        hex::decode(alg.digest_hex(preimage)).unwrap()
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            digest_bytes(Algorithm::Md5, "password"),
            hex!("5f4dcc3b5aa765d61d8327deb882cf99")
        );
        assert_eq!(
            digest_bytes(Algorithm::Sha1, "password"),
            hex!("5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8")
        );
        assert_eq!(
            digest_bytes(Algorithm::Sha256, "password"),
            hex!("5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8")
        );
        assert_eq!(
            digest_bytes(Algorithm::Ntlm, "password"),
            hex!("8846f7eaee8fb117ad06bdd830b7586c")
        );
    }

    #[test]
    fn test_digest_is_lowercase_hex_of_expected_length() {
        let lengths = [32, 40, 56, 64, 96, 128, 32];
        for (alg, len) in Algorithm::ALL.into_iter().zip(lengths) {
            let digest = alg.digest_hex("hunter2");
            assert_eq!(digest.len(), len, "{alg}");
            assert!(digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        }
    }

    #[test]
    fn test_ntlm_uses_utf16() {
        // NTLM of a non-ASCII preimage differs from MD4 of its UTF-8 bytes.
        let utf8 = hex::encode(Md4::digest("pässword".as_bytes()));
        assert_ne!(Algorithm::Ntlm.digest_hex("pässword"), utf8);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("md5".parse::<Algorithm>(), Ok(Algorithm::Md5));
        assert_eq!(" SHA256 ".parse::<Algorithm>(), Ok(Algorithm::Sha256));
        assert_eq!(
            "whirlpool".parse::<Algorithm>(),
            Err(ParseAlgorithmError("whirlpool".to_string()))
        );
        for alg in Algorithm::ALL {
            assert_eq!(alg.name().parse::<Algorithm>(), Ok(alg));
        }
    }

    #[test]
    fn test_allow_list_parse() {
        let list = AllowList::parse("md5, ntlm,,").unwrap();
        assert!(list.contains(Algorithm::Md5));
        assert!(list.contains(Algorithm::Ntlm));
        assert!(!list.contains(Algorithm::Sha1));
        assert!(AllowList::parse(" , ").is_err());
        assert!(AllowList::parse("md5,whirlpool").is_err());
    }

    #[test]
    fn test_allow_list_resolve() {
        let list = AllowList::new([Algorithm::Md5]);
        assert_eq!(list.resolve("md5"), Some(Algorithm::Md5));
        assert_eq!(list.resolve("sha1"), None);
        assert_eq!(list.resolve("whirlpool"), None);
        assert_eq!(AllowList::default().iter().count(), Algorithm::ALL.len());
    }
}

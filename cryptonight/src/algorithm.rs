use crate::chukwa::chukwa_slow_hash;
use crate::error::HashError;
use crate::hash::Hash;
use crate::keccak::cn_fast_hash;
use crate::params::{SizeClass, Variant};
use crate::slow_hash::cn_slow_hash;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Every hash function exposed by this crate.
///
/// A network selects its proof-of-work by name (for instance from a configuration file), so the enum parses from and
/// serializes to the entry-point names: `cn_fast_hash`, `cn_turtle_lite_slow_hash_v2`, `chukwa_slow_hash`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    CnFast,
    CryptoNight { size: SizeClass, variant: Variant },
    Chukwa,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 20] = {
        let mut all = [HashAlgorithm::CnFast; 20];
        let mut i = 0;
        while i < 18 {
            let size = SizeClass::ALL[i / 3];
            let variant = Variant::ALL[i % 3];
            all[i + 1] = HashAlgorithm::CryptoNight { size, variant };
            i += 1;
        }
        all[19] = HashAlgorithm::Chukwa;
        all
    };

    pub fn hash(&self, data: &[u8]) -> Result<Hash, HashError> {
        match self {
            HashAlgorithm::CnFast => Ok(cn_fast_hash(data)),
            HashAlgorithm::CryptoNight { size, variant } => cn_slow_hash(data, size.params(), *variant),
            HashAlgorithm::Chukwa => chukwa_slow_hash(data),
        }
    }

    pub fn name(&self) -> String {
        match self {
            HashAlgorithm::CnFast => "cn_fast_hash".to_string(),
            HashAlgorithm::CryptoNight { size, variant } => format!("{}_slow_hash_{variant}", size.prefix()),
            HashAlgorithm::Chukwa => "chukwa_slow_hash".to_string(),
        }
    }

    /// Whether the algorithm needs a scratchpad or Argon2 memory, i.e. everything except `cn_fast_hash`.
    pub fn is_memory_hard(&self) -> bool {
        !matches!(self, HashAlgorithm::CnFast)
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.name() == s)
            .ok_or_else(|| HashError::UnknownAlgorithm(s.to_string()))
    }
}

impl Serialize for HashAlgorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for HashAlgorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_parse_back() {
        let names = HashAlgorithm::ALL.iter().map(|a| a.name()).collect::<HashSet<_>>();
        assert_eq!(names.len(), 20);
        for algo in HashAlgorithm::ALL {
            assert_eq!(algo.name().parse::<HashAlgorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn entry_point_names() {
        let turtle = HashAlgorithm::CryptoNight { size: SizeClass::TurtleLite, variant: Variant::V2 };
        assert_eq!(turtle.to_string(), "cn_turtle_lite_slow_hash_v2");
        let standard = HashAlgorithm::CryptoNight { size: SizeClass::Standard, variant: Variant::V0 };
        assert_eq!(standard.to_string(), "cn_slow_hash_v0");
        assert_eq!(HashAlgorithm::CnFast.to_string(), "cn_fast_hash");
        assert!(!HashAlgorithm::CnFast.is_memory_hard());
        assert!(HashAlgorithm::Chukwa.is_memory_hard());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "cn_slow_hash_v3".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err, HashError::UnknownAlgorithm("cn_slow_hash_v3".into()));
    }

    #[test]
    fn config_file_selection() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct PowConfig {
            algorithm: HashAlgorithm,
            fork_height: u64,
        }
        let config: PowConfig =
            ron::from_str(r#"(algorithm: "cn_turtle_lite_slow_hash_v2", fork_height: 1_200_000)"#).unwrap();
        assert_eq!(config.algorithm, HashAlgorithm::CryptoNight { size: SizeClass::TurtleLite, variant: Variant::V2 });
        let text = ron::to_string(&config).unwrap();
        assert_eq!(ron::from_str::<PowConfig>(&text).unwrap(), config);
        assert!(ron::from_str::<PowConfig>(r#"(algorithm: "sha256", fork_height: 1)"#).is_err());
    }
}

use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum Strand {
    /// Forward strand.
    Forward,
    /// Reverse strand.
    Reverse,
    /// Unknown or unstranded.
    None,
}

impl FromStr for Strand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Ok(Strand::None),
        }
    }
}

impl From<Strand> for char {
    fn from(value: Strand) -> Self {
        match value {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Strand::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Annotation feature type (third GFF column).
#[derive(Eq, Hash, PartialEq, Clone, Debug, PartialOrd, Ord)]
pub enum FeatureType {
    Gene,
    MRna,
    Cds,
    Exon,
    FivePrimeUtr,
    ThreePrimeUtr,
    Transposon,
    /// Any type not listed above, kept verbatim.
    Other(String),
}

impl FeatureType {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::MRna => "mRNA",
            FeatureType::Cds => "CDS",
            FeatureType::Exon => "exon",
            FeatureType::FivePrimeUtr => "five_prime_UTR",
            FeatureType::ThreePrimeUtr => "three_prime_UTR",
            FeatureType::Transposon => "transposon",
            FeatureType::Other(name) => name.as_str(),
        }
    }
}

impl FromStr for FeatureType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gene" => FeatureType::Gene,
            "mRNA" => FeatureType::MRna,
            "CDS" => FeatureType::Cds,
            "exon" => FeatureType::Exon,
            "five_prime_UTR" => FeatureType::FivePrimeUtr,
            "three_prime_UTR" => FeatureType::ThreePrimeUtr,
            "transposon" | "transposable_element" => FeatureType::Transposon,
            other => FeatureType::Other(other.to_string()),
        })
    }
}

impl Display for FeatureType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FeatureType {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeatureType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        FeatureType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

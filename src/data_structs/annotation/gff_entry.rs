use std::fmt::{self, Write};
use std::str::FromStr;

use arcstr::ArcStr;
use csv::StringRecord;
use hashbrown::HashMap;
use itertools::Itertools;

use crate::data_structs::coords::Contig;
use crate::data_structs::enums::{FeatureType, Strand};
use crate::data_structs::typedef::{IdStr, PosType};
use crate::error::ParseError;
use crate::{getter_fn, with_field_fn};

pub(crate) const ANNOTATION_TABLE: &str = "annotation";
/// Number of columns of a GFF-like annotation row.
pub const GFF_FIELDS: usize = 9;

/// Parsed ninth column of an annotation row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureAttributes {
    pub id:     Option<IdStr>,
    pub name:   Option<Vec<String>>,
    pub parent: Option<Vec<IdStr>>,
    pub other:  HashMap<String, String>,
}

impl FeatureAttributes {
    with_field_fn!(name, Option<Vec<String>>);

    with_field_fn!(other, HashMap<String, String>);

    /// Sets the ID attribute.
    pub fn with_id<S: Into<IdStr>>(
        mut self,
        id: Option<S>,
    ) -> Self {
        self.id = id.map(|s| s.into());
        self
    }

    /// Sets the Parent attribute.
    pub fn with_parent<S: Into<IdStr>>(
        mut self,
        parent: Option<Vec<S>>,
    ) -> Self {
        self.parent = parent.map(|v| {
            v.into_iter()
                .map(|s| s.into())
                .collect()
        });
        self
    }

    /// `ID` followed by every `Parent` value.
    pub fn identifiers(&self) -> impl Iterator<Item = &IdStr> {
        self.id
            .iter()
            .chain(self.parent.iter().flatten())
    }

    pub fn parents(&self) -> &[IdStr] {
        self.parent.as_deref().unwrap_or_default()
    }
}

impl FromStr for FeatureAttributes {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attributes = FeatureAttributes::default();
        for pair in s.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or_default().trim();
            let value = parts
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty());

            match key {
                "ID" => {
                    attributes.id = value.map(IdStr::from);
                },
                "Name" => {
                    attributes.name =
                        value.map(|s| s.split(',').map(String::from).collect());
                },
                "Parent" => {
                    attributes.parent = value.map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|p| !p.is_empty())
                            .map(IdStr::from)
                            .collect()
                    });
                },
                _ => {
                    if let Some(val) = value {
                        attributes
                            .other
                            .insert(key.to_string(), val.to_string());
                    }
                },
            }
        }

        Ok(attributes)
    }
}

impl fmt::Display for FeatureAttributes {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut fields = Vec::new();
        if let Some(id) = self.id.as_ref() {
            fields.push(format!("ID={}", id));
        }
        if let Some(name) = self.name.as_ref() {
            fields.push(format!("Name={}", name.join(",")));
        }
        if let Some(parent) = self.parent.as_ref() {
            let mut joined = String::from("Parent=");
            for (i, p) in parent.iter().enumerate() {
                if i > 0 {
                    joined.push(',');
                }
                write!(joined, "{}", p)?;
            }
            fields.push(joined);
        }
        for (k, v) in self
            .other
            .iter()
            .sorted_unstable_by_key(|(k, _)| *k)
        {
            fields.push(format!("{}={}", k, v));
        }
        f.write_str(&fields.join(";"))
    }
}

/// One annotation line. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    contig:       Contig,
    source:       ArcStr,
    feature_type: FeatureType,
    score:        Option<f64>,
    phase:        Option<u8>,
    attributes:   FeatureAttributes,
}

impl FeatureRecord {
    getter_fn!(contig, Contig);

    getter_fn!(source, ArcStr);

    getter_fn!(feature_type, FeatureType);

    getter_fn!(attributes, FeatureAttributes);

    pub fn new(
        contig: Contig,
        source: Option<ArcStr>,
        feature_type: FeatureType,
        score: Option<f64>,
        phase: Option<u8>,
        attributes: Option<FeatureAttributes>,
    ) -> Self {
        Self {
            contig,
            score,
            phase,
            feature_type,
            attributes: attributes.unwrap_or_default(),
            source: source.unwrap_or_default(),
        }
    }

    pub fn chromosome(&self) -> &ArcStr { self.contig.seqname() }

    pub fn start(&self) -> PosType { self.contig.start() }

    pub fn end(&self) -> PosType { self.contig.end() }

    pub fn strand(&self) -> Strand { self.contig.strand() }

    pub fn score(&self) -> Option<f64> { self.score }

    pub fn phase(&self) -> Option<u8> { self.phase }

    pub fn id(&self) -> Option<&IdStr> { self.attributes.id.as_ref() }

    /// Parses one tab-separated annotation row. `line` is 1-based and only
    /// used for error reporting.
    pub fn parse_row(
        row: &StringRecord,
        line: u64,
    ) -> Result<Self, ParseError> {
        if row.len() < GFF_FIELDS {
            return Err(ParseError::TooFewFields {
                table: ANNOTATION_TABLE,
                line,
                expected: GFF_FIELDS,
                found: row.len(),
            });
        }
        let field = |i: usize| row.get(i).unwrap_or_default().trim();

        let parse_pos = |i: usize, name: &'static str| {
            field(i).parse::<PosType>().map_err(|_| {
                ParseError::InvalidInteger {
                    table: ANNOTATION_TABLE,
                    line,
                    field: name,
                    value: field(i).to_string(),
                }
            })
        };
        let start = parse_pos(3, "start")?;
        let end = parse_pos(4, "end")?;

        let strand = Strand::from_str(field(6)).unwrap_or(Strand::None);
        let contig = Contig::try_new(ArcStr::from(field(0)), start, end, strand)
            .ok_or(ParseError::InvalidInterval {
                table: ANNOTATION_TABLE,
                line,
                start,
                end,
            })?;
        let feature_type =
            FeatureType::from_str(field(2)).unwrap_or(FeatureType::Other(String::new()));

        Ok(Self::new(
            contig,
            Some(ArcStr::from(field(1))),
            feature_type,
            field(5).parse::<f64>().ok(),
            field(7).parse::<u8>().ok(),
            Some(FeatureAttributes::from_str(field(8))?),
        ))
    }
}

use std::fmt::Display;

use arcstr::ArcStr;
use serde::Serialize;

use crate::data_structs::enums::Strand;
use crate::data_structs::typedef::PosType;

/// Represents a contig with a sequence name, closed 1-based start and end
/// positions, and strand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Contig {
    seqname: ArcStr,
    start:   PosType,
    end:     PosType,
    strand:  Strand,
}

impl Contig {
    /// Creates a new `Contig`.
    ///
    /// # Panics
    /// If `start > end`. Use [`Contig::try_new`] for untrusted input.
    pub fn new(
        seqname: ArcStr,
        start: PosType,
        end: PosType,
        strand: Strand,
    ) -> Self {
        assert!(
            start <= end,
            "Start position must be less than or equal to end position"
        );
        Self {
            seqname,
            start,
            end,
            strand,
        }
    }

    /// Creates a new `Contig`, returning `None` if `start > end`.
    pub fn try_new(
        seqname: ArcStr,
        start: PosType,
        end: PosType,
        strand: Strand,
    ) -> Option<Self> {
        (start <= end).then(|| Self {
            seqname,
            start,
            end,
            strand,
        })
    }

    /// Returns the start position.
    pub fn start(&self) -> PosType { self.start }

    /// Returns the end position.
    pub fn end(&self) -> PosType { self.end }

    /// Returns the strand of the contig.
    pub fn strand(&self) -> Strand { self.strand }

    /// Returns the sequence name of the contig.
    pub fn seqname(&self) -> &ArcStr { &self.seqname }
}

impl Display for Contig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{} ({})",
            self.seqname, self.start, self.end, self.strand
        )
    }
}

use smallstr::SmallString;

pub const SMALLSTR_SIZE: usize = 24;
/// Inline string used for gene and line identifiers.
pub type IdStr = SmallString<[u8; SMALLSTR_SIZE]>;
/// 1-based inclusive genomic coordinate.
pub type PosType = u32;

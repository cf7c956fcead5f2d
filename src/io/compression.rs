use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compression of an input table, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    #[cfg(feature = "compression")]
    Gz,
}

impl Compression {
    pub fn name(&self) -> &str {
        match self {
            Compression::None => "none",
            #[cfg(feature = "compression")]
            Compression::Gz => "gzip",
        }
    }

    /// `.gz` maps to gzip when the `compression` feature is enabled;
    /// everything else is read as plain text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            #[cfg(feature = "compression")]
            Some(ext) if ext.eq_ignore_ascii_case("gz") => Compression::Gz,
            _ => Compression::None,
        }
    }

    pub fn get_decoder(
        &self,
        handle: File,
    ) -> Box<dyn Read + Send> {
        match self {
            Compression::None => Box::new(handle),
            #[cfg(feature = "compression")]
            Compression::Gz => Box::new(flate2::read::MultiGzDecoder::new(handle)),
        }
    }
}

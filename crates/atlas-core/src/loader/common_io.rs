// crates/atlas-core/src/loader/common_io.rs
use crate::error::{AtlasError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens a corpus file, buffers it, and wraps `.gz` files in a Gzip decoder.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        AtlasError::NotFound(format!("Corpus not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            use flate2::read::GzDecoder;
            return Ok(Box::new(GzDecoder::new(reader)));
        }

        #[cfg(not(feature = "compact"))]
        {
            return Err(AtlasError::Config(format!(
                "{} is gzip-compressed; enable the `compact` feature to read it",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SizeTableError {
    #[error("Reference '{0}' has zero length")]
    ZeroLength(String),

    #[error("Duplicate reference name: {0}")]
    DuplicateName(String),
}

/// A named sequence from the alignment header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Sequence name (SN tag in SAM)
    pub name: String,

    /// Sequence length (LN tag in SAM)
    pub length: u64,
}

impl Reference {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Ordered reference names and lengths, the "chrom.sizes" input of wigToBigWig.
///
/// Names are unique and every length is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizeTable {
    references: Vec<Reference>,
}

impl SizeTable {
    /// Build a table, keeping the header order.
    ///
    /// # Errors
    ///
    /// Returns `SizeTableError::ZeroLength` or `SizeTableError::DuplicateName`
    /// if a reference breaks the table's invariants.
    pub fn new(references: Vec<Reference>) -> Result<Self, SizeTableError> {
        let mut seen = HashSet::with_capacity(references.len());
        for reference in &references {
            if reference.length == 0 {
                return Err(SizeTableError::ZeroLength(reference.name.clone()));
            }
            if !seen.insert(reference.name.as_str()) {
                return Err(SizeTableError::DuplicateName(reference.name.clone()));
            }
        }
        Ok(Self { references })
    }

    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Write one `name<TAB>length` line per reference, no header
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for reference in &self.references {
            writeln!(writer, "{}\t{}", reference.name, reference.length)?;
        }
        writer.flush()
    }

    /// Create (or truncate) `path` and write the table into it
    ///
    /// # Errors
    ///
    /// Returns the error from creating or writing the file; callers tell a
    /// permission denial apart by its `ErrorKind`.
    pub fn write_file(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }
}

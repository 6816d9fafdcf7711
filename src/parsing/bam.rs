use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use noodles::bam;
use noodles::bam::bai;
use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
use noodles::csi::binning_index::Indexer;
use noodles::sam;
use noodles::sam::alignment::Record as _;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::reference::{Reference, SizeTable, SizeTableError};
use crate::utils::validation::parent_dir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to build index for {}: {source}", .path.display())]
    Build { path: PathBuf, source: io::Error },

    #[error("Failed to read BAM header from {}: {source}", .path.display())]
    Header { path: PathBuf, source: io::Error },

    #[error("Invalid reference catalog: {0}")]
    Catalog(#[from] SizeTableError),

    #[error("No reference sequences in header of {}", .0.display())]
    NoReferences(PathBuf),
}

/// Path of the BAI index that sits next to `path` (`sample.bam.bai`)
#[must_use]
pub fn index_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bai");
    PathBuf::from(name)
}

/// Build `<path>.bai` unless it already exists.
///
/// Returns `true` when a new index was written. The BAM must be
/// coordinate-sorted. The index is written to a temporary file beside the
/// BAM and only renamed into place once complete, so a failed build never
/// leaves a partial `.bai` behind.
///
/// # Errors
///
/// Returns `IndexError::Build` if indexing fails, or `IndexError::Io` if the
/// index file cannot be written.
pub fn ensure_index(path: &Path) -> Result<bool, IndexError> {
    let index_path = index_path(path);
    if index_path.exists() {
        debug!(index = %index_path.display(), "Using existing BAM index");
        return Ok(false);
    }

    info!("Building BAM index: {}", index_path.display());
    let index = build_index(path).map_err(|source| IndexError::Build {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = NamedTempFile::new_in(parent_dir(&index_path))?;
    write_index(file.as_file_mut(), &index)?;
    file.persist(&index_path).map_err(|e| e.error)?;

    Ok(true)
}

fn write_index(file: &mut File, index: &bai::Index) -> io::Result<()> {
    let mut writer = bai::io::Writer::new(BufWriter::new(file));
    writer.write_index(index)?;
    writer.get_mut().flush()
}

fn is_coordinate_sorted(header: &sam::Header) -> bool {
    use sam::header::record::value::map::header::{sort_order, tag};

    header
        .header()
        .and_then(|hdr| hdr.other_fields().get(&tag::SORT_ORDER))
        .is_some_and(|sort_order| sort_order == sort_order::COORDINATE)
}

/// Index every record of a coordinate-sorted BAM
fn build_index(path: &Path) -> io::Result<bai::Index> {
    let mut reader = File::open(path).map(bam::io::Reader::new)?;
    let header = reader.read_header()?;

    if !is_coordinate_sorted(&header) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "the input BAM must be coordinate-sorted to be indexed",
        ));
    }

    let mut record = bam::Record::default();
    let mut indexer = Indexer::default();
    let mut start = reader.get_ref().virtual_position();

    while reader.read_record(&mut record)? != 0 {
        let end = reader.get_ref().virtual_position();

        let context = match (
            record.reference_sequence_id().transpose()?,
            record.alignment_start().transpose()?,
            record.alignment_end().transpose()?,
        ) {
            (Some(id), Some(first), Some(last)) => {
                Some((id, first, last, !record.flags().is_unmapped()))
            }
            _ => None,
        };

        indexer.add_record(context, Chunk::new(start, end))?;
        start = end;
    }

    Ok(indexer.build(header.reference_sequences().len()))
}

/// A BAM file whose index is known to exist, held open until its header is read.
///
/// The file handle lives exactly as long as this value, so it is released on
/// every path out of [`IndexedBam::references`].
pub struct IndexedBam {
    path: PathBuf,
    file: File,
}

impl IndexedBam {
    /// Make sure the index exists, then open the BAM for reading
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be built or the file opened.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        ensure_index(path)?;
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Read the reference catalog from the header, in header order
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Header` if the header cannot be read, or
    /// `IndexError::NoReferences` / `IndexError::Catalog` if the catalog is
    /// empty or malformed.
    pub fn references(self) -> Result<SizeTable, IndexError> {
        let Self { path, file } = self;
        let mut reader = bam::io::Reader::new(file);

        let header = reader
            .read_header()
            .map_err(|source| IndexError::Header {
                path: path.clone(),
                source,
            })?;

        let references: Vec<Reference> = header
            .reference_sequences()
            .iter()
            .map(|(name, map)| Reference::new(name.to_string(), map.length().get() as u64))
            .collect();

        if references.is_empty() {
            return Err(IndexError::NoReferences(path));
        }

        Ok(SizeTable::new(references)?)
    }
}

/// Source of the reference catalog of an alignment file
pub trait ReferenceSource {
    /// List `(name, length)` pairs for `path`, building its index if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the index or header cannot be read.
    fn list_references(&self, path: &Path) -> Result<SizeTable, IndexError>;
}

/// Reads the reference catalog from a BAM header with noodles
#[derive(Debug, Clone, Copy, Default)]
pub struct BamReferences;

impl ReferenceSource for BamReferences {
    fn list_references(&self, path: &Path) -> Result<SizeTable, IndexError> {
        IndexedBam::open(path)?.references()
    }
}

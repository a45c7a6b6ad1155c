//! Paging through the raw, unfiltered rows of a city's data file.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::CityConfig;
use crate::error::DataSourceError;

/// Rows returned per page.
pub const PAGE_SIZE: usize = 5;

/// One raw row as `(column name, value)` pairs in file order.
pub type RawRow = Vec<(String, String)>;

/// Streams a data file page by page, keeping its place between calls.
pub struct RawPager<R: Read> {
    source: PathBuf,
    headers: StringRecord,
    rows: StringRecordsIntoIter<R>,
    page_size: usize,
    served: usize,
    exhausted: bool,
}

impl RawPager<File> {
    /// Opens the unfiltered data file for `city`.
    pub fn open(config: &CityConfig, city: &str) -> Result<Self, DataSourceError> {
        let path = config.resolve(city)?;
        let file = File::open(&path).map_err(|e| DataSourceError::open(&path, e))?;
        Self::from_reader(file, &path)
    }
}

impl<R: Read> RawPager<R> {
    pub fn from_reader(reader: R, source: &Path) -> Result<Self, DataSourceError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| DataSourceError::csv(source, e))?
            .clone();

        Ok(RawPager {
            source: source.to_path_buf(),
            headers,
            rows: rdr.into_records(),
            page_size: PAGE_SIZE,
            served: 0,
            exhausted: false,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of rows handed out so far.
    pub fn served(&self) -> usize {
        self.served
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the next page, or `None` once every row has been served.
    /// The final page may be shorter than the page size.
    pub fn next_page(&mut self) -> Result<Option<Vec<RawRow>>, DataSourceError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut page = Vec::with_capacity(self.page_size);
        while page.len() < self.page_size {
            match self.rows.next() {
                Some(record) => {
                    let record = record.map_err(|e| DataSourceError::csv(&self.source, e))?;
                    page.push(
                        self.headers
                            .iter()
                            .zip(record.iter())
                            .map(|(name, value)| (name.to_string(), value.to_string()))
                            .collect(),
                    );
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        self.served += page.len();
        debug!(rows = page.len(), served = self.served, "Raw page read");
        if page.is_empty() {
            Ok(None)
        } else {
            Ok(Some(page))
        }
    }
}

use ::csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One row of the data file, with its values in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based position among the data rows, header excluded.
    pub row: usize,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(row: usize, fields: Vec<(String, String)>) -> Self {
        Record { row, fields }
    }

    /// Looks up the value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn first_value(&self) -> Option<&str> {
        self.fields.first().map(|(_, value)| value.as_str())
    }
}

/// The header and records of a template's data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFrame {
    pub name: String,
    pub headers: Vec<String>,
    pub header_indices: HashMap<String, usize>,
    pub records: Vec<Record>,
}

impl DataFrame {
    /// Creates a new DataFrame with the given name.
    pub fn new(name: String) -> Self {
        DataFrame {
            name,
            headers: Vec::new(),
            header_indices: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Reads a whole data file: header and every record.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut df = DataFrame::new(name);
        let file = File::open(path)?;
        df.read_records(file)?;
        log::debug!(
            "loaded {} records with columns {:?} from {}",
            df.records.len(),
            df.headers,
            path.display()
        );
        Ok(df)
    }

    /// Reads CSV headers from a file.
    pub fn read_headers(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(file);
        let headers = reader.headers()?.clone();
        self.set_headers(&headers);
        Ok(())
    }

    /// Reads the header row and every record from `input`.
    pub fn read_records<R: Read>(&mut self, input: R) -> Result<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(input);
        let headers = reader.headers()?.clone();
        self.set_headers(&headers);

        self.records.clear();
        for (i, result) in reader.records().enumerate() {
            let row = result?;
            let fields = self
                .headers
                .iter()
                .cloned()
                .zip(row.iter().map(str::to_string))
                .collect();
            self.records.push(Record::new(i + 1, fields));
        }
        Ok(())
    }

    /// Processes raw CSV rows with a custom function.
    pub fn process_rows<R, F>(&self, input: R, mut processor: F) -> Result<()>
    where
        R: Read,
        F: FnMut(&[String]) -> Result<()>,
    {
        let mut reader = ReaderBuilder::new().has_headers(false).from_reader(input);

        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            processor(&row)?;
        }

        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.header_indices.contains_key(name)
    }

    /// Returns every value of a column, in record order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = *self.header_indices.get(name)?;
        Some(
            self.records
                .iter()
                .map(|r| r.fields[index].1.as_str())
                .collect(),
        )
    }

    /// The names among `names` that are not columns, in the given order.
    pub fn missing_columns<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|n| !self.has_column(n))
            .map(str::to_string)
            .collect()
    }

    fn set_headers(&mut self, headers: &StringRecord) {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        // Duplicate column names resolve to their first occurrence.
        self.header_indices.clear();
        for (i, h) in self.headers.iter().enumerate() {
            self.header_indices.entry(h.clone()).or_insert(i);
        }
    }
}

/// Locates the data file of a template: same directory, same stem, `.csv`.
pub fn companion_csv(template: &Path) -> Result<PathBuf> {
    let is_csv = template
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv || template.file_stem().is_none() {
        return Err(Error::InvalidTemplatePath(template.to_path_buf()));
    }
    Ok(template.with_extension("csv"))
}

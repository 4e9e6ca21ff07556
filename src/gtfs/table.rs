use csv;
use std::collections;
use std::io;
use std::io::BufRead;
use std::iter;

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

// Row is a single GTFS record: field names mapped to their raw text values, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    // get_or_empty returns the field's value, or "" when the row lacks it.
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    // insert sets a field, keeping its position if it already exists and appending otherwise.
    pub fn insert(&mut self, field: &str, value: &str) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((field.to_string(), value.to_string())),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> iter::FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(fields: I) -> Self {
        Row {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// Table maps string keys to values, remembering the order in which keys were first inserted.
// Re-inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V> {
    index: collections::HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

// A point of a shape, as (latitude, longitude).
pub type Point = (f64, f64);

pub type ToOne = Table<Row>;
pub type ToMany = Table<Vec<Row>>;
pub type ToPoints = Table<Vec<Point>>;

impl<V> Default for Table<V> {
    fn default() -> Self {
        Table {
            index: collections::HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // first returns the value of the earliest inserted key.
    pub fn first(&self) -> Option<&V> {
        self.entries.first().map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub(crate) fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, value)| value)
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, V)> {
        self.entries.into_iter()
    }
}

impl<V: Default> Table<V> {
    // entry returns the value under key, inserting a default one first if needed.
    pub(crate) fn entry(&mut self, key: String) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }
}

impl<T> Table<Vec<T>> {
    // flat_values iterates over every element of every list, in key insertion order.
    pub fn flat_values(&self) -> impl Iterator<Item = &T> {
        self.values().flatten()
    }
}

// TableLoadError is an error that stops a single table from loading.
#[derive(Debug, thiserror::Error)]
pub enum TableLoadError {
    #[error("error reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("error reading input: {0}")]
    Io(#[from] io::Error),
    #[error("row on line {line} is missing its key field {field}")]
    MissingKey { field: &'static str, line: u64 },
}

// Rows streams the records of a CSV table as Rows, paired with their line numbers.
// The header is line 1 and every record after it takes one line, whatever the line endings.
pub struct Rows<R: io::Read> {
    header: csv::StringRecord,
    records: csv::StringRecordsIntoIter<io::BufReader<R>>,
    line: u64,
}

impl<R: io::Read> Rows<R> {
    // new consumes an optional byte-order mark and the header line.
    pub fn new(reader: R) -> Result<Self, TableLoadError> {
        let mut reader = io::BufReader::new(reader);
        if reader.fill_buf()?.starts_with(UTF8_BOM) {
            reader.consume(UTF8_BOM.len());
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let header = csv_reader.headers()?.clone();

        Ok(Rows {
            header,
            records: csv_reader.into_records(),
            line: 1,
        })
    }

    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.header.iter()
    }
}

impl<R: io::Read> Iterator for Rows<R> {
    type Item = Result<(u64, Row), TableLoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record_result = self.records.next()?;
        self.line += 1;
        let line = self.line;
        let header = &self.header;
        Some(record_result.map_err(TableLoadError::Csv).map(|record| {
            // zip the header and record together; a short record just lacks its trailing fields.
            let row = iter::zip(header.iter(), record.iter()).collect::<Row>();
            (line, row)
        }))
    }
}

// key_of returns the value of a row's key field, or MissingKey if the row lacks it.
pub(crate) fn key_of(row: &Row, field: &'static str, line: u64) -> Result<String, TableLoadError> {
    row.get(field)
        .map(str::to_string)
        .ok_or(TableLoadError::MissingKey { field, line })
}

// load_to_one keys each row by key_field; on a duplicate key the later row wins.
pub(crate) fn load_to_one<R: io::Read>(
    rows: Rows<R>,
    key_field: &'static str,
) -> Result<ToOne, TableLoadError> {
    rows.into_iter().try_fold(ToOne::new(), |mut table, row_result| {
        let (line, row) = row_result?;
        table.insert(key_of(&row, key_field, line)?, row);
        Ok(table)
    })
}

// load_to_many groups rows under key_field, keeping source order inside each group.
pub(crate) fn load_to_many<R: io::Read>(
    rows: Rows<R>,
    key_field: &'static str,
) -> Result<ToMany, TableLoadError> {
    rows.into_iter().try_fold(ToMany::new(), |mut table, row_result| {
        let (line, row) = row_result?;
        table.entry(key_of(&row, key_field, line)?).push(row);
        Ok(table)
    })
}

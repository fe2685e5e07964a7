//! Functions for writing CSV format.
pub use csv::Error;
use crate::sim::History;
use csv::Writer;
use serde::Serialize;

/// Dump records to CSV string, the header is taken from the field names.
pub fn dump_csv<'a, I, S>(records: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = &'a S>,
    S: Serialize + 'a,
{
    let mut w = Writer::from_writer(Vec::new());
    records.into_iter().try_for_each(|r| w.serialize(r))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}

/// Write records to a writer in CSV format.
pub fn write_csv<'a, W, I, S>(writer: W, records: I) -> Result<(), Error>
where
    W: std::io::Write,
    I: IntoIterator<Item = &'a S>,
    S: Serialize + 'a,
{
    let mut w = Writer::from_writer(writer);
    records.into_iter().try_for_each(|r| w.serialize(r))?;
    w.flush()?;
    Ok(())
}

impl<T: Serialize> History<T> {
    /// Dump the history window to CSV string, from the oldest sample.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        dump_csv(self)
    }
}

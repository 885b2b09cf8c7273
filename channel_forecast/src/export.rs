//! Writers for prediction bundles

use crate::assembler::PredictionBundle;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn create_with_parents(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

impl PredictionBundle {
    /// Pretty-printed JSON document
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON document, replacing any previous snapshot.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = create_with_parents(path.as_ref())?;
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write one `date,method,metric,value` row per forecast value.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(create_with_parents(path.as_ref())?);
        writer.write_record(["date", "method", "metric", "value"])?;

        for (method, metrics) in &self.predictions {
            for (metric, forecast) in metrics {
                for (date, value) in self.dates.iter().zip(forecast.to_f64()) {
                    writer.write_record([
                        date.format("%Y-%m-%d").to_string(),
                        method.to_string(),
                        metric.to_string(),
                        value.to_string(),
                    ])?;
                }
            }
        }

        writer.flush()?;
        Ok(())
    }
}

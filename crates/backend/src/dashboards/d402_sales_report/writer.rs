use anyhow::Result;
use contracts::dashboards::d402_sales_report::ExportPayload;

/// Turns a tabular payload into file bytes
pub trait ExportWriter: Send + Sync {
    fn write(&self, payload: &ExportPayload) -> Result<Vec<u8>>;

    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;
}

/// Semicolon-separated CSV with a UTF-8 BOM so spreadsheet apps pick the encoding.
/// Sections follow each other, separated by an empty line.
#[derive(Debug, Default)]
pub struct CsvExportWriter;

const DELIMITER: u8 = b';';

impl ExportWriter for CsvExportWriter {
    fn write(&self, payload: &ExportPayload) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = "\u{FEFF}".as_bytes().to_vec();

        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(DELIMITER)
                .flexible(true)
                .from_writer(&mut buffer);

            writer.write_record([payload.title.as_str()])?;
            writer.write_record([payload.filter_summary_primary.as_str()])?;
            if !payload.filter_summary_secondary.is_empty() {
                writer.write_record([payload.filter_summary_secondary.as_str()])?;
            }

            for section in &payload.sections {
                writer.write_record([""])?;
                writer.write_record([section.title.as_str()])?;
                writer.write_record(&section.headers)?;
                for row in &section.rows {
                    writer.write_record(row)?;
                }
            }

            writer.write_record([""])?;
            writer.write_record([
                "Total Pendapatan".to_string(),
                payload.summary.total_revenue.round_dp(2).to_string(),
            ])?;
            writer.write_record([
                "Total Unit".to_string(),
                payload.summary.total_quantity.to_string(),
            ])?;
            writer.flush()?;
        }

        Ok(buffer)
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}

use std::borrow::Cow;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{
    entities::system_logs::LogEntry,
    errors::{ReportingError, ReportingResult},
    value_objects::{
        enums::export_formats::{LogExportFormat, ReportFormat},
        exports::ExportPayload,
        transactions::TransactionRecord,
    },
};

const CSV_DELIMITER: char = ',';
const EXCEL_DELIMITER: char = '\t';
const LINE_END: &str = "\r\n";

/// A row that can be rendered into every download format.
pub trait ExportRecord: Serialize {
    fn headers() -> &'static [&'static str];
    /// Cell values in the same order as [`ExportRecord::headers`].
    fn fields(&self) -> Vec<String>;
    fn text_line(&self) -> String;
}

pub fn format_records<R: ExportRecord>(
    records: &[R],
    format: LogExportFormat,
    base_name: &str,
    now: DateTime<Utc>,
) -> ReportingResult<ExportPayload> {
    let bytes = match format {
        LogExportFormat::Csv => write_delimited(records, CSV_DELIMITER),
        LogExportFormat::Json => write_json(records)?,
        LogExportFormat::Txt => write_text(records),
    };

    Ok(ExportPayload {
        bytes,
        content_type: format.content_type(),
        filename: timestamped_filename(base_name, format.extension(), now),
    })
}

pub fn format_report<R: ExportRecord>(
    records: &[R],
    format: ReportFormat,
    base_name: &str,
    now: DateTime<Utc>,
) -> ReportingResult<ExportPayload> {
    let bytes = match format {
        ReportFormat::Pdf => return Err(ReportingError::Unsupported("pdf report")),
        ReportFormat::Csv => write_delimited(records, CSV_DELIMITER),
        ReportFormat::Excel => write_delimited(records, EXCEL_DELIMITER),
    };

    Ok(ExportPayload {
        bytes,
        content_type: format.content_type(),
        filename: timestamped_filename(base_name, format.extension(), now),
    })
}

pub fn timestamped_filename(base_name: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{base_name}_{}.{extension}", now.format("%Y%m%d_%H%M%S"))
}

fn write_json<R: ExportRecord>(records: &[R]) -> ReportingResult<Vec<u8>> {
    let bytes = serde_json::to_vec_pretty(records).context("export_formatter: json encoding")?;
    Ok(bytes)
}

fn write_text<R: ExportRecord>(records: &[R]) -> Vec<u8> {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.text_line());
        out.push('\n');
    }
    out.into_bytes()
}

fn write_delimited<R: ExportRecord>(records: &[R], delimiter: char) -> Vec<u8> {
    let mut out = String::new();
    push_row(
        &mut out,
        R::headers().iter().map(|header| header.to_string()),
        delimiter,
    );
    for record in records {
        push_row(&mut out, record.fields(), delimiter);
    }
    out.into_bytes()
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>, delimiter: char) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(delimiter);
        }
        out.push_str(&quote_field(&field, delimiter));
    }
    out.push_str(LINE_END);
}

/// RFC 4180: quote when the cell holds the delimiter, a quote or a line break; double inner quotes.
pub fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\r' | '\n'));

    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ExportRecord for LogEntry {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "timestamp",
            "level",
            "user",
            "action",
            "ip_address",
            "details",
            "category",
            "stack_trace",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            rfc3339(self.timestamp),
            self.level.label().to_string(),
            self.user.clone(),
            self.action.clone(),
            self.ip_address.clone().unwrap_or_default(),
            self.details.clone(),
            self.category.clone().unwrap_or_default(),
            self.stack_trace.clone().unwrap_or_default(),
        ]
    }

    fn text_line(&self) -> String {
        let mut line = format!(
            "[{}] {} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level.label(),
            self.user,
            self.action
        );
        if !self.details.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.details.replace(['\r', '\n'], " "));
        }
        if let Some(ip) = &self.ip_address {
            line.push_str(&format!(" (ip {ip})"));
        }
        line
    }
}

impl ExportRecord for TransactionRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "transaction_id",
            "created_at",
            "user_id",
            "plan_name",
            "amount",
            "status",
            "payment_method",
            "payment_id",
            "billing_period",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.transaction_id.to_string(),
            rfc3339(self.created_at),
            self.user_id.to_string(),
            self.plan_name.clone(),
            self.amount.clone(),
            self.status.clone(),
            self.payment_method.clone(),
            self.payment_id.clone().unwrap_or_default(),
            self.billing_period.clone(),
        ]
    }

    fn text_line(&self) -> String {
        format!(
            "[{}] {} {} {} {} via {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.transaction_id,
            self.plan_name,
            self.amount,
            self.status,
            self.payment_method
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::log_levels::LogLevel;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()
    }

    fn log(details: &str) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap(),
            level: LogLevel::Error,
            user: "alice".to_string(),
            action: "Payment failed".to_string(),
            ip_address: Some("10.0.0.1".to_string()),
            details: details.to_string(),
            stack_trace: None,
            category: Some("Payments".to_string()),
        }
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote_field("plain", ','), "plain");
        assert_eq!(quote_field("a,b", ','), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("line\nbreak", ','), "\"line\nbreak\"");
        assert_eq!(quote_field("a,b", '\t'), "a,b");
        assert_eq!(quote_field("a\tb", '\t'), "\"a\tb\"");
    }

    #[test]
    fn csv_has_header_and_crlf_rows() {
        let payload = format_records(
            &[log("card declined, retry")],
            LogExportFormat::Csv,
            "system_logs",
            now(),
        )
        .unwrap();

        let text = String::from_utf8(payload.bytes).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[2].is_empty());
        assert_eq!(lines[0], LogEntry::headers().join(","));
        assert!(lines[1].contains(",ERROR,alice,"));
        assert!(lines[1].contains("\"card declined, retry\""));
        assert_eq!(payload.content_type, "text/csv; charset=utf-8");
        assert_eq!(payload.filename, "system_logs_20250203_040506.csv");
    }

    #[test]
    fn json_parses_back_into_equal_records() {
        let records = vec![log("first"), log("second \"quoted\"")];

        let payload =
            format_records(&records, LogExportFormat::Json, "system_logs", now()).unwrap();
        let parsed: Vec<LogEntry> = serde_json::from_slice(&payload.bytes).unwrap();

        assert_eq!(parsed, records);
        assert_eq!(payload.content_type, "application/json");
    }

    #[test]
    fn txt_writes_one_line_per_record() {
        let payload = format_records(
            &[log("multi\nline"), log("")],
            LogExportFormat::Txt,
            "system_logs",
            now(),
        )
        .unwrap();

        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("[2025-01-15 08:30:00] ERROR alice: Payment failed - multi line"));
    }

    #[test]
    fn excel_is_tab_separated_and_pdf_is_unsupported() {
        let records = vec![log("x")];

        let excel = format_report(&records, ReportFormat::Excel, "logs_report", now()).unwrap();
        let text = String::from_utf8(excel.bytes).unwrap();
        assert!(text.starts_with("id\ttimestamp\tlevel"));
        assert_eq!(excel.content_type, "application/vnd.ms-excel");
        assert!(excel.filename.ends_with(".xls"));

        let pdf = format_report(&records, ReportFormat::Pdf, "logs_report", now());
        assert!(matches!(pdf, Err(ReportingError::Unsupported(_))));
    }

    #[test]
    fn empty_set_still_has_a_header() {
        let payload =
            format_records::<LogEntry>(&[], LogExportFormat::Csv, "system_logs", now()).unwrap();
        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(text, format!("{}\r\n", LogEntry::headers().join(",")));
    }
}

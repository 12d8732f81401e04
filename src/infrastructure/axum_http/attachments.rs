use axum::{
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::domain::value_objects::exports::ExportPayload;

/// Wraps an export as a file download.
pub fn attachment(payload: ExportPayload) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", payload.filename);

    let mut response = payload.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(payload.content_type),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_headers_are_set() {
        let response = attachment(ExportPayload {
            bytes: b"id\r\n".to_vec(),
            content_type: "text/csv",
            filename: "system_logs_20250101_000000.csv".to_string(),
        });

        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"system_logs_20250101_000000.csv\""
        );
    }
}

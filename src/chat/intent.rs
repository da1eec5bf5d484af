use regex::Regex;
use std::sync::OnceLock;

use crate::backend::models::UploadRoute;

fn enrichment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)update.*(attendee|list)|enrich.*(attendee|list)").expect("enrichment pattern is valid")
    })
}

pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_enrichment_request(input: &str, staged_file: Option<&str>) -> bool {
    let is_csv = staged_file
        .and_then(file_extension)
        .is_some_and(|ext| ext == "csv");
    is_csv && enrichment_pattern().is_match(input)
}

pub fn route_upload(file_name: &str, enrichment: bool) -> UploadRoute {
    match file_extension(file_name).as_deref() {
        Some("pdf") => UploadRoute::UploadPdf,
        _ if enrichment => UploadRoute::UpdateAttendeeList,
        _ => UploadRoute::UploadCsv,
    }
}

pub fn is_spreadsheet(file_name: &str) -> bool {
    matches!(file_extension(file_name).as_deref(), Some("csv" | "xlsx" | "xls"))
}

use crate::backend::models::EnrichmentResponse;

pub const MAX_TITLE_WORDS: usize = 5;

pub fn sanitize_title(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\'' | '"' | '\n' | '\r')).collect();
    let cleaned = cleaned.trim();

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.len() > MAX_TITLE_WORDS {
        format!("{}...", words[..MAX_TITLE_WORDS].join(" "))
    } else {
        cleaned.to_string()
    }
}

pub fn download_link(public_base: &str, download_url: &str) -> String {
    if download_url.starts_with("http://") || download_url.starts_with("https://") {
        return download_url.to_string();
    }
    format!(
        "{}/{}",
        public_base.trim_end_matches('/'),
        download_url.trim_start_matches('/')
    )
}

pub fn enrichment_summary(response: &EnrichmentResponse, public_base: &str) -> String {
    let summary = &response.summary;
    format!(
        "✅ Enrichment Complete \u{2014} Updated: {}, Skipped: {}, Errors: {}<br><br>📎 <a href=\"{}\" style=\"color:#2563eb;text-decoration:underline;\">Download CSV</a>",
        summary.updated,
        summary.skipped,
        summary.errors,
        download_link(public_base, &response.download_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::EnrichmentSummary;

    #[test]
    fn strips_quotes_and_newlines() {
        assert_eq!(sanitize_title("\"PNWER Summit Logistics\"\n"), "PNWER Summit Logistics");
        assert_eq!(sanitize_title("'Trade' talks"), "Trade talks");
    }

    #[test]
    fn truncates_long_titles() {
        assert_eq!(
            sanitize_title("Overview of the annual summit attendee plans"),
            "Overview of the annual summit..."
        );
        assert_eq!(sanitize_title("exactly five words right here"), "exactly five words right here");
    }

    #[test]
    fn summary_embeds_counts_and_link() {
        let response = EnrichmentResponse {
            summary: EnrichmentSummary {
                updated: 12,
                skipped: 3,
                errors: 1,
            },
            download_url: "/downloads/enriched.csv".to_string(),
        };
        let text = enrichment_summary(&response, "https://backend.example/");

        assert_eq!(
            text,
            "✅ Enrichment Complete \u{2014} Updated: 12, Skipped: 3, Errors: 1<br><br>📎 \
             <a href=\"https://backend.example/downloads/enriched.csv\" \
             style=\"color:#2563eb;text-decoration:underline;\">Download CSV</a>"
        );
    }

    #[test]
    fn absolute_download_urls_pass_through() {
        assert_eq!(
            download_link("https://backend.example", "https://cdn.example/x.csv"),
            "https://cdn.example/x.csv"
        );
    }
}

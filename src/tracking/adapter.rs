use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::TrackerError;
use crate::rank::ResultEntry;

/// Seam to whatever fetches a result page. The engine never touches HTML;
/// an adapter returns entries already in page order.
#[async_trait]
pub trait ResultPageAdapter: Send + Sync {
    async fn fetch(
        &self,
        keyword: &str,
        location_encoding: &str,
        result_count: u32,
    ) -> Result<Vec<ResultEntry>, TrackerError>;
}

/// Adapter that reads result pages from JSON files dropped by an external
/// fetcher. The file for a keyword is `<slug>.json` in the configured
/// directory, holding an array of `{ "url": ..., "title": ... }` objects in
/// page order. A missing or unreadable file is a fetch failure.
pub struct JsonFileAdapter {
    dir: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_for(&self, keyword: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(keyword)))
    }
}

#[async_trait]
impl ResultPageAdapter for JsonFileAdapter {
    async fn fetch(
        &self,
        keyword: &str,
        _location_encoding: &str,
        result_count: u32,
    ) -> Result<Vec<ResultEntry>, TrackerError> {
        let path = self.file_for(keyword);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| TrackerError::Transport(format!("read {}: {err}", path.display())))?;

        let mut entries: Vec<ResultEntry> = serde_json::from_str(&raw)
            .map_err(|err| TrackerError::Transport(format!("parse {}: {err}", path.display())))?;

        entries.truncate(result_count as usize);
        Ok(entries)
    }
}

fn slug(keyword: &str) -> String {
    keyword
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn slug_flattens_whitespace_and_symbols() {
        assert_eq!(slug("Gym near me!"), "gym-near-me-");
        assert_eq!(slug("coffee"), "coffee");
    }

    #[tokio::test]
    async fn reads_entries_in_order_and_truncates() {
        let dir = std::env::temp_dir().join(format!("rankwatch-fixtures-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("gym.json"),
            r#"[{"url":"a.com","title":"A"},{"url":"b.com","title":"B"},{"url":"c.com","title":"C"}]"#,
        )
        .unwrap();

        let adapter = JsonFileAdapter::new(dir);
        let entries = adapter.fetch("gym", "", 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "a.com");
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_error() {
        let dir = std::env::temp_dir().join(format!("rankwatch-fixtures-{}", Uuid::new_v4()));
        let adapter = JsonFileAdapter::new(dir);
        let err = adapter.fetch("gym", "", 10).await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
    }
}

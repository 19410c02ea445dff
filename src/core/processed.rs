use crate::domain::model::AppId;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{Local, NaiveDate};

/// Per-day record of app ids whose download finished, one id per line.
#[derive(Debug, Clone)]
pub struct ProcessedLog {
    file_name: String,
    ids: Vec<AppId>,
}

impl ProcessedLog {
    pub fn file_name_for(date: NaiveDate) -> String {
        format!("idprocessed_on_{}.txt", date.format("%Y%m%d"))
    }

    pub fn today_file_name() -> String {
        Self::file_name_for(Local::now().date_naive())
    }

    pub async fn load<S: Storage>(storage: &S, file_name: String) -> Result<Self> {
        let ids = match storage.read_file(&file_name).await? {
            Some(bytes) => parse_ids(&String::from_utf8_lossy(&bytes)),
            None => Vec::new(),
        };

        tracing::debug!("Loaded {} processed app ids from {}", ids.len(), file_name);
        Ok(Self { file_name, ids })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn ids(&self) -> &[AppId] {
        &self.ids
    }

    pub fn contains(&self, app_id: AppId) -> bool {
        self.ids.contains(&app_id)
    }

    pub async fn mark<S: Storage>(&mut self, storage: &S, app_id: AppId) -> Result<()> {
        if self.contains(app_id) {
            return Ok(());
        }
        self.ids.push(app_id);

        let mut content = String::new();
        for id in &self.ids {
            content.push_str(&id.to_string());
            content.push('\n');
        }
        storage.write_file(&self.file_name, content.as_bytes()).await
    }
}

fn parse_ids(content: &str) -> Vec<AppId> {
    let mut ids = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.parse::<AppId>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring line in processed log: {}", e),
        }
    }
    ids
}

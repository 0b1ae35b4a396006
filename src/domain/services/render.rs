#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use crate::domain::models::QueryResult;
use crate::domain::models::Source;
use crate::domain::models::UploadItem;
use crate::domain::models::UploadStatus;

pub struct Render {}

impl Render {
    pub fn status_label(status: UploadStatus) -> &'static str {
        match status {
            UploadStatus::Pending => return "pending",
            UploadStatus::Success => return "ok",
            UploadStatus::Failed => return "failed",
        }
    }

    /// One line per item, numbered from 1 so the index can be fed to `/remove`.
    pub fn item(idx: usize, item: &UploadItem) -> String {
        let mut res = format!(
            "({}) [{}] {}",
            idx + 1,
            Render::status_label(item.status),
            item.file.name
        );

        if let Some(message) = &item.message {
            res = format!("{res}: {message}");
        }

        return res;
    }

    pub fn items(items: &[UploadItem]) -> String {
        if items.is_empty() {
            return "No uploads yet.".to_string();
        }

        return items
            .iter()
            .enumerate()
            .map(|(idx, item)| return Render::item(idx, item))
            .collect::<Vec<String>>()
            .join("\n");
    }

    pub fn source(source: &Source) -> String {
        let mut heading = format!("[{}] {}", source.source_num, source.document);
        if let Some(page) = source.page {
            heading = format!("{heading}, page {page}");
        }

        let excerpt = source
            .excerpt
            .trim()
            .split('\n')
            .map(|line| return format!("    {}", line.trim()))
            .collect::<Vec<String>>()
            .join("\n");

        return format!("{heading}\n    {}\n{excerpt}", source.source);
    }

    pub fn query_result(result: &QueryResult) -> String {
        let answer = result.answer.trim().to_string();
        if result.sources.is_empty() {
            return answer;
        }

        let sources = result
            .sources
            .iter()
            .map(Render::source)
            .collect::<Vec<String>>()
            .join("\n\n");

        return format!("{answer}\n\nSources:\n{sources}");
    }
}

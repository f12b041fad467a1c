//! JSON file helpers shared by the config, preference and language files.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use uuid::Uuid;

use crate::error::GatherError;

/// Read and parse a JSON document. `Ok(None)` when the file does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, GatherError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Pretty-print `value` to `path`, replacing any previous content in one rename.
///
/// Each call writes its own temp file, so concurrent writers never rename a
/// half-written sibling into place.
pub(crate) async fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), GatherError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gather_away_storage_{}_{}", name, Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let path = scratch_dir("missing").join("nope.json");
        let value: Option<Vec<String>> = read_json(&path).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_reads_back() {
        let dir = scratch_dir("write");
        let path = dir.join("nested").join("doc.json");

        let mut doc = BTreeMap::new();
        doc.insert("k".to_string(), "v".to_string());
        write_json_atomic(&path, &doc).await.unwrap();

        let back: Option<BTreeMap<String, String>> = read_json(&path).await.unwrap();
        assert_eq!(back, Some(doc));

        let mut entries = tokio::fs::read_dir(path.parent().unwrap()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["doc.json".to_string()]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_leave_valid_document() {
        let dir = scratch_dir("concurrent");
        let path = dir.join("doc.json");

        let mut tasks = Vec::new();
        for n in 0..32usize {
            let path = path.clone();
            tasks.push(tokio::spawn(async move {
                let doc: Vec<usize> = (0..=n * 50).collect();
                write_json_atomic(&path, &doc).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let back: Vec<usize> = read_json(&path).await.unwrap().unwrap();
        assert_eq!(back, (0..back.len()).collect::<Vec<_>>());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error() {
        let dir = scratch_dir("malformed");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("bad.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = read_json::<Vec<String>>(&path).await.unwrap_err();
        assert!(matches!(err, GatherError::JsonDecode(_)));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}

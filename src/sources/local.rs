//! Symbol list on local disk

use super::SymbolSource;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SymbolSource for LocalFileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_symbol_list(&self) -> Result<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!("CSV file not found: {}", self.path.display());
                Err(AppError::NotFound(format!("CSV file not found: {}", self.path.display())))
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stocks.csv");
        std::fs::write(&path, b"Test Company,1rPTC\n").unwrap();

        let source = LocalFileSource::new(path);
        assert_eq!(source.fetch_symbol_list().await.unwrap(), b"Test Company,1rPTC\n".to_vec());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let source = LocalFileSource::new(dir.path().join("missing.csv"));
        let err = source.fetch_symbol_list().await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

//! Append-only order log in JSON Lines format.
//!
//! One order per line. Appends are serialized through a mutex so
//! concurrent chats never interleave partial lines.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::ports::{CollaboratorError, OrderRecord, OrderRecorder, RecordAck};

#[derive(Debug)]
pub struct JsonOrderRecorder {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonOrderRecorder {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads back every recorded order. A missing file is an empty log.
    pub async fn read_all(&self) -> Result<Vec<OrderRecord>, CollaboratorError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CollaboratorError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| CollaboratorError::malformed_response(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl OrderRecorder for JsonOrderRecorder {
    async fn record_order(&self, order: OrderRecord) -> Result<RecordAck, CollaboratorError> {
        order.validate()?;
        let mut line = serde_json::to_string(&order)
            .map_err(|e| CollaboratorError::storage(format!("Failed to serialize order: {}", e)))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    CollaboratorError::storage(format!("Failed to create directory: {}", e))
                })?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                CollaboratorError::storage(format!("Failed to open {}: {}", self.path.display(), e))
            })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| CollaboratorError::storage(format!("Failed to append order: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| CollaboratorError::storage(format!("Failed to flush order log: {}", e)))?;

        tracing::info!(order_id = %order.order_id, path = %self.path.display(), "Order recorded");
        Ok(RecordAck { ok: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Pincode;
    use crate::domain::foundation::{OrderId, Sku};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn order(address: &str) -> OrderRecord {
        OrderRecord::single(
            OrderId::generate(),
            Sku::new("RUN-002").unwrap(),
            address,
            Pincode::parse("560001").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn appends_one_line_per_order() {
        let dir = TempDir::new().unwrap();
        let recorder = JsonOrderRecorder::new(dir.path().join("data/orders.jsonl"));

        let first = order("house 1, 560001");
        recorder.record_order(first.clone()).await.unwrap();
        recorder.record_order(order("house 2, 560001")).await.unwrap();

        let all = recorder.read_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
    }

    #[tokio::test]
    async fn missing_log_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let recorder = JsonOrderRecorder::new(dir.path().join("orders.jsonl"));
        assert!(recorder.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let recorder = Arc::new(JsonOrderRecorder::new(dir.path().join("orders.jsonl")));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let recorder = Arc::clone(&recorder);
                tokio::spawn(async move {
                    recorder
                        .record_order(order(&format!("house {}, 560001", i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(recorder.read_all().await.unwrap().len(), 20);
    }
}

// src/logging/runtime_logger.rs

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task;
use tokio::time::{self, Duration};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::fmt::MakeWriter;

/// Batched runtime log: entries are queued over an mpsc channel and flushed
/// to an hourly-rolling JSON-lines file by a background task, either when the
/// batch fills or on the flush interval, whichever comes first.
pub struct RuntimeLogger {
    sender: Sender<String>,
}

impl RuntimeLogger {
    /// - `buffer_size`: channel capacity
    /// - `batch_size`: entries per write
    /// - `flush_interval_ms`: forced flush period
    pub fn new(
        log_dir: &str,
        file_prefix: &str,
        buffer_size: usize,
        batch_size: usize,
        flush_interval_ms: u64,
    ) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let appender = Arc::new(rolling::hourly(log_dir, format!("{file_prefix}.json")));
        tokio::spawn(Self::writer_loop(
            appender,
            receiver,
            batch_size,
            flush_interval_ms,
        ));
        Arc::new(Self { sender })
    }

    pub async fn log(&self, level: &str, message: &str) {
        let line = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "message": message,
        })
        .to_string();
        if let Err(e) = self.sender.send(line).await {
            eprintln!("Failed to queue runtime log message: {e}");
        }
    }

    async fn writer_loop(
        appender: Arc<RollingFileAppender>,
        mut receiver: Receiver<String>,
        batch_size: usize,
        flush_interval_ms: u64,
    ) {
        let mut buffer: Vec<String> = Vec::new();
        let mut ticker = time::interval(Duration::from_millis(flush_interval_ms));
        loop {
            tokio::select! {
                entry = receiver.recv() => match entry {
                    Some(line) => {
                        buffer.push(line);
                        if buffer.len() >= batch_size {
                            Self::flush(appender.clone(), &mut buffer).await;
                        }
                    }
                    // Channel closed: drain and stop.
                    None => {
                        Self::flush(appender.clone(), &mut buffer).await;
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !buffer.is_empty() {
                        Self::flush(appender.clone(), &mut buffer).await;
                    }
                }
            }
        }
    }

    async fn flush(appender: Arc<RollingFileAppender>, buffer: &mut Vec<String>) {
        if buffer.is_empty() {
            return;
        }
        let content = buffer.join("\n") + "\n";
        buffer.clear();
        let result = task::spawn_blocking(move || {
            let mut writer = appender.make_writer();
            writer.write_all(content.as_bytes())
        })
        .await;
        match result {
            Ok(Err(e)) => eprintln!("Failed to write runtime logs: {e}"),
            Err(e) => eprintln!("Runtime log writer task failed: {e}"),
            Ok(Ok(())) => {}
        }
    }

    /// Give the background writer a moment to drain before exit.
    pub async fn shutdown(&self) {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

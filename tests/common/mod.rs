//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use archlens::config::Config;
use archlens::ports::{GatewayError, GatewayFuture, ModelCall, ModelGateway, SleepFuture, Sleeper};

/// One archive entry.
pub enum Entry<'a> {
    Dir(&'a str),
    File(&'a str, &'a str),
}

/// Builds a ZIP archive in memory.
pub fn zip_bytes(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for entry in entries {
        match entry {
            Entry::Dir(name) => writer.add_directory(*name, options).unwrap(),
            Entry::File(name, body) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(body.as_bytes()).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Writes a ZIP archive to `dir/name`.
pub fn write_zip(dir: &Path, name: &str, entries: &[Entry<'_>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, zip_bytes(entries)).unwrap();
    path
}

/// Zeroes the local-header signature of entry `index`.
pub fn break_local_header(bytes: &mut [u8], index: usize) {
    let offset = bytes
        .windows(4)
        .enumerate()
        .filter(|(_, window)| *window == b"PK\x03\x04")
        .nth(index)
        .map(|(offset, _)| offset)
        .expect("archive has fewer entries");
    bytes[offset..offset + 4].copy_from_slice(&[0; 4]);
}

/// A small Express project with explicit directory entries.
pub fn demo_entries() -> Vec<Entry<'static>> {
    vec![
        Entry::File("package.json", r#"{"name":"demo","dependencies":{"express":"^4"}}"#),
        Entry::Dir("src/"),
        Entry::File("src/index.js", "require('./utils/helper');"),
        Entry::Dir("src/utils/"),
        Entry::File("src/utils/helper.js", "module.exports = {};"),
    ]
}

/// Configuration with uploads under `dir` and no inter-stage pause.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.upload.dir = dir.join("uploads");
    config.stage_delay = Duration::ZERO;
    config
}

/// Number of files left in the upload directory.
pub fn staged_files(config: &Config) -> usize {
    std::fs::read_dir(&config.upload.dir).map_or(0, |entries| entries.count())
}

/// Wraps `body` in the chat-completion envelope, inside a json fence.
pub fn model_reply(body: &Value) -> Value {
    json!({
        "status": {"code": "20000", "message": "OK"},
        "result": {"message": {"role": "assistant", "content": format!("```json\n{body:#}\n```")}}
    })
}

pub fn stage1_body() -> Value {
    json!({
        "boundaries": {
            "backend": {
                "architecturePatterns": [{"name": "Layered", "evidence": ["src/utils"]}],
                "layers": [
                    {"name": "Entry", "responsibility": "bootstrap", "characteristics": ["index.js"]},
                    {"name": "Utility", "responsibility": "helpers", "characteristics": ["utils/"]},
                    {"name": "Domain", "responsibility": "rules", "characteristics": []}
                ],
                "dependencyFlow": "Entry -> Utility"
            }
        },
        "crossBoundaryInteraction": "single boundary"
    })
}

pub fn stage2_body() -> Value {
    json!({
        "boundaries": {
            "backend": {"layers": [
                {"name": "Entry", "folders": ["src"], "files": ["src/index.js"]},
                {"name": "Utility", "folders": ["src/utils"], "files": ["src/utils/helper.js"]}
            ]}
        },
        "assumptions": ["package.json treated as configuration"]
    })
}

/// Gateway serving queued replies and recording the calls it saw.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<Value, GatewayError>>>,
    pub calls: Arc<Mutex<Vec<ModelCall>>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<Value, GatewayError>>) -> (Self, Arc<Mutex<Vec<ModelCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let gateway = Self { replies: Mutex::new(replies.into()), calls: Arc::clone(&calls) };
        (gateway, calls)
    }
}

impl ModelGateway for ScriptedGateway {
    fn call(&self, call: &ModelCall) -> GatewayFuture<'_> {
        self.calls.lock().unwrap().push(call.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport(&call.label, "no scripted reply")));
        Box::pin(async move { reply })
    }
}

/// Sleeper that only counts how often it was asked to wait.
pub struct CountingSleeper(pub Arc<AtomicUsize>);

impl CountingSleeper {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (Self(Arc::clone(&count)), count)
    }
}

impl Sleeper for CountingSleeper {
    fn sleep(&self, _duration: Duration) -> SleepFuture<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Box::pin(std::future::ready(()))
    }
}

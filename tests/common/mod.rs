#![allow(dead_code)]

use altrouter::{handler, Handler, HandlersMap, Request};
use std::sync::{Arc, Mutex};

pub fn request(method: &str, path: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Vec::new())
        .unwrap()
}

pub fn get(path: &str) -> Request {
    request("GET", path)
}

/// Shared log of which handlers ran, in order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    /// A handler that records `tag` and writes it as the body.
    pub fn recorder(&self, tag: &str) -> Arc<dyn Handler> {
        let log = self.clone();
        let tag = tag.to_string();
        handler(move |res, _req| {
            log.push(tag.clone());
            res.write(tag.as_bytes());
            Ok(())
        })
    }
}

/// A handler table with one entry per `(method, handler)`.
pub fn handlers(entries: Vec<(&str, Arc<dyn Handler>)>) -> HandlersMap {
    entries
        .into_iter()
        .map(|(m, h)| (m.to_string(), h))
        .collect()
}

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a fresh temporary file with the given extension.
    pub fn create(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("altrouter_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_toml(content: &str) -> NamedTempFile {
        create(content, "toml")
    }
}

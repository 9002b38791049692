#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use webdav_publish_core::contract::MockWebDavClient;

pub const BASE_URL: &str = "https://dav.example.com/store";

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// A mock client that answers every call through `mkcol` / `put` and records
/// each request as `"MKCOL <url>"` or `"PUT <url>"`, in order.
pub fn recording_client<M, P>(mkcol: M, put: P) -> (MockWebDavClient, CallLog)
where
    M: Fn(&str) -> StatusCode + Send + 'static,
    P: Fn(&str) -> StatusCode + Send + 'static,
{
    let calls: CallLog = Arc::default();
    let mut client = MockWebDavClient::new();

    let log = calls.clone();
    client
        .expect_make_collection()
        .returning(move |url: &str| {
            log.lock().unwrap().push(format!("MKCOL {url}"));
            Ok(mkcol(url))
        });

    let log = calls.clone();
    client
        .expect_put_file()
        .returning(move |url: &str, _local: &Path| {
            log.lock().unwrap().push(format!("PUT {url}"));
            Ok(put(url))
        });

    (client, calls)
}

pub fn created(_url: &str) -> StatusCode {
    StatusCode::CREATED
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write fixture file");
}

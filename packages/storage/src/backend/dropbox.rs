use super::remote::RemoteClient;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::fmt;

const API_URL: &str = "https://api.dropboxapi.com/2";
const CONTENT_URL: &str = "https://content.dropboxapi.com/2";

/// Dropbox HTTP API client bound to one folder.
#[derive(Clone)]
pub struct DropboxBackend {
    client: Client,
    token: String,
    root: String,
    api_url: String,
    content_url: String,
}

impl fmt::Debug for DropboxBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxBackend")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    path_display: String,
}

#[derive(Debug, Deserialize)]
struct ListFolderEntry {
    #[serde(rename = ".tag")]
    tag: String,
    path_display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListFolderResult {
    entries: Vec<ListFolderEntry>,
    cursor: String,
    has_more: bool,
}

impl DropboxBackend {
    pub fn new(token: &str, root: &str) -> StorageResult<Self> {
        if token.trim().is_empty() {
            return Err(StorageError::FatalConfig("Dropbox access token is empty".into()));
        }
        let client = Client::builder()
            .build()
            .map_err(|e| StorageError::FatalConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.trim().to_string(),
            root: normalize_root(root),
            api_url: API_URL.to_string(),
            content_url: CONTENT_URL.to_string(),
        })
    }

    /// Points the client at another API host, e.g. a proxy.
    pub fn with_endpoints(mut self, api_url: &str, content_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self.content_url = content_url.trim_end_matches('/').to_string();
        self
    }

    pub fn remote_path(&self, name: &str) -> String {
        format!("{}/{}", self.root, name.trim_start_matches('/'))
    }

    fn rpc(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/{endpoint}", self.api_url))
            .bearer_auth(&self.token)
    }

    async fn list_folder(&self, body: serde_json::Value, endpoint: &str) -> StorageResult<ListFolderResult> {
        let response = self
            .rpc(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))?;
        check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))
    }
}

#[async_trait]
impl RemoteClient for DropboxBackend {
    async fn probe(&self) -> StorageResult<()> {
        let response = self
            .rpc("users/get_current_account")
            .send()
            .await
            .map_err(|e| StorageError::FatalConfig(format!("cannot reach Dropbox: {e}")))?;
        check(response)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::FatalConfig(format!("Dropbox rejected credentials: {e}")))
    }

    async fn put(&self, name: &str, data: Bytes) -> StorageResult<String> {
        let arg = json!({
            "path": self.remote_path(name),
            "mode": "overwrite",
            "autorename": false,
            "mute": true,
        });
        let response = self
            .client
            .post(format!("{}/files/upload", self.content_url))
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", ascii_json(&arg))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))?;

        let metadata: FileMetadata = check(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))?;
        Ok(format!("dropbox:{}", metadata.path_display))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut page = self
            .list_folder(json!({ "path": self.root, "recursive": true }), "files/list_folder")
            .await?;
        let mut files = Vec::new();

        loop {
            files.extend(
                page.entries
                    .into_iter()
                    .filter(|entry| entry.tag == "file")
                    .filter_map(|entry| entry.path_display),
            );
            if !page.has_more {
                break;
            }
            page = self
                .list_folder(json!({ "cursor": page.cursor }), "files/list_folder/continue")
                .await?;
        }

        let root = format!("{}/", self.root);
        let mut names: Vec<String> = files
            .iter()
            .filter_map(|path| path.strip_prefix(&root))
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }
}

async fn check(response: Response) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Transient(format!("HTTP {status}: {body}")))
}

/// `""` for the app root, otherwise `/a/b` without trailing slash.
fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// HTTP headers only carry ASCII, so non-ASCII characters are `\u` escaped.
fn ascii_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    for c in value.to_string().chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("not a usable git repository: '{path}'\n{detail}")]
    InvalidWorkspace { path: String, detail: String },

    #[error("malformed date in log output: '{line}'")]
    MalformedLogEntry { line: String },

    #[error("git produced non-utf8 output: {source}")]
    Output {
        #[from]
        source: FromUtf8Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("invalid record at {path}:{line}: {source}")]
    InvalidRecordFormat {
        path: String,
        line: usize,
        source: serde_json::Error,
    },

    #[error("failed to encode record: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },
}

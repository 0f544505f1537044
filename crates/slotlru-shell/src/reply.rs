//! Shell replies and their text rendering
//!
//! Rendering loosely follows redis-cli: nil values print as `(nil)`,
//! integers as `(integer) n`, lists as numbered lines.

use std::fmt;

/// Reply produced by a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status line: OK
    Status(String),
    /// Error line: ERR message
    Error(String),
    /// Integer: (integer) 3
    Integer(i64),
    /// Value or nil
    Bulk(Option<String>),
    /// Key/value pairs in cache order
    Pairs(Vec<(String, String)>),
    /// Free-form multi-line text
    Text(String),
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    pub fn err(msg: impl fmt::Display) -> Self {
        Reply::Error(format!("ERR {}", msg))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(e) => write!(f, "(error) {}", e),
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::Bulk(None) => write!(f, "(nil)"),
            Reply::Bulk(Some(v)) => write!(f, "{:?}", v),
            Reply::Pairs(pairs) if pairs.is_empty() => write!(f, "(empty)"),
            Reply::Pairs(pairs) => {
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {:?} => {:?}", i + 1, key, value)?;
                }
                Ok(())
            }
            Reply::Text(text) => write!(f, "{}", text.trim_end()),
        }
    }
}

//! Dotenv files.
//!
//! Reads `.env` files as a desired-set source and writes exported
//! environments back out, sorted, with a provenance header and owner-only
//! permissions.

#[cfg(unix)]
use std::io::Write;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroize;

use crate::core::types::{PlainValue, VarName};
use crate::error::Result;

/// A `.env` file, in memory.
#[derive(Clone)]
pub struct Env {
    vars: BTreeMap<VarName, PlainValue>,
    header: Vec<String>,
    path: PathBuf,
}

impl Env {
    /// Parse a `.env` file.
    ///
    /// Blank lines and `#` comments are skipped, an `export ` prefix is
    /// accepted, and values may be single or double quoted. Later duplicates
    /// win.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut contents = std::fs::read_to_string(path)?;
        let vars = parse(&contents);
        contents.zeroize();

        debug!(path = %path.display(), count = vars.len(), "loaded env file");

        Ok(Self {
            vars,
            header: Vec::new(),
            path: path.to_path_buf(),
        })
    }

    /// Wrap variables destined for `path`.
    pub fn new(vars: BTreeMap<VarName, PlainValue>, path: impl Into<PathBuf>) -> Self {
        Self {
            vars,
            header: Vec::new(),
            path: path.into(),
        }
    }

    /// Add a `# ` comment line written above the variables.
    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Write the file with mode 0600.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let mut content = self.render();

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;

            // An existing file keeps its old mode through open().
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(&self.path, &content)?;
        }

        content.zeroize();
        debug!(path = %self.path.display(), count = self.vars.len(), "wrote env file");
        Ok(())
    }

    /// Render as `.env` text: header, blank line, sorted `KEY=value` lines.
    pub fn render(&self) -> String {
        let mut output = String::new();

        for line in &self.header {
            output.push_str("# ");
            output.push_str(line);
            output.push('\n');
        }
        if !self.header.is_empty() {
            output.push('\n');
        }

        for (key, value) in &self.vars {
            if needs_quotes(value) {
                output.push_str(&format!("{}=\"{}\"\n", key, escape(value)));
            } else {
                output.push_str(&format!("{}={}\n", key, value));
            }
        }

        output
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<VarName, PlainValue> {
        &self.vars
    }

    /// Take the variables out, leaving the file empty.
    pub fn into_vars(mut self) -> BTreeMap<VarName, PlainValue> {
        std::mem::take(&mut self.vars)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Env {
    fn drop(&mut self) {
        for value in self.vars.values_mut() {
            value.zeroize();
        }
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("path", &self.path)
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Parse `.env` text into variables.
pub fn parse(contents: &str) -> BTreeMap<VarName, PlainValue> {
    let mut vars = BTreeMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), unquote(value.trim()));
        }
    }

    vars
}

fn unquote(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.chars().any(|ch| ch.is_whitespace() || matches!(ch, '#' | '"' | '\'' | '\\'))
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

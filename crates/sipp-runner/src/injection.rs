//! SIPp injection files (`-inf`)
//!
//! An injection file starts with a mode line such as `SEQUENTIAL` or
//! `RANDOM,PRINTF=10`, followed by one record per line with fields separated
//! by `;`. Scenarios reference the fields as `[field0]`, `[field1]` and so on.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Order in which SIPp reads injection records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectionMode {
    #[default]
    Sequential,
    Random,
    /// One record per user, selected by the user id (`-users` mode)
    User,
}

impl InjectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectionMode::Sequential => "SEQUENTIAL",
            InjectionMode::Random => "RANDOM",
            InjectionMode::User => "USER",
        }
    }
}

impl fmt::Display for InjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of an injection file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectionFile {
    pub mode: InjectionMode,
    /// Extra `KEY=value` settings appended to the mode line
    pub modifiers: Vec<(String, String)>,
    pub records: Vec<Vec<String>>,
}

impl InjectionFile {
    pub fn new(mode: InjectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_modifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.modifiers.push((key.into(), value.into()));
        self
    }

    pub fn with_record<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_record(fields);
        self
    }

    pub fn add_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records.push(fields.into_iter().map(Into::into).collect());
    }

    /// Rejects content that would change the file structure once written
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.modifiers {
            if key.is_empty() {
                return Err(Error::InvalidInjection("empty modifier key".to_string()));
            }
            for part in [key, value] {
                if part.contains([',', '=', '\n', '\r']) {
                    return Err(Error::InvalidInjection(format!(
                        "modifier {:?}={:?} contains a reserved character",
                        key, value
                    )));
                }
            }
        }

        for (index, record) in self.records.iter().enumerate() {
            if let Some(field) = record.iter().find(|f| f.contains([';', '\n', '\r'])) {
                return Err(Error::InvalidInjection(format!(
                    "record {} field {:?} contains a reserved character",
                    index, field
                )));
            }
        }

        Ok(())
    }

    /// The file text: mode line, then one `;`-separated line per record
    pub fn render(&self) -> Result<String> {
        self.validate()?;

        let mut out = String::from(self.mode.as_str());
        for (key, value) in &self.modifiers {
            out.push(',');
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out.push('\n');

        for record in &self.records {
            out.push_str(&record.join(";"));
            out.push('\n');
        }
        Ok(out)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.render()?;
        std::fs::write(path, text)?;
        debug!(
            "Wrote {} injection records to {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }
}

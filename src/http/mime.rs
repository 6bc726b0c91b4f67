//! Extension to MIME type lookup.
//!
//! The table is shared by every connection. Lookups of unknown extensions
//! register the extension with an empty type, so the table only grows;
//! entries are never removed and the `DEFAULT` entry always sits at index 0.

use tokio::sync::RwLock;

/// Reserved key of the fallback entry.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// One row of the content-type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeEntry {
    /// File extension without the leading dot (case-sensitive)
    pub extension: String,
    /// MIME type sent in `Content-type`; empty until explicitly set
    pub mime_type: String,
}

/// Process-wide content-type table.
#[derive(Debug)]
pub struct ContentTypes {
    entries: RwLock<Vec<ContentTypeEntry>>,
}

impl ContentTypes {
    /// Builds a table whose `DEFAULT` entry maps to `default_mime`.
    pub fn new(default_mime: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(vec![ContentTypeEntry {
                extension: DEFAULT_KEY.to_string(),
                mime_type: default_mime.into(),
            }]),
        }
    }

    /// Builds a table from `(extension, mime)` pairs.
    ///
    /// Later pairs overwrite earlier ones with the same extension. Fails if
    /// no non-empty `DEFAULT` entry is present.
    pub fn from_entries<I, K, V>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut default_mime = None;
        let mut rest: Vec<ContentTypeEntry> = Vec::new();

        for (extension, mime_type) in pairs {
            let extension = extension.into();
            let mime_type = mime_type.into();

            if extension == DEFAULT_KEY {
                default_mime = Some(mime_type);
            } else if let Some(entry) = rest.iter_mut().find(|e| e.extension == extension) {
                entry.mime_type = mime_type;
            } else {
                rest.push(ContentTypeEntry { extension, mime_type });
            }
        }

        let default_mime = match default_mime {
            Some(mime) if !mime.is_empty() => mime,
            Some(_) => anyhow::bail!("content type {} must not be empty", DEFAULT_KEY),
            None => anyhow::bail!("content type {} is not defined", DEFAULT_KEY),
        };

        let mut table = Self::new(default_mime);
        table.entries.get_mut().extend(rest);
        Ok(table)
    }

    /// Resolves `extension` to a MIME type.
    ///
    /// Unknown extensions are registered with an empty type and resolve to
    /// the `DEFAULT` type, as do registered extensions whose type is empty.
    pub async fn resolve(&self, extension: &str) -> String {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.iter().find(|e| e.extension == extension) {
                return Self::or_default(&entries, entry);
            }
        }

        let mut entries = self.entries.write().await;
        // Another task may have registered it between the two locks.
        if let Some(entry) = entries.iter().find(|e| e.extension == extension) {
            return Self::or_default(&entries, entry);
        }

        tracing::debug!(extension, "Registering unknown extension");
        entries.push(ContentTypeEntry {
            extension: extension.to_string(),
            mime_type: String::new(),
        });
        entries[0].mime_type.clone()
    }

    /// Sets the MIME type for `extension`, creating the entry if needed.
    pub async fn set_type(&self, extension: &str, mime_type: &str) {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.extension == extension) {
            Some(entry) => entry.mime_type = mime_type.to_string(),
            None => entries.push(ContentTypeEntry {
                extension: extension.to_string(),
                mime_type: mime_type.to_string(),
            }),
        }
    }

    /// Number of registered extensions, `DEFAULT` included.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Copy of the current table, in insertion order.
    pub async fn snapshot(&self) -> Vec<ContentTypeEntry> {
        self.entries.read().await.clone()
    }

    fn or_default(entries: &[ContentTypeEntry], entry: &ContentTypeEntry) -> String {
        if entry.mime_type.is_empty() {
            entries[0].mime_type.clone()
        } else {
            entry.mime_type.clone()
        }
    }
}

//! # Attachment List
//!
//! Files attached to an upload draft.
//!
//! The list only accumulates: entries are appended in attach order, duplicate
//! names are kept, and each entry gets an id that is never handed out again
//! by the same list, even after [`AttachmentList::clear`].

use crate::AttachmentId;
use crate::primitives::{BYTES_PER_MIB, IMAGE_CONTENT_MARKER};
use serde::{Deserialize, Serialize};

/// How an attachment is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Document,
}

impl AttachmentKind {
    /// `Image` when the content type mentions "image", otherwise `Document`.
    #[must_use]
    pub fn classify(content_type: &str) -> Self {
        if content_type.contains(IMAGE_CONTENT_MARKER) {
            Self::Image
        } else {
            Self::Document
        }
    }
}

/// One attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub size_bytes: u64,
    pub kind: AttachmentKind,
}

impl Attachment {
    /// Size in hundredths of a MiB, rounded down.
    #[must_use]
    pub fn size_mib_hundredths(&self) -> u64 {
        self.size_bytes.saturating_mul(100) / BYTES_PER_MIB
    }

    /// Size formatted with two decimals, e.g. `1.25 MiB`.
    #[must_use]
    pub fn size_display(&self) -> String {
        let hundredths = self.size_mib_hundredths();
        format!("{}.{:02} MiB", hundredths / 100, hundredths % 100)
    }
}

/// A file offered for attachment, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingFile {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl IncomingFile {
    #[must_use]
    pub fn new(name: impl Into<String>, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            content_type: content_type.into(),
        }
    }
}

/// Ordered attachments of one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentList {
    entries: Vec<Attachment>,
    next_id: u64,
}

impl Default for AttachmentList {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl AttachmentList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file and return its id.
    pub fn attach(&mut self, file: IncomingFile) -> AttachmentId {
        let id = AttachmentId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(Attachment {
            id,
            kind: AttachmentKind::classify(&file.content_type),
            name: file.name,
            size_bytes: file.size_bytes,
        });
        id
    }

    /// Append several files in order, as one drop or picker selection.
    pub fn attach_all(
        &mut self,
        files: impl IntoIterator<Item = IncomingFile>,
    ) -> Vec<AttachmentId> {
        files.into_iter().map(|file| self.attach(file)).collect()
    }

    /// Remove the entry with `id`. Returns whether an entry was removed.
    pub fn remove(&mut self, id: AttachmentId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Drop every entry. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn get(&self, id: AttachmentId) -> Option<&Attachment> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[Attachment] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Combined size of every entry.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.size_bytes))
    }
}

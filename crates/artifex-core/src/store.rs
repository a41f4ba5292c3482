//! In-process reference implementation of [`DocumentStore`].
//!
//! The production store is an external service; this one backs the test
//! suites and the CLI, and defines the "natural insertion order" the
//! lexical path depends on.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::DocumentStore;
use crate::types::{ArtifactDoc, Filters, SourceKind};

#[derive(Default)]
struct Shelf {
    // insertion order; replaced docs keep their original slot
    docs: Vec<ArtifactDoc>,
    by_id: HashMap<String, usize>,
}

impl Shelf {
    fn insert(&mut self, doc: ArtifactDoc) {
        match self.by_id.get(&doc.id) {
            Some(&i) => self.docs[i] = doc,
            None => {
                self.by_id.insert(doc.id.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.by_id.remove(id) {
            Some(i) => {
                self.docs.remove(i);
                for slot in self.by_id.values_mut() {
                    if *slot > i {
                        *slot -= 1;
                    }
                }
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    templates: RwLock<Shelf>,
    projects: RwLock<Shelf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self, kind: SourceKind) -> &RwLock<Shelf> {
        match kind {
            SourceKind::Template => &self.templates,
            SourceKind::Project => &self.projects,
        }
    }

    pub fn insert(&self, kind: SourceKind, doc: ArtifactDoc) {
        self.shelf(kind).write().unwrap_or_else(|e| e.into_inner()).insert(doc);
    }

    pub fn remove(&self, kind: SourceKind, id: &str) -> bool {
        self.shelf(kind).write().unwrap_or_else(|e| e.into_inner()).remove(id)
    }

    pub fn get(&self, kind: SourceKind, id: &str) -> Option<ArtifactDoc> {
        let shelf = self.shelf(kind).read().unwrap_or_else(|e| e.into_inner());
        shelf.by_id.get(id).map(|&i| shelf.docs[i].clone())
    }

    pub fn len(&self, kind: SourceKind) -> usize {
        self.shelf(kind).read().unwrap_or_else(|e| e.into_inner()).docs.len()
    }

    pub fn is_empty(&self, kind: SourceKind) -> bool {
        self.len(kind) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_ids(&self, kind: SourceKind, ids: &[String]) -> Result<Vec<ArtifactDoc>> {
        let shelf = self.shelf(kind).read().unwrap_or_else(|e| e.into_inner());
        Ok(ids
            .iter()
            .filter_map(|id| shelf.by_id.get(id).map(|&i| shelf.docs[i].clone()))
            .collect())
    }

    async fn scan(&self, kind: SourceKind, filters: &Filters) -> Result<Vec<ArtifactDoc>> {
        let shelf = self.shelf(kind).read().unwrap_or_else(|e| e.into_inner());
        Ok(shelf.docs.iter().filter(|d| filters.matches(d)).cloned().collect())
    }
}

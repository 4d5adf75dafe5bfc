//! In-memory blog store.
//!
//! Records are kept in insertion order in a plain `Vec`. Lookups are linear
//! scans; the collections this serves are small and order matters more than
//! lookup speed.

use chrono::Local;
use tracing::debug;

use crate::blog::{Blog, BlogData, Field};
use crate::error::StoreError;

/// The ordered collection of [`Blog`]s and its CRUD operations.
///
/// The store knows nothing about persistence or HTTP. Callers that need
/// either wrap it (see [`App`](crate::App)).
#[derive(Debug, Default)]
pub struct BlogStore {
    blogs: Vec<Blog>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records loaded from elsewhere, keeping their order.
    pub fn from_blogs(blogs: Vec<Blog>) -> Self {
        Self { blogs }
    }

    pub fn len(&self) -> usize {
        self.blogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    /// Every record, oldest first. Unlike [`get_all`](Self::get_all) this
    /// never fails; it is what gets written to disk.
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    pub fn get_all(&self) -> Result<&[Blog], StoreError> {
        if self.blogs.is_empty() {
            return Err(StoreError::Empty);
        }
        Ok(&self.blogs)
    }

    pub fn get(&self, id: u64) -> Result<&Blog, StoreError> {
        self.blogs
            .iter()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Validates `data`, assigns an id and today's date, and appends the new
    /// record.
    ///
    /// Fields are checked as title, body, author, tags; the first empty one is
    /// reported and nothing is stored.
    pub fn create(&mut self, data: BlogData) -> Result<&Blog, StoreError> {
        if let Some(field) = data.first_missing() {
            return Err(StoreError::Validation { field });
        }

        let id = self.next_id()?;
        let created = Local::now().date_naive();
        let BlogData { title, body, author, tags } = data;
        self.blogs.push(Blog { id, title, body, author, created, tags });
        debug!(id, "blog created");

        let index = self.blogs.len() - 1;
        Ok(&self.blogs[index])
    }

    /// Copies the first supplied field of `data` onto the record.
    ///
    /// Only one field changes per call: a payload carrying both `title` and
    /// `body` updates `title` alone. `id` and `created` are never touched.
    pub fn update(&mut self, id: u64, data: BlogData) -> Result<&Blog, StoreError> {
        let blog = self
            .blogs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let field = data.first_supplied();
        match field {
            Some(Field::Title)  => blog.title = data.title,
            Some(Field::Body)   => blog.body = data.body,
            Some(Field::Author) => blog.author = data.author,
            Some(Field::Tags)   => blog.tags = data.tags,
            None => {}
        }
        debug!(id, ?field, "blog updated");

        Ok(blog)
    }

    /// Removes the record and hands it back. Remaining records keep their ids
    /// and order.
    pub fn delete(&mut self, id: u64) -> Result<Blog, StoreError> {
        let index = self
            .blogs
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;
        debug!(id, "blog deleted");
        Ok(self.blogs.remove(index))
    }

    // Derived from the ids present, not a counter or the length: deletes
    // leave gaps and reloaded files may start anywhere.
    fn next_id(&self) -> Result<u64, StoreError> {
        match self.blogs.iter().map(|b| b.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted),
        }
    }
}

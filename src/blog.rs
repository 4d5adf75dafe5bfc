//! The blog post record and the payload clients send to create or edit one.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored blog post.
///
/// Every `Blog` held by a [`BlogStore`](crate::BlogStore) has all of its
/// fields populated. `id` and `created` are assigned by the store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    #[serde(with = "day_month_year")]
    pub created: NaiveDate,
    pub tags: Vec<String>,
}

/// Client-supplied fields for create and update.
///
/// Missing keys decode as empty, and empty means "not supplied". Keys the
/// store owns (`id`, `created`) are ignored if a client sends them.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct BlogData {
    pub title: String,
    pub body: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl BlogData {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// The first supplied field in [`Field::ORDER`], if any.
    pub fn first_supplied(&self) -> Option<Field> {
        Field::ORDER.into_iter().find(|f| self.is_supplied(*f))
    }

    /// The first missing field in [`Field::ORDER`], if any.
    pub fn first_missing(&self) -> Option<Field> {
        Field::ORDER.into_iter().find(|f| !self.is_supplied(*f))
    }

    fn is_supplied(&self, field: Field) -> bool {
        match field {
            Field::Title  => !self.title.is_empty(),
            Field::Body   => !self.body.is_empty(),
            Field::Author => !self.author.is_empty(),
            Field::Tags   => !self.tags.is_empty(),
        }
    }
}

/// A client-editable field of a [`Blog`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Title,
    Body,
    Author,
    Tags,
}

impl Field {
    /// Validation and merge order.
    pub const ORDER: [Self; 4] = [Self::Title, Self::Body, Self::Author, Self::Tags];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title  => "title",
            Self::Body   => "body",
            Self::Author => "author",
            Self::Tags   => "tags",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `DD-MM-YYYY` on the wire and on disk.
pub(crate) mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

use std::slice;
use std::vec;

use crate::protocol::UploadFile;

/// The value of one form field.
#[derive(Debug)]
pub enum FormValue {
    /// A decoded text value
    Text(String),
    /// An uploaded file part
    File(UploadFile),
}

impl FormValue {
    /// Returns the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            FormValue::File(_) => None,
        }
    }

    /// Returns the upload if this is a file value
    pub fn as_file(&self) -> Option<&UploadFile> {
        match self {
            FormValue::Text(_) => None,
            FormValue::File(file) => Some(file),
        }
    }

    /// Returns the upload mutably, for reading it
    pub fn as_file_mut(&mut self) -> Option<&mut UploadFile> {
        match self {
            FormValue::Text(_) => None,
            FormValue::File(file) => Some(file),
        }
    }

    /// Consumes the value and returns the upload if this is a file value
    pub fn into_file(self) -> Option<UploadFile> {
        match self {
            FormValue::Text(_) => None,
            FormValue::File(file) => Some(file),
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, FormValue::Text(_))
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        matches!(self, FormValue::File(_))
    }
}

impl From<String> for FormValue {
    fn from(text: String) -> Self {
        FormValue::Text(text)
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_owned())
    }
}

impl From<UploadFile> for FormValue {
    fn from(file: UploadFile) -> Self {
        FormValue::File(file)
    }
}

/// The parsed form: an ordered multimap from field name to values.
///
/// Insertion order is kept and duplicate names are appended, never
/// overwritten, so `a=1&a=2` yields two entries for `a`. Lookups are exact
/// (case-sensitive) name matches.
#[derive(Debug, Default)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping any earlier values with the same name
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns the first value for `name` mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormValue> {
        self.entries.iter_mut().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns all values for `name` in insertion order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries.iter().filter(move |(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns the first value for `name` if it is text
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormValue::as_text)
    }

    /// Returns the first value for `name` if it is a file
    pub fn get_file(&self, name: &str) -> Option<&UploadFile> {
        self.get(name).and_then(FormValue::as_file)
    }

    /// Returns the first value for `name` mutably if it is a file
    pub fn get_file_mut(&mut self, name: &str) -> Option<&mut UploadFile> {
        self.get_mut(name).and_then(FormValue::as_file_mut)
    }

    /// Removes and returns all values for `name`, in insertion order
    pub fn remove_all(&mut self, name: &str) -> Vec<FormValue> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|(key, _)| key == name);
        self.entries = kept;
        removed.into_iter().map(|(_, value)| value).collect()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Field names in insertion order, repeated for duplicate names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.iter() }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut { inner: self.entries.iter_mut() }
    }

    /// Number of entries, counting duplicate names separately
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Borrowing iterator over `(name, value)` entries.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, FormValue)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a FormValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Mutably borrowing iterator over `(name, value)` entries.
#[derive(Debug)]
pub struct IterMut<'a> {
    inner: slice::IterMut<'a, (String, FormValue)>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = (&'a str, &'a mut FormValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl IntoIterator for FormData {
    type Item = (String, FormValue);
    type IntoIter = vec::IntoIter<(String, FormValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = (&'a str, &'a FormValue);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<FormValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        form.extend(iter);
        form
    }
}

impl<K, V> Extend<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<FormValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

// Repeatable sub-forms on setup pages (teams of a quiz, questions of a round, ...).
//
// The page keeps existing items as JSON in a hidden field. Each item gets a sub-form cloned from
// a prototype; the user can add and delete sub-forms; on submit the items are read back and the
// hidden field is overwritten.
//
// Indices identify an item across the round-trip to the server: an existing item keeps the index
// the server gave it, and new items get fresh indices that are never reused within a page, even
// after a delete. Negative indices mark sub-forms that must not be submitted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatedItem {
    // Pages report fields only; the widget owns the index.
    #[serde(rename = "Index", default)]
    pub index: i64,
    #[serde(rename = "Error", default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    // Page-specific fields, passed through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// A single sub-form. The widget knows nothing about the fields of a particular page; this is the
// capability the page provides.
pub trait ItemForm {
    type Error;

    // Shows the item index and validation error. Called once, right after the form is created.
    fn stamp(&self, index: i64, error: &str) -> Result<(), Self::Error>;
    // Fills in page-specific fields.
    fn populate(&self, item: &RepeatedItem) -> Result<(), Self::Error>;
    // Reads page-specific fields back. The returned index is ignored.
    fn extract(&self) -> Result<RepeatedItem, Self::Error>;
}

#[derive(Debug)]
pub enum RepeaterError<E> {
    Json(serde_json::Error),
    Form(E),
}

struct Entry<F> {
    index: i64,
    form: F,
}

pub struct Repeater<F> {
    entries: Vec<Entry<F>>,
    next_index: i64,
}

impl<F: ItemForm> Repeater<F> {
    pub fn new() -> Self { Repeater { entries: vec![], next_index: 0 } }

    // Creates a sub-form for each item in `items_json`, in order.
    pub fn load(
        &mut self, items_json: &str, mut make_form: impl FnMut() -> Result<F, F::Error>,
    ) -> Result<(), RepeaterError<F::Error>> {
        let items: Vec<RepeatedItem> =
            serde_json::from_str(items_json).map_err(RepeaterError::Json)?;
        for item in items {
            let form = make_form().map_err(RepeaterError::Form)?;
            form.stamp(item.index, &item.error).map_err(RepeaterError::Form)?;
            form.populate(&item).map_err(RepeaterError::Form)?;
            self.next_index = self.next_index.max(item.index.saturating_add(1));
            self.entries.push(Entry { index: item.index, form });
        }
        self.next_index = self.next_index.max(self.entries.len() as i64);
        Ok(())
    }

    // Appends a blank sub-form and returns its index.
    pub fn add(&mut self, form: F) -> Result<i64, F::Error> {
        let index = self.next_index;
        form.stamp(index, "")?;
        self.next_index += 1;
        self.entries.push(Entry { index, form });
        Ok(index)
    }

    // Forgets the sub-form. The caller removes it from the page.
    pub fn delete(&mut self, index: i64) -> Option<F> {
        let pos = self.entries.iter().position(|entry| entry.index == index)?;
        Some(self.entries.remove(pos).form)
    }

    // Same as `delete`, but finds the sub-form itself rather than its index. Indices that came
    // from the server are not guaranteed to be unique.
    pub fn delete_where(&mut self, mut is_target: impl FnMut(&F) -> bool) -> Option<(i64, F)> {
        let pos = self.entries.iter().position(|entry| is_target(&entry.form))?;
        let entry = self.entries.remove(pos);
        Some((entry.index, entry.form))
    }

    pub fn next_index(&self) -> i64 { self.next_index }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn indices(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|entry| entry.index)
    }

    // Reads every submittable sub-form, in page order.
    pub fn collect_items(&self) -> Result<Vec<RepeatedItem>, F::Error> {
        self.entries
            .iter()
            .filter(|entry| entry.index >= 0)
            .map(|entry| {
                let mut item = entry.form.extract()?;
                item.index = entry.index;
                Ok(item)
            })
            .collect()
    }

    // JSON for the hidden field.
    pub fn submit(&self) -> Result<String, RepeaterError<F::Error>> {
        let items = self.collect_items().map_err(RepeaterError::Form)?;
        serde_json::to_string(&items).map_err(RepeaterError::Json)
    }
}

impl<F: ItemForm> Default for Repeater<F> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_fields_without_index() {
        let item: RepeatedItem = serde_json::from_str(r#"{"Name": "Owls"}"#).unwrap();
        assert_eq!(item.index, 0);
        assert_eq!(item.error, "");
        assert_eq!(item.fields["Name"], "Owls");
    }
}

//! The editing session's field list.

use super::{Field, FieldType};
use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Ordered set of fields keyed by id.
///
/// Insertion order is the canvas render order. Fields have no persistence of
/// their own; removing one here destroys it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCollection {
    fields: IndexMap<String, Field>,
}

impl FieldCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any field with the same id in place.
    ///
    /// Returns the replaced field.
    pub fn add(&mut self, field: Field) -> Option<Field> {
        self.fields.insert(field.id.clone(), field)
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Field> {
        self.fields.shift_remove(id)
    }

    /// Look up by id.
    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.get(id)
    }

    /// Look up by id for editing.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Field> {
        self.fields.get_mut(id)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in render order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Fields on a 1-based page.
    pub fn on_page(&self, page_number: u32) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(move |f| f.page_number == page_number)
    }

    /// Fields of one type.
    pub fn of_type(&self, field_type: FieldType) -> impl Iterator<Item = &Field> {
        self.fields
            .values()
            .filter(move |f| f.field_type() == field_type)
    }

    /// Renumber fields on or after `page_number` by `by` pages.
    ///
    /// Used when blank pages are inserted in front of existing ones.
    pub fn shift_pages_from(&mut self, page_number: u32, by: u32) {
        if by == 0 {
            return;
        }
        let mut shifted = 0usize;
        for field in self.fields.values_mut() {
            if field.page_number >= page_number {
                field.page_number = field.page_number.saturating_add(by);
                shifted += 1;
            }
        }
        log::debug!("Shifted {} fields from page {} by {}", shifted, page_number, by);
    }

    /// Drop every field on pages greater than `page_count`.
    pub fn retain_pages(&mut self, page_count: u32) -> Vec<Field> {
        let mut dropped = Vec::new();
        self.fields.retain(|_, f| {
            if f.page_number > page_count {
                dropped.push(f.clone());
                false
            } else {
                true
            }
        });
        dropped
    }
}

impl FromIterator<Field> for FieldCollection {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Field> for FieldCollection {
    fn extend<I: IntoIterator<Item = Field>>(&mut self, iter: I) {
        for field in iter {
            self.add(field);
        }
    }
}

impl IntoIterator for FieldCollection {
    type Item = Field;
    type IntoIter = indexmap::map::IntoValues<String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_values()
    }
}

impl Serialize for FieldCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.fields.len()))?;
        for field in self.fields.values() {
            seq.serialize_element(field)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str, page: u32) -> Field {
        let mut f = Field::new(FieldType::Text, page);
        f.id = id.to_string();
        f
    }

    #[test]
    fn test_insertion_order_preserved() {
        let collection: FieldCollection = vec![field("b", 1), field("a", 1), field("c", 2)]
            .into_iter()
            .collect();
        let ids: Vec<&str> = collection.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_add_replaces_in_place() {
        let mut collection = FieldCollection::new();
        collection.add(field("a", 1));
        collection.add(field("b", 1));
        let old = collection.add(field("a", 5));
        assert_eq!(old.map(|f| f.page_number), Some(1));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.iter().next().map(|f| f.page_number), Some(5));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut collection: FieldCollection = vec![field("a", 1), field("b", 1), field("c", 1)]
            .into_iter()
            .collect();
        assert!(collection.remove("b").is_some());
        assert!(collection.remove("b").is_none());
        let ids: Vec<&str> = collection.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_shift_pages_from() {
        let mut collection: FieldCollection = vec![field("a", 1), field("b", 2), field("c", 3)]
            .into_iter()
            .collect();
        collection.shift_pages_from(2, 2);
        assert_eq!(collection.get("a").unwrap().page_number, 1);
        assert_eq!(collection.get("b").unwrap().page_number, 4);
        assert_eq!(collection.get("c").unwrap().page_number, 5);
        assert_eq!(collection.on_page(4).count(), 1);
    }

    #[test]
    fn test_retain_pages() {
        let mut collection: FieldCollection = vec![field("a", 1), field("b", 3)].into_iter().collect();
        let dropped = collection.retain_pages(2);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, "b");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_serializes_as_array() {
        let collection: FieldCollection = vec![field("a", 1)].into_iter().collect();
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json[0]["id"], "a");
        assert_eq!(json.as_array().unwrap().len(), 1);
    }
}

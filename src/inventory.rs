//! The bag: unequipped items. Materials and food stack by id.

use serde::{Deserialize, Serialize};

use crate::catalog::items::{Item, ItemType};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: Item) {
        if item.is_stackable() {
            let existing = self
                .items
                .iter_mut()
                .find(|i| i.id == item.id && i.item_type() == item.item_type());
            if let Some(stack) = existing {
                if let (Some(have), Some(more)) = (stack.quantity_mut(), item.quantity()) {
                    *have += more;
                    return;
                }
            }
        }
        self.items.push(item);
    }

    /// Removes the first entry with `id`, whole stack included.
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Takes a single unit. Stacks shrink by one; the last unit removes the entry.
    pub fn take_one(&mut self, id: &str) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        if !matches!(self.items[idx].quantity(), Some(q) if q > 1) {
            return Some(self.items.remove(idx));
        }
        let entry = &mut self.items[idx];
        if let Some(q) = entry.quantity_mut() {
            *q -= 1;
        }
        let mut one = entry.clone();
        if let Some(q) = one.quantity_mut() {
            *q = 1;
        }
        Some(one)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn by_type(&self, kind: ItemType) -> Vec<&Item> {
        self.items.iter().filter(|i| i.item_type() == kind).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

use crate::errors::collection_error::CollectionError;

/// Dense sequence with O(1) append and O(1) swap-erase.
///
/// Erasing anything but the last element moves the last element into the
/// erased slot, so an index held outside the list for that element is stale
/// afterwards. `erase_at` reports the relocation so callers can fix it up.
#[derive(Debug, Clone)]
pub struct CompactList<T> {
    items: Vec<T>,
}

/// Where the formerly-last element went after an erase, if it moved at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub from: usize,
    pub to: usize,
}

impl<T> CompactList<T> {
    pub fn new() -> Self {
        Self { items: vec![] }
    }

    pub fn append(&mut self, value: T) -> usize {
        self.items.push(value);
        self.items.len() - 1
    }

    /// Removes the element at `index` and returns it together with the
    /// relocation of the previously-last element.
    pub fn erase_at(&mut self, index: usize) -> Result<(T, Option<Relocation>), CollectionError> {
        let len = self.items.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        let last = len - 1;
        let removed = self.items.swap_remove(index);
        let relocation = if index != last {
            Some(Relocation { from: last, to: index })
        } else {
            None
        };
        Ok((removed, relocation))
    }

    pub fn at(&self, index: usize) -> Result<&T, CollectionError> {
        let len = self.items.len();
        self.items.get(index).ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, CollectionError> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    pub fn length(&self) -> usize {
        self.items.len()
    }

    /// First index whose element satisfies `pred`, scanning from 0.
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for CompactList<T> {
    fn default() -> Self {
        Self::new()
    }
}

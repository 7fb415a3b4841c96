use std::rc::Rc;

use hashbrown::HashMap;

use crate::stages::Stage;

/// A registered stage together with its optional fallback.
pub struct StageEntry<T> {
    stage: Rc<dyn Stage<T>>,
    fallback: Option<Rc<dyn Stage<T>>>,
}

impl<T> StageEntry<T> {
    /// The registered stage.
    pub fn stage(&self) -> &dyn Stage<T> {
        self.stage.as_ref()
    }

    /// The fallback paired with the stage, if one was registered.
    pub fn fallback(&self) -> Option<&dyn Stage<T>> {
        self.fallback.as_deref()
    }
}

/// Ordered set of unique (stage, fallback) pairs owned by a pipeline.
///
/// # Stage Identity
///
/// Identity is shared-pointer identity: two clones of the same `Rc` are the
/// same stage, two separate allocations are distinct stages even when they wrap
/// identical closures. Re-attaching an already registered stage does not add a
/// second entry; it overwrites the stored fallback and keeps the stage's
/// original position.
///
/// # Iteration
///
/// [`iter()`](Self::iter) yields entries in insertion order and produces a
/// fresh iterator per call, so the same collection can be executed across
/// repeated `process` calls.
pub struct StageCollection<T> {
    entries: Vec<StageEntry<T>>,
    // Stage data pointer -> position in `entries`. Pointers stay valid because
    // the Rc in the entry keeps the allocation alive and entries are never
    // removed.
    index: HashMap<*const (), usize>,
}

impl<T: 'static> StageCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Attach a stage and assign a fallback to it.
    ///
    /// Attaching a stage that is already registered overwrites its fallback
    /// in place; the entry count does not change.
    pub fn attach(&mut self, stage: Rc<dyn Stage<T>>, fallback: Option<Rc<dyn Stage<T>>>) {
        let key = Rc::as_ptr(&stage) as *const ();

        match self.index.get(&key) {
            Some(&position) => {
                self.entries[position].fallback = fallback;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(StageEntry { stage, fallback });
            }
        }
    }

    /// Number of distinct registered stages.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether no stages are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, StageEntry<T>> {
        self.entries.iter()
    }
}

impl<T: 'static> Default for StageCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StageError;
    use pretty_assertions::assert_eq;

    struct AddOne;

    impl Stage<i32> for AddOne {
        fn apply(&self, payload: &i32) -> Result<i32, StageError> {
            Ok(payload + 1)
        }
    }

    struct Fails;

    impl Stage<i32> for Fails {
        fn apply(&self, _payload: &i32) -> Result<i32, StageError> {
            Err("stage failed".into())
        }
    }

    #[test]
    fn attach_preserves_insertion_order() {
        let mut collection = StageCollection::new();
        collection.attach(Rc::new(AddOne), None);
        collection.attach(Rc::new(Fails), None);
        collection.attach(Rc::new(AddOne), None);

        assert_eq!(collection.count(), 3);

        let outcomes: Vec<bool> = collection
            .iter()
            .map(|entry| entry.stage().apply(&0).is_ok())
            .collect();
        assert_eq!(outcomes, vec![true, false, true]);
    }

    #[test]
    fn reattaching_same_stage_does_not_duplicate() {
        let stage: Rc<dyn Stage<i32>> = Rc::new(AddOne);

        let mut collection = StageCollection::new();
        collection.attach(Rc::clone(&stage), None);
        collection.attach(Rc::clone(&stage), None);

        assert_eq!(collection.count(), 1);
    }

    #[test]
    fn reattaching_overwrites_the_fallback() {
        let stage: Rc<dyn Stage<i32>> = Rc::new(Fails);
        let first: Rc<dyn Stage<i32>> =
            Rc::new(|_: &i32| -> Result<i32, StageError> { Ok(10) });
        let second: Rc<dyn Stage<i32>> =
            Rc::new(|_: &i32| -> Result<i32, StageError> { Ok(20) });

        let mut collection = StageCollection::new();
        collection.attach(Rc::clone(&stage), Some(first));
        collection.attach(Rc::clone(&stage), Some(second));

        assert_eq!(collection.count(), 1);

        let entry = collection.iter().next().unwrap();
        let rescued = entry.fallback().unwrap().apply(&0).unwrap();
        assert_eq!(rescued, 20);
    }

    #[test]
    fn distinct_allocations_are_distinct_stages() {
        let mut collection = StageCollection::new();
        collection.attach(Rc::new(AddOne), None);
        collection.attach(Rc::new(AddOne), None);

        assert_eq!(collection.count(), 2);
    }

    #[test]
    fn new_collection_is_empty() {
        let collection: StageCollection<i32> = StageCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.count(), 0);
    }

    #[test]
    fn iteration_is_restartable() {
        let mut collection = StageCollection::new();
        collection.attach(Rc::new(AddOne), None);
        collection.attach(Rc::new(AddOne), None);

        assert_eq!(collection.iter().count(), 2);
        assert_eq!(collection.iter().count(), 2);
    }
}

/* src/server/core/rust/src/store.rs */

use std::sync::RwLock;

use pseo_engine::{Category, ContentBlock, Locale};

use crate::errors::PseoError;

/// A stored record addressed by a string key.
pub trait Record: Clone + Send + Sync + 'static {
  fn key(&self) -> &str;
}

impl Record for ContentBlock {
  fn key(&self) -> &str {
    &self.id
  }
}

impl Record for Category {
  fn key(&self) -> &str {
    &self.id
  }
}

impl Record for Locale {
  fn key(&self) -> &str {
    &self.code
  }
}

pub type Mutation<'a, T> = &'a mut dyn FnMut(&mut Vec<T>) -> Result<(), PseoError>;

/// Insertion-ordered collection of records.
///
/// `apply` runs a mutation atomically against the whole collection; the
/// provided methods are built on it, so an implementation only supplies
/// `list` and `apply`.
pub trait Repository<T: Record>: Send + Sync {
  fn list(&self) -> Result<Vec<T>, PseoError>;

  fn apply(&self, mutation: Mutation<'_, T>) -> Result<(), PseoError>;

  fn get(&self, key: &str) -> Result<Option<T>, PseoError> {
    Ok(self.list()?.into_iter().find(|item| item.key() == key))
  }

  fn create(&self, item: T) -> Result<T, PseoError> {
    let created = item.clone();
    let mut slot = Some(item);
    self.apply(&mut |items| {
      if items.iter().any(|i| i.key() == created.key()) {
        return Err(PseoError::conflict(format!("Record '{}' already exists", created.key())));
      }
      items.extend(slot.take());
      Ok(())
    })?;
    Ok(created)
  }

  fn update(&self, key: &str, item: T) -> Result<T, PseoError> {
    let updated = item.clone();
    let mut slot = Some(item);
    self.apply(&mut |items| {
      let existing = items
        .iter_mut()
        .find(|i| i.key() == key)
        .ok_or_else(|| PseoError::not_found(format!("Record '{key}' not found")))?;
      if let Some(item) = slot.take() {
        *existing = item;
      }
      Ok(())
    })?;
    Ok(updated)
  }

  fn delete(&self, key: &str) -> Result<T, PseoError> {
    let mut removed = None;
    self.apply(&mut |items| {
      let index = items
        .iter()
        .position(|i| i.key() == key)
        .ok_or_else(|| PseoError::not_found(format!("Record '{key}' not found")))?;
      removed = Some(items.remove(index));
      Ok(())
    })?;
    removed.ok_or_else(|| PseoError::internal("delete produced no record"))
  }
}

/// `Repository` over a `RwLock<Vec<T>>`. Reads clone a snapshot so callers
/// never hold the lock while running engine code.
#[derive(Debug, Default)]
pub struct InMemoryRepository<T> {
  items: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryRepository<T> {
  pub fn new(items: Vec<T>) -> Self {
    Self { items: RwLock::new(items) }
  }
}

fn poisoned() -> PseoError {
  PseoError::internal("store lock poisoned")
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
  fn list(&self) -> Result<Vec<T>, PseoError> {
    self.items.read().map(|items| items.clone()).map_err(|_| poisoned())
  }

  fn apply(&self, mutation: Mutation<'_, T>) -> Result<(), PseoError> {
    let mut guard = self.items.write().map_err(|_| poisoned())?;
    // Mutate a copy so a failed mutation leaves the store untouched.
    let mut working = guard.clone();
    mutation(&mut working)?;
    *guard = working;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn locale(code: &str) -> Locale {
    Locale { code: code.into(), name: code.into(), ..Default::default() }
  }

  #[test]
  fn create_get_list_in_order() {
    let repo = InMemoryRepository::new(vec![locale("en")]);
    repo.create(locale("fr")).unwrap();
    repo.create(locale("de")).unwrap();
    let codes: Vec<_> = repo.list().unwrap().into_iter().map(|l| l.code).collect();
    assert_eq!(codes, vec!["en", "fr", "de"]);
    assert_eq!(repo.get("fr").unwrap().unwrap().code, "fr");
    assert!(repo.get("xx").unwrap().is_none());
  }

  #[test]
  fn create_duplicate_conflicts() {
    let repo = InMemoryRepository::new(vec![locale("en")]);
    let err = repo.create(locale("en")).unwrap_err();
    assert_eq!(err.status(), 409);
    assert_eq!(repo.list().unwrap().len(), 1);
  }

  #[test]
  fn update_and_delete() {
    let repo = InMemoryRepository::new(vec![locale("en"), locale("fr")]);
    let mut fr = locale("fr");
    fr.name = "French".into();
    repo.update("fr", fr).unwrap();
    assert_eq!(repo.get("fr").unwrap().unwrap().name, "French");

    let removed = repo.delete("en").unwrap();
    assert_eq!(removed.code, "en");
    assert_eq!(repo.list().unwrap().len(), 1);

    assert_eq!(repo.update("zz", locale("zz")).unwrap_err().status(), 404);
    assert_eq!(repo.delete("zz").unwrap_err().status(), 404);
  }

  #[test]
  fn failed_mutation_rolls_back() {
    let repo = InMemoryRepository::new(vec![locale("en")]);
    let res = repo.apply(&mut |items| {
      items.clear();
      Err(PseoError::validation("nope"))
    });
    assert!(res.is_err());
    assert_eq!(repo.list().unwrap().len(), 1);
  }

  #[test]
  fn shared_across_threads() {
    use std::sync::Arc;
    let repo: Arc<dyn Repository<Locale>> = Arc::new(InMemoryRepository::default());
    let handles: Vec<_> = ["aa", "bb", "cc", "dd"]
      .into_iter()
      .map(|code| {
        let repo = Arc::clone(&repo);
        std::thread::spawn(move || repo.create(locale(code)).unwrap())
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(repo.list().unwrap().len(), 4);
  }
}

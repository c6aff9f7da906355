//! Student roster, unique by id, kept in insertion order.

use crate::domain::Student;
use crate::error::{Result, RetestError};

#[derive(Debug, Default)]
pub struct StudentCatalog {
  students: Vec<Student>,
}

impl StudentCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, student: Student) -> Result<()> {
    if let Some(existing) = self.get(student.id()) {
      return Err(RetestError::DuplicateId {
        id: student.id().to_string(),
        name: existing.name().to_string(),
      });
    }
    self.students.push(student);
    Ok(())
  }

  pub fn get(&self, id: &str) -> Option<&Student> {
    self.students.iter().find(|s| s.id() == id)
  }

  pub fn get_mut(&mut self, id: &str) -> Option<&mut Student> {
    self.students.iter_mut().find(|s| s.id() == id)
  }

  pub fn require(&self, id: &str) -> Result<&Student> {
    self.get(id).ok_or_else(|| RetestError::NotFound { id: id.to_string() })
  }

  pub fn require_mut(&mut self, id: &str) -> Result<&mut Student> {
    self.get_mut(id).ok_or_else(|| RetestError::NotFound { id: id.to_string() })
  }

  pub fn len(&self) -> usize {
    self.students.len()
  }

  pub fn is_empty(&self) -> bool {
    self.students.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Student> {
    self.students.iter()
  }

  pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Student> {
    self.students.iter_mut()
  }
}

impl<'a> IntoIterator for &'a StudentCatalog {
  type Item = &'a Student;
  type IntoIter = std::slice::Iter<'a, Student>;

  fn into_iter(self) -> Self::IntoIter {
    self.students.iter()
  }
}

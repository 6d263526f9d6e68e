//! Category use-case service.
//!
//! # Responsibility
//! - Provide category list/get/create/update/delete entry points.
//! - Enforce the unique-name precondition ahead of persistence.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Lookups return `Ok(None)` for absent ids; only writes against absent
//!   ids are errors.

use crate::model::category::{Category, CategoryDraft, CategoryId, CategoryUpdate};
use crate::repo::category_repo::{CategoryRepository, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for category use-cases.
#[derive(Debug)]
pub enum CategoryServiceError {
    /// Another category already holds the requested name.
    DuplicateName(String),
    /// Target category does not exist.
    NotFound(CategoryId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(name) => {
                write!(f, "category with name `{name}` already exists")
            }
            Self::NotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent category state: {details}")
            }
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CategoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CategoryNotFound(id) => Self::NotFound(id),
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

/// Category service facade over repository implementations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all categories.
    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.find_all()
    }

    /// Gets one category by id. Absence is not an error.
    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.find_by_id(id)
    }

    /// Creates a category after checking that the name is unused.
    ///
    /// The pre-check is check-then-act: two concurrent creates with the
    /// same name are resolved by the store's UNIQUE constraint, not at
    /// this layer. A racing loser still surfaces as `DuplicateName`
    /// because the repository maps the constraint violation.
    pub fn create_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<Category, CategoryServiceError> {
        if self.repo.find_by_name(draft.name.as_str())?.is_some() {
            return Err(CategoryServiceError::DuplicateName(draft.name.clone()));
        }
        Ok(self.repo.insert(draft)?)
    }

    /// Overwrites name and description of an existing category.
    pub fn update_category(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> Result<Category, CategoryServiceError> {
        self.repo.update(id, update)?;
        self.repo
            .find_by_id(id)?
            .ok_or(CategoryServiceError::InconsistentState(
                "updated category not found in read-back",
            ))
    }

    /// Deletes one category by id.
    ///
    /// A category still referenced by products is rejected by the store's
    /// foreign-key constraint and surfaces as a `Repo` error.
    pub fn delete_category(&self, id: CategoryId) -> Result<(), CategoryServiceError> {
        if !self.repo.exists_by_id(id)? {
            return Err(CategoryServiceError::NotFound(id));
        }
        self.repo.delete_by_id(id)?;
        Ok(())
    }
}

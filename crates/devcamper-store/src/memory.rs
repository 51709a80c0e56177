use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::model::{Bootcamp, BootcampId, BootcampInput, slugify};
use crate::repository::BootcampRepository;
use crate::validate::{ValidBootcamp, validate};

const DEFAULT_PHOTO: &str = "no-photo.jpg";
const NAME_INDEX: &str = "name_1";

/// Process-local bootcamp store with a unique index on `name`
#[derive(Debug, Clone, Default)]
pub struct InMemoryBootcamps {
    documents: Arc<RwLock<IndexMap<BootcampId, Bootcamp>>>,
}

impl InMemoryBootcamps {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(raw: &str) -> Result<BootcampId> {
    raw.parse()
}

fn ensure_unique_name(documents: &IndexMap<BootcampId, Bootcamp>, name: &str, except: Option<BootcampId>) -> Result<()> {
    let taken = documents
        .values()
        .any(|b| b.name == name && Some(b.id) != except);

    if taken {
        return Err(StoreError::duplicate(NAME_INDEX, name));
    }

    Ok(())
}

fn apply(valid: ValidBootcamp, target: &mut Bootcamp) {
    target.slug = slugify(&valid.name);
    target.name = valid.name;
    target.description = valid.description;
    target.website = valid.website;
    target.phone = valid.phone;
    target.email = valid.email;
    target.address = valid.address;
    target.careers = valid.careers;
    target.average_rating = valid.average_rating;
    target.average_cost = valid.average_cost;
    target.housing = valid.housing;
    target.job_assistance = valid.job_assistance;
    target.job_guarantee = valid.job_guarantee;
    target.accept_gi = valid.accept_gi;
}

#[async_trait]
impl BootcampRepository for InMemoryBootcamps {
    async fn list(&self) -> Result<Vec<Bootcamp>> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Bootcamp> {
        let id = parse_id(id)?;
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    async fn create(&self, input: BootcampInput) -> Result<Bootcamp> {
        let valid = validate(input)?;
        let mut documents = self.documents.write().await;
        ensure_unique_name(&documents, &valid.name, None)?;

        let mut bootcamp = Bootcamp {
            id: BootcampId::new(),
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            website: None,
            phone: None,
            email: None,
            address: String::new(),
            careers: Vec::new(),
            average_rating: None,
            average_cost: None,
            photo: DEFAULT_PHOTO.to_owned(),
            housing: false,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
            created_at: Timestamp::now(),
        };
        apply(valid, &mut bootcamp);

        documents.insert(bootcamp.id, bootcamp.clone());
        tracing::debug!(id = %bootcamp.id, slug = %bootcamp.slug, "bootcamp created");

        Ok(bootcamp)
    }

    async fn update(&self, id: &str, patch: BootcampInput) -> Result<Bootcamp> {
        let id = parse_id(id)?;
        let mut documents = self.documents.write().await;

        let current = documents
            .get(&id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        let valid = validate(current.to_input().merged_with(patch))?;
        ensure_unique_name(&documents, &valid.name, Some(id))?;

        let Some(bootcamp) = documents.get_mut(&id) else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };
        apply(valid, bootcamp);

        Ok(bootcamp.clone())
    }

    async fn delete(&self, id: &str) -> Result<Bootcamp> {
        let id = parse_id(id)?;
        let removed = self
            .documents
            .write()
            .await
            .shift_remove(&id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        tracing::debug!(id = %removed.id, "bootcamp deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> BootcampInput {
        BootcampInput {
            name: Some(name.to_owned()),
            description: Some("Full stack web development".to_owned()),
            address: Some("233 Bay State Rd Boston MA 02215".to_owned()),
            careers: Some(vec!["Web Development".to_owned()]),
            ..BootcampInput::default()
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryBootcamps::new();
        let created = store.create(input("Devworks Bootcamp")).await.unwrap();

        assert_eq!(created.slug, "devworks-bootcamp");
        assert_eq!(created.photo, "no-photo.jpg");

        let fetched = store.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let store = InMemoryBootcamps::new();
        store.create(input("Devworks Bootcamp")).await.unwrap();

        let err = store.create(input("Devworks Bootcamp")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { code: 11000, .. }));
    }

    #[tokio::test]
    async fn validation_runs_before_uniqueness() {
        let store = InMemoryBootcamps::new();
        store.create(input("Devworks Bootcamp")).await.unwrap();

        let invalid = BootcampInput {
            address: None,
            ..input("Devworks Bootcamp")
        };
        let err = store.create(invalid).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn malformed_id_is_cast_error() {
        let store = InMemoryBootcamps::new();
        let err = store.get("not-an-id").await.unwrap_err();
        assert_eq!(err, StoreError::Cast { value: "not-an-id".to_owned() });
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = InMemoryBootcamps::new();
        let id = BootcampId::new().to_string();
        let err = store.delete(&id).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { id });
    }

    #[tokio::test]
    async fn update_keeps_own_name_and_revalidates() {
        let store = InMemoryBootcamps::new();
        let created = store.create(input("Devworks Bootcamp")).await.unwrap();
        let id = created.id.to_string();

        let patch = BootcampInput {
            average_rating: Some(9.0),
            ..BootcampInput::default()
        };
        let updated = store.update(&id, patch).await.unwrap();
        assert_eq!(updated.name, "Devworks Bootcamp");
        assert_eq!(updated.average_rating, Some(9.0));
        assert_eq!(updated.created_at, created.created_at);

        let bad = BootcampInput {
            average_rating: Some(42.0),
            ..BootcampInput::default()
        };
        assert!(matches!(
            store.update(&id, bad).await.unwrap_err(),
            StoreError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let store = InMemoryBootcamps::new();
        store.create(input("Devworks Bootcamp")).await.unwrap();
        let other = store.create(input("ModernTech Bootcamp")).await.unwrap();

        let patch = BootcampInput {
            name: Some("Devworks Bootcamp".to_owned()),
            ..BootcampInput::default()
        };
        let err = store.update(&other.id.to_string(), patch).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = InMemoryBootcamps::new();
        store.create(input("Devworks Bootcamp")).await.unwrap();
        store.create(input("ModernTech Bootcamp")).await.unwrap();

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, ["Devworks Bootcamp", "ModernTech Bootcamp"]);
    }
}

use std::sync::Arc;

use models::{validate, UserRecord};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::users::repository::UserRepository;

/// Request handler for the user resource.
///
/// Validates candidates, applies them through the repository and returns a typed
/// outcome; mapping to status codes and bodies is left to the transport.
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Vec<UserRecord> {
        let users = self.repo.list().await;
        info!(count = users.len(), "list users");
        users
    }

    pub async fn get(&self, id: &str) -> Result<UserRecord, ServiceError> {
        self.repo.find_by_id(id).await.ok_or_else(|| ServiceError::not_found(id))
    }

    /// Field rules are checked before the key, so a body that is both invalid
    /// and keyless reports the violations.
    #[instrument(skip_all, fields(user_id = candidate.id().unwrap_or_default()))]
    pub async fn create(&self, candidate: UserRecord) -> Result<UserRecord, ServiceError> {
        let violations = validate(&candidate);
        if !violations.is_empty() {
            warn!(violations = violations.len(), "create rejected");
            return Err(ServiceError::Validation(violations));
        }
        if !candidate.has_id() {
            return Err(ServiceError::MissingId);
        }
        let created = self.repo.append(candidate).await?;
        info!("user created");
        Ok(created)
    }

    /// Unknown ids are reported before anything about the body. The patch is
    /// merged onto the stored record and the merged result must pass the full
    /// field rules.
    #[instrument(skip(self, patch), fields(user_id = %id))]
    pub async fn update(&self, id: &str, patch: UserRecord) -> Result<UserRecord, ServiceError> {
        let check = |merged: &UserRecord| -> Result<(), ServiceError> {
            let violations = validate(merged);
            if violations.is_empty() { Ok(()) } else { Err(ServiceError::Validation(violations)) }
        };
        let updated = self.repo.replace_fields(id, patch, &check).await?;
        info!("user updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.remove_by_id(id).await?;
        info!("user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repository::FileUserRepository;
    use serde_json::{json, Value};

    async fn service() -> (UserService<FileUserRepository>, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!("svc_user_service_{}.json", uuid::Uuid::new_v4()));
        let repo = FileUserRepository::load(&tmp).await;
        (UserService::new(repo), tmp)
    }

    fn record(v: Value) -> UserRecord {
        UserRecord::from_value(v)
    }

    fn u1() -> Value {
        json!({
            "id": "u1",
            "firstName": "Jo",
            "lastName": "Doe",
            "dateOfBirth": "1990-05-15",
            "personalIdDocument": {
                "documentId": "ABCDE12345",
                "countryOfIssue": "US",
                "validUntil": "2030-01-01"
            }
        })
    }

    #[tokio::test]
    async fn lifecycle_scenario() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service().await;

        let created = svc.create(record(u1())).await?;
        assert_eq!(created.clone().into_value(), u1());
        assert_eq!(svc.get("u1").await?, created);

        let updated = svc.update("u1", record(json!({"firstName": "Jon"}))).await?;
        let mut expected = u1();
        expected["firstName"] = json!("Jon");
        assert_eq!(updated.into_value(), expected);

        svc.delete("u1").await?;
        assert!(matches!(svc.get("u1").await, Err(ServiceError::NotFound(_))));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn create_reports_violations_before_missing_id() {
        let (svc, _tmp) = service().await;
        match svc.create(record(json!({"email": "a@b.com"}))).await {
            Err(ServiceError::Validation(v)) => assert_eq!(v.len(), 4),
            other => panic!("unexpected: {other:?}"),
        }

        let mut no_id = u1();
        no_id.as_object_mut().unwrap().remove("id");
        assert!(matches!(svc.create(record(no_id)).await, Err(ServiceError::MissingId)));
        assert!(svc.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_even_with_bad_body() {
        let (svc, _tmp) = service().await;
        let res = svc.update("ghost", record(json!({"firstName": "x"}))).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete("ghost").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_update_keeps_stored_record() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service().await;
        svc.create(record(u1())).await?;
        match svc.update("u1", record(json!({"lastName": "D", "email": "bad"}))).await {
            Err(ServiceError::Validation(v)) => assert_eq!(
                v,
                vec!["lastName must be between 2 and 50 characters.", "Invalid email format."]
            ),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(svc.get("u1").await?.into_value(), u1());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn get_and_list_are_idempotent() -> Result<(), anyhow::Error> {
        let (svc, tmp) = service().await;
        svc.create(record(u1())).await?;
        assert_eq!(svc.list().await, svc.list().await);
        assert_eq!(svc.get("u1").await?, svc.get("u1").await?);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn works_through_trait_object() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_user_service_dyn_{}.json", uuid::Uuid::new_v4()));
        let repo: Arc<dyn UserRepository> = FileUserRepository::load(&tmp).await;
        let svc = UserService::new(repo);
        svc.create(record(u1())).await?;
        assert_eq!(svc.list().await.len(), 1);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}

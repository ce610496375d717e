// database/domains/query.rs - read-modify-write operations on a domain's allow-list

use super::merge::{find_by_email, merge_users, remove_by_email};
use super::model::AllowedUser;
use crate::error::StoreError;
use crate::store::DomainStore;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainUsers {
    pub exists: bool,
    pub users: Vec<AllowedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    // Whether the domain document existed before the write
    pub existed: bool,
    pub previous_total: usize,
    pub added: usize,
    pub skipped: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveReport {
    pub removed: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    NoDomain,
    Denied,
    Allowed(AllowedUser),
}

// An absent document reads as an empty list
pub async fn get_users<S>(store: &S, domain_id: &str) -> Result<DomainUsers, StoreError>
where
    S: DomainStore + ?Sized,
{
    let result = store.get_allowed_users(domain_id).await?;

    Ok(match result {
        Some(users) => DomainUsers {
            exists: true,
            users,
        },
        None => DomainUsers {
            exists: false,
            users: Vec::new(),
        },
    })
}

/// Merges `candidates` into the domain's list and writes the full list back.
///
/// The write happens even when nothing was added, which also creates the
/// domain document on first use.
pub async fn add_users<S>(
    store: &S,
    domain_id: &str,
    candidates: Vec<AllowedUser>,
) -> Result<AddReport, StoreError>
where
    S: DomainStore + ?Sized,
{
    let DomainUsers { exists, mut users } = get_users(store, domain_id).await?;
    let previous_total = users.len();
    debug!(
        "Domain {} exists: {} ({} users)",
        domain_id, exists, previous_total
    );

    let outcome = merge_users(&mut users, candidates);

    store.set_allowed_users(domain_id, &users).await?;
    info!("Added {} users to domain {}", outcome.added, domain_id);

    Ok(AddReport {
        existed: exists,
        previous_total,
        added: outcome.added,
        skipped: outcome.skipped,
        total: users.len(),
    })
}

// Returns None without writing when the domain does not exist
pub async fn remove_users<S, E>(
    store: &S,
    domain_id: &str,
    emails: &[E],
) -> Result<Option<RemoveReport>, StoreError>
where
    S: DomainStore + ?Sized,
    E: AsRef<str>,
{
    let mut users = match store.get_allowed_users(domain_id).await? {
        Some(users) => users,
        None => return Ok(None),
    };

    let removed = remove_by_email(&mut users, emails);

    store.set_allowed_users(domain_id, &users).await?;
    info!("Removed {} users from domain {}", removed, domain_id);

    Ok(Some(RemoveReport {
        removed,
        remaining: users.len(),
    }))
}

pub async fn check_user<S>(store: &S, domain_id: &str, email: &str) -> Result<Access, StoreError>
where
    S: DomainStore + ?Sized,
{
    let users = match store.get_allowed_users(domain_id).await? {
        Some(users) => users,
        None => return Ok(Access::NoDomain),
    };

    Ok(match find_by_email(&users, email) {
        Some(user) => Access::Allowed(user.clone()),
        None => Access::Denied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn user(email: &str, name: &str) -> AllowedUser {
        AllowedUser::new(email, Some(name))
    }

    #[tokio::test]
    async fn test_add_to_missing_domain_creates_it() {
        let store = MemoryStore::new();

        let report = add_users(
            &store,
            "test",
            vec![user("user@example.com", "User Name")],
        )
        .await
        .unwrap();

        assert!(!report.existed);
        assert_eq!(report.added, 1);
        assert_eq!(report.total, 1);
        assert_eq!(
            store.users("test"),
            Some(vec![user("user@example.com", "User Name")])
        );
    }

    #[tokio::test]
    async fn test_add_skips_existing_email_ignoring_case() {
        let store = MemoryStore::new().with_domain("test", vec![user("a@x.com", "A")]);

        let report = add_users(
            &store,
            "test",
            vec![user("A@x.com", "A2"), user("b@x.com", "B")],
        )
        .await
        .unwrap();

        assert!(report.existed);
        assert_eq!(report.previous_total, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.skipped, vec!["A@x.com".to_string()]);
        assert_eq!(report.total, 2);
        assert_eq!(
            store.users("test"),
            Some(vec![user("a@x.com", "A"), user("b@x.com", "B")])
        );
    }

    #[tokio::test]
    async fn test_add_keeps_stored_entries_unchanged() {
        let unnamed = AllowedUser {
            email: "Old@X.com".to_string(),
            name: String::new(),
        };
        let store = MemoryStore::new().with_domain("test", vec![unnamed.clone()]);

        add_users(&store, "test", vec![user("b@x.com", "B")])
            .await
            .unwrap();

        assert_eq!(
            store.users("test"),
            Some(vec![unnamed, user("b@x.com", "B")])
        );
    }

    #[tokio::test]
    async fn test_add_writes_even_when_nothing_is_added() {
        let store = MemoryStore::new().with_domain("test", vec![user("a@x.com", "A")]);

        let report = add_users(&store, "test", vec![user("a@x.com", "A")])
            .await
            .unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_add_same_batch_twice() {
        let store = MemoryStore::new();
        let batch = vec![user("a@x.com", "A"), user("b@x.com", "B")];

        add_users(&store, "test", batch.clone()).await.unwrap();
        let second = add_users(&store, "test", batch).await.unwrap();

        assert_eq!(second.added, 0);
        assert_eq!(second.total, 2);
    }

    #[tokio::test]
    async fn test_get_missing_domain_does_not_create_it() {
        let store = MemoryStore::new();

        let result = get_users(&store, "missing").await.unwrap();

        assert!(!result.exists);
        assert!(result.users.is_empty());
        assert!(!store.contains("missing"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_from_missing_domain_writes_nothing() {
        let store = MemoryStore::new();

        let report = remove_users(&store, "missing", &["a@x.com"]).await.unwrap();

        assert_eq!(report, None);
        assert!(!store.contains("missing"));
    }

    #[tokio::test]
    async fn test_remove_users() {
        let store = MemoryStore::new().with_domain(
            "test",
            vec![user("a@x.com", "A"), user("b@x.com", "B")],
        );

        let report = remove_users(&store, "test", &["B@X.COM"]).await.unwrap();

        assert_eq!(
            report,
            Some(RemoveReport {
                removed: 1,
                remaining: 1
            })
        );
        assert_eq!(store.users("test"), Some(vec![user("a@x.com", "A")]));
    }

    #[tokio::test]
    async fn test_check_user() {
        let store = MemoryStore::new().with_domain("test", vec![user("a@x.com", "A")]);

        assert_eq!(
            check_user(&store, "test", "A@X.com").await.unwrap(),
            Access::Allowed(user("a@x.com", "A"))
        );
        assert_eq!(
            check_user(&store, "test", "b@x.com").await.unwrap(),
            Access::Denied
        );
        assert_eq!(
            check_user(&store, "other", "a@x.com").await.unwrap(),
            Access::NoDomain
        );
    }
}

// commands.rs - the allow-list subcommands and their console output

use crate::error::AdminError;
use allowlist_database::{
    domains::query::{add_users, check_user, get_users, remove_users, Access, AddReport},
    import::read_users_from_csv,
    AllowedUser, DomainStore,
};
use std::io::Write;
use std::path::Path;

/// Turns `email name email name ...` into users. A trailing email without a
/// name uses the email as its name; blank emails are dropped.
pub fn users_from_pairs(values: &[String]) -> Vec<AllowedUser> {
    values
        .chunks(2)
        .filter(|pair| !pair[0].trim().is_empty())
        .map(|pair| AllowedUser::new(&pair[0], pair.get(1).map(String::as_str)))
        .collect()
}

fn print_add_report<W: Write>(
    out: &mut W,
    domain_id: &str,
    report: &AddReport,
) -> Result<(), AdminError> {
    if report.existed {
        writeln!(out, "Existing users: {}", report.previous_total)?;
    } else {
        writeln!(out, "Domain \"{}\" does not exist, creating it", domain_id)?;
    }

    for email in &report.skipped {
        writeln!(out, "Skipped: {} is already registered", email)?;
    }

    writeln!(out, "Added {} users", report.added)?;
    writeln!(out, "Total users: {}", report.total)?;
    Ok(())
}

pub async fn add<S, W>(
    store: &S,
    out: &mut W,
    domain_id: &str,
    values: &[String],
) -> Result<(), AdminError>
where
    S: DomainStore + ?Sized,
    W: Write,
{
    let users = users_from_pairs(values);
    if users.is_empty() {
        return Err(AdminError::Usage(
            "Specify at least one user: add <domainId> <email1> <name1> [email2] [name2] ..."
                .to_string(),
        ));
    }

    let report = add_users(store, domain_id, users).await?;
    print_add_report(out, domain_id, &report)
}

pub async fn add_csv<S, W>(
    store: &S,
    out: &mut W,
    domain_id: &str,
    csv_path: &Path,
) -> Result<(), AdminError>
where
    S: DomainStore + ?Sized,
    W: Write,
{
    let users = read_users_from_csv(csv_path)?;
    writeln!(out, "Read {} users from the CSV file", users.len())?;

    let report = add_users(store, domain_id, users).await?;
    print_add_report(out, domain_id, &report)
}

pub async fn list<S, W>(store: &S, out: &mut W, domain_id: &str) -> Result<(), AdminError>
where
    S: DomainStore + ?Sized,
    W: Write,
{
    let domain = get_users(store, domain_id).await?;
    if !domain.exists {
        writeln!(out, "Domain \"{}\" does not exist", domain_id)?;
        return Ok(());
    }

    writeln!(
        out,
        "\nAllowed users for domain \"{}\" ({}):",
        domain_id,
        domain.users.len()
    )?;
    for (index, user) in domain.users.iter().enumerate() {
        writeln!(out, "{}. {} ({})", index + 1, user.email, user.display_name())?;
    }

    Ok(())
}

pub async fn remove<S, W>(
    store: &S,
    out: &mut W,
    domain_id: &str,
    emails: &[String],
) -> Result<(), AdminError>
where
    S: DomainStore + ?Sized,
    W: Write,
{
    match remove_users(store, domain_id, emails).await? {
        Some(report) => {
            writeln!(out, "Removed {} users", report.removed)?;
            writeln!(out, "Remaining users: {}", report.remaining)?;
        }
        None => writeln!(out, "Domain \"{}\" does not exist", domain_id)?,
    }

    Ok(())
}

// Returns whether the email is allowed on the domain
pub async fn check<S, W>(
    store: &S,
    out: &mut W,
    domain_id: &str,
    email: &str,
) -> Result<bool, AdminError>
where
    S: DomainStore + ?Sized,
    W: Write,
{
    match check_user(store, domain_id, email).await? {
        Access::Allowed(user) => {
            writeln!(
                out,
                "User \"{}\" is allowed on domain \"{}\" ({})",
                user.email,
                domain_id,
                user.display_name()
            )?;
            Ok(true)
        }
        Access::Denied => {
            writeln!(out, "User \"{}\" is not allowed on domain \"{}\"", email, domain_id)?;
            Ok(false)
        }
        Access::NoDomain => {
            writeln!(out, "Domain \"{}\" does not exist", domain_id)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allowlist_database::store::MemoryStore;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_pairs_with_trailing_email() {
        let users = users_from_pairs(&args(&["a@x.com", "Alice", "b@x.com"]));

        assert_eq!(
            users,
            vec![
                AllowedUser::new("a@x.com", Some("Alice")),
                AllowedUser::new("b@x.com", Some("b@x.com")),
            ]
        );
    }

    #[test]
    fn test_pairs_drop_blank_emails() {
        let users = users_from_pairs(&args(&["  ", "Nobody", "a@x.com", ""]));

        assert_eq!(users, vec![AllowedUser::new("a@x.com", None)]);
    }

    #[tokio::test]
    async fn test_add_creates_domain() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        add(&store, &mut out, "test", &args(&["user@example.com", "User Name"]))
            .await
            .unwrap();

        assert_eq!(
            store.users("test"),
            Some(vec![AllowedUser::new("user@example.com", Some("User Name"))])
        );
        assert_eq!(
            output(out),
            "Domain \"test\" does not exist, creating it\nAdded 1 users\nTotal users: 1\n"
        );
    }

    #[tokio::test]
    async fn test_add_reports_skipped_users() {
        let store = MemoryStore::new()
            .with_domain("test", vec![AllowedUser::new("a@x.com", Some("A"))]);
        let mut out = Vec::new();

        add(&store, &mut out, "test", &args(&["A@x.com", "A2", "b@x.com", "B"]))
            .await
            .unwrap();

        assert_eq!(
            output(out),
            "Existing users: 1\nSkipped: A@x.com is already registered\nAdded 1 users\nTotal users: 2\n"
        );
    }

    #[tokio::test]
    async fn test_add_without_users_is_a_usage_error() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        let err = add(&store, &mut out, "test", &args(&["", "Nobody"]))
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Usage(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_add_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, "email,name\np@q.com,\n,Ignored\n").unwrap();

        let store = MemoryStore::new();
        let mut out = Vec::new();

        add_csv(&store, &mut out, "test", &path).await.unwrap();

        assert_eq!(
            store.users("test"),
            Some(vec![AllowedUser::new("p@q.com", Some("p@q.com"))])
        );
        assert!(output(out).starts_with("Read 1 users from the CSV file\n"));
    }

    #[tokio::test]
    async fn test_add_csv_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let mut out = Vec::new();

        let err = add_csv(&store, &mut out, "test", &dir.path().join("missing.csv"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Csv(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_list() {
        let store = MemoryStore::new().with_domain(
            "test",
            vec![
                AllowedUser::new("a@x.com", Some("A")),
                AllowedUser::new("b@x.com", None),
            ],
        );
        let mut out = Vec::new();

        list(&store, &mut out, "test").await.unwrap();

        assert_eq!(
            output(out),
            "\nAllowed users for domain \"test\" (2):\n1. a@x.com (A)\n2. b@x.com (b@x.com)\n"
        );
    }

    #[tokio::test]
    async fn test_list_shows_email_for_unnamed_entry() {
        let store = MemoryStore::new().with_domain(
            "test",
            vec![AllowedUser {
                email: "a@x.com".to_string(),
                name: String::new(),
            }],
        );
        let mut out = Vec::new();

        list(&store, &mut out, "test").await.unwrap();

        assert!(output(out).ends_with("1. a@x.com (a@x.com)\n"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_list_missing_domain() {
        let store = MemoryStore::new();
        let mut out = Vec::new();

        list(&store, &mut out, "missing").await.unwrap();

        assert_eq!(output(out), "Domain \"missing\" does not exist\n");
        assert!(!store.contains("missing"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new().with_domain(
            "test",
            vec![
                AllowedUser::new("a@x.com", Some("A")),
                AllowedUser::new("b@x.com", Some("B")),
            ],
        );
        let mut out = Vec::new();

        remove(&store, &mut out, "test", &args(&["A@X.COM"]))
            .await
            .unwrap();

        assert_eq!(output(out), "Removed 1 users\nRemaining users: 1\n");
        assert_eq!(
            store.users("test"),
            Some(vec![AllowedUser::new("b@x.com", Some("B"))])
        );
    }

    #[tokio::test]
    async fn test_check() {
        let store = MemoryStore::new()
            .with_domain("test", vec![AllowedUser::new("a@x.com", Some("A"))]);

        let mut out = Vec::new();
        assert!(check(&store, &mut out, "test", "A@x.com").await.unwrap());
        assert_eq!(
            output(out),
            "User \"a@x.com\" is allowed on domain \"test\" (A)\n"
        );

        let mut out = Vec::new();
        assert!(!check(&store, &mut out, "test", "b@x.com").await.unwrap());

        let mut out = Vec::new();
        assert!(!check(&store, &mut out, "other", "a@x.com").await.unwrap());
        assert_eq!(output(out), "Domain \"other\" does not exist\n");
    }
}

// database/domains/merge.rs - case-insensitive merge and removal over allow-lists

use super::model::AllowedUser;
use std::collections::HashSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    // Emails of candidates that were already present, in input order
    pub skipped: Vec<String>,
}

/// Appends every candidate whose lowercased email is not yet in `users`.
///
/// Existing entries are never touched, including case-variant duplicates
/// that were already stored. A candidate that repeats an earlier candidate
/// is skipped as well.
pub fn merge_users<I>(users: &mut Vec<AllowedUser>, candidates: I) -> MergeOutcome
where
    I: IntoIterator<Item = AllowedUser>,
{
    let mut existing: HashSet<String> = users.iter().map(AllowedUser::email_key).collect();
    let mut outcome = MergeOutcome::default();

    for candidate in candidates {
        if existing.insert(candidate.email_key()) {
            users.push(candidate);
            outcome.added += 1;
        } else {
            outcome.skipped.push(candidate.email);
        }
    }

    outcome
}

/// Drops every entry whose email matches one of `emails`, ignoring case.
/// Returns the number of entries removed.
pub fn remove_by_email<S: AsRef<str>>(users: &mut Vec<AllowedUser>, emails: &[S]) -> usize {
    let targets: HashSet<String> = emails
        .iter()
        .map(|email| email.as_ref().trim().to_lowercase())
        .collect();

    let before = users.len();
    users.retain(|user| !targets.contains(&user.email_key()));
    before - users.len()
}

pub fn find_by_email<'a>(users: &'a [AllowedUser], email: &str) -> Option<&'a AllowedUser> {
    let key = email.trim().to_lowercase();
    users.iter().find(|user| user.email_key() == key)
}

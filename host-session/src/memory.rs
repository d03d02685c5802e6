//! In-memory hosts database used by the unit tests.
//!
//! Models what the tests rely on: password authentication, SELECT vs
//! EXECUTE grants per profile, case-insensitive `LIKE`, table order, and the
//! primary key on `host_id`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use validator::Validate;

use common::config::Profile;
use common::errors::{AppError, AppResult};
use common::models::{ColumnInfo, HostPattern, NewHost, ProcedureResult, QueryResult};
use common::utils::like_pattern::{self, ESCAPE};

use crate::store::HostStore;

#[derive(Debug, Clone)]
struct HostRecord {
    id: u32,
    name: String,
    since: NaiveDateTime,
    is_superhost: bool,
}

struct Account {
    user: &'static str,
    password: &'static str,
    profile: Profile,
}

#[derive(Default)]
struct Counters {
    statements: AtomicUsize,
    open_sessions: AtomicUsize,
}

/// A fake server shared by every session opened against it.
#[derive(Clone)]
pub struct MemoryServer {
    hosts: Arc<Mutex<Vec<HostRecord>>>,
    accounts: Arc<Vec<Account>>,
    counters: Arc<Counters>,
}

impl MemoryServer {
    /// Server with the `airbnbadmin` / `airbnbclient` accounts and a small
    /// hosts table.
    pub fn airbnb() -> Self {
        let hosts = [
            (7, "Kia", "2014-03-02", true),
            (12, "Marco", "2016-07-19", false),
            (19, "Nikia", "2015-11-30", false),
            (23, "Anouk", "2019-01-08", true),
            (31, "Priya", "2013-05-14", true),
            (44, "KIA", "2020-09-21", false),
        ]
        .into_iter()
        .map(|(id, name, since, is_superhost)| HostRecord {
            id,
            name: name.to_string(),
            since: NaiveDate::parse_from_str(since, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            is_superhost,
        })
        .collect();

        Self {
            hosts: Arc::new(Mutex::new(hosts)),
            accounts: Arc::new(vec![
                Account { user: "airbnbadmin", password: "adminpw", profile: Profile::Admin },
                Account { user: "airbnbclient", password: "clientpw", profile: Profile::Client },
            ]),
            counters: Arc::new(Counters::default()),
        }
    }

    pub async fn connect(&self, user: &str, password: &str) -> AppResult<MemoryHostStore> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.user == user && a.password == password)
            .ok_or_else(|| {
                AppError::AuthenticationFailed(format!(
                    "Access denied for user '{}'@'localhost' (using password: YES)",
                    user
                ))
            })?;

        self.counters.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHostStore {
            server: self.clone(),
            user: account.user,
            profile: account.profile,
            closed: AtomicBool::new(false),
        })
    }

    /// Statements executed by all sessions so far.
    pub fn statements(&self) -> usize {
        self.counters.statements.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.counters.open_sessions.load(Ordering::SeqCst)
    }

    pub async fn host_count(&self) -> usize {
        self.hosts.lock().await.len()
    }
}

/// A session on [`MemoryServer`].
pub struct MemoryHostStore {
    server: MemoryServer,
    user: &'static str,
    profile: Profile,
    closed: AtomicBool,
}

impl MemoryHostStore {
    fn begin_statement(&self) -> AppResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseQuery("connection is closed".into()));
        }
        self.server.counters.statements.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn require_execute(&self, routine: &str) -> AppResult<()> {
        match self.profile {
            Profile::Admin => Ok(()),
            Profile::Client => Err(AppError::PermissionDenied(format!(
                "execute command denied to user '{}'@'localhost' for routine 'airbnbdb.{}'",
                self.user, routine
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `%`
    AnySequence,
    /// `_`
    AnyChar,
    Literal(char),
}

/// `LIKE` under a case-insensitive collation, `\` escaping.
fn like_matches(pattern: &str, value: &str) -> bool {
    let tokens = tokenize(pattern);
    let chars: Vec<char> = value.chars().flat_map(char::to_lowercase).collect();

    // dp[j]: tokens[..i] match chars[..j]
    let mut dp = vec![false; chars.len() + 1];
    dp[0] = true;
    for token in &tokens {
        let mut next = vec![false; chars.len() + 1];
        match token {
            Token::AnySequence => {
                let mut reachable = false;
                for j in 0..=chars.len() {
                    reachable |= dp[j];
                    next[j] = reachable;
                }
            }
            Token::AnyChar => {
                for j in 1..=chars.len() {
                    next[j] = dp[j - 1];
                }
            }
            Token::Literal(c) => {
                for j in 1..=chars.len() {
                    next[j] = dp[j - 1] && chars[j - 1] == *c;
                }
            }
        }
        dp = next;
    }
    dp[chars.len()]
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => tokens.push(Token::AnySequence),
            '_' => tokens.push(Token::AnyChar),
            // a trailing escape matches itself
            ESCAPE => {
                let literal = chars.next().unwrap_or(ESCAPE);
                tokens.extend(literal.to_lowercase().map(Token::Literal));
            }
            _ => tokens.extend(c.to_lowercase().map(Token::Literal)),
        }
    }
    tokens
}

fn host_columns() -> Vec<ColumnInfo> {
    [
        ("host_id", "INT"),
        ("host_name", "VARCHAR"),
        ("host_since", "DATETIME"),
        ("is_superhost", "BOOLEAN"),
    ]
    .into_iter()
    .map(|(name, data_type)| ColumnInfo {
        name: name.to_string(),
        data_type: data_type.to_string(),
    })
    .collect()
}

fn host_rows<'a>(hosts: impl Iterator<Item = &'a HostRecord>) -> QueryResult {
    let rows = hosts
        .map(|h| {
            vec![
                json!(h.id),
                json!(h.name),
                json!(h.since.to_string()),
                json!(h.is_superhost),
            ]
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return QueryResult::empty();
    }
    QueryResult::from_rows(host_columns(), rows)
}

#[async_trait]
impl HostStore for MemoryHostStore {
    async fn lookup_hosts(&self, pattern: &HostPattern) -> AppResult<QueryResult> {
        self.begin_statement()?;
        let hosts = self.server.hosts.lock().await;
        Ok(host_rows(
            hosts
                .iter()
                .filter(|h| like_matches(pattern.as_str(), &h.name)),
        ))
    }

    async fn superhosts(&self) -> AppResult<ProcedureResult> {
        self.begin_statement()?;
        self.require_execute("superhosts")?;

        let hosts = self.server.hosts.lock().await;
        let set = host_rows(hosts.iter().filter(|h| h.is_superhost));
        Ok(ProcedureResult {
            result_sets: if set.is_empty() { vec![] } else { vec![set] },
            affected_rows: 0,
            execution_time_ms: 0,
        })
    }

    async fn add_host(&self, host: &NewHost) -> AppResult<ProcedureResult> {
        host.validate()?;
        self.begin_statement()?;
        self.require_execute("add_host2")?;

        let mut hosts = self.server.hosts.lock().await;
        if hosts.iter().any(|h| h.id == host.id) {
            return Err(AppError::DuplicateEntry(format!(
                "Duplicate entry '{}' for key 'hosts.PRIMARY'",
                host.id
            )));
        }
        hosts.push(HostRecord {
            id: host.id,
            name: host.name.clone(),
            since: Utc::now().naive_utc(),
            is_superhost: host.is_superhost,
        });

        Ok(ProcedureResult {
            result_sets: vec![],
            affected_rows: 1,
            execution_time_ms: 0,
        })
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.server.counters.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pattern_is_case_insensitive_equality() {
        assert!(like_matches("Kia", "kia"));
        assert!(like_matches("Kia", "KIA"));
        assert!(!like_matches("Kia", "Kiana"));
    }

    #[test]
    fn test_wildcards() {
        assert!(like_matches("%Kia%", "Nikia Dawn"));
        assert!(like_matches("%Kia%", "Kia"));
        assert!(like_matches("K_a", "Kya"));
        assert!(!like_matches("K_a", "Ka"));
        assert!(like_matches("%", ""));
        assert!(!like_matches("_", ""));
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        let pattern = format!("%{}%", like_pattern::escape("50%"));
        assert!(like_matches(&pattern, "Save 50% today"));
        assert!(!like_matches(&pattern, "Save 50 today"));
        assert!(like_matches(&like_pattern::escape(r"a\b"), r"a\b"));
    }
}

//! Command-line flags.

use clap::{ArgAction, Parser, ValueEnum};

use common::config::{AppConfig, Profile};
use common::models::{HostPattern, NewHost};

use crate::runner::SessionPlan;

/// How `--search` is turned into a `LIKE` pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// Names containing the term.
    #[default]
    Contains,
    /// Names equal to the term.
    Exact,
    /// The term is a LIKE pattern as-is.
    Raw,
}

/// Runs the host lookup and the two host procedures against airbnbdb.
#[derive(Debug, Parser)]
#[command(name = "host-session", version, about)]
pub struct Cli {
    /// Account tier; picks the default user.
    #[arg(long)]
    pub profile: Option<Profile>,

    /// Database host [env: DB_HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// Database port [env: DB_PORT]
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user [env: DB_USER]
    #[arg(long)]
    pub user: Option<String>,

    /// Database password [env: DB_PASSWORD]
    #[arg(long)]
    pub password: Option<String>,

    /// Database name [env: DB_NAME]
    #[arg(long)]
    pub database: Option<String>,

    /// Host name to look up.
    #[arg(long, default_value = "Kia")]
    pub search: String,

    #[arg(long = "match", value_enum, default_value_t = MatchMode::Contains)]
    pub match_mode: MatchMode,

    /// Id of the host to add.
    #[arg(long, default_value_t = 121)]
    pub new_host_id: u32,

    /// Name of the host to add.
    #[arg(long, default_value = "Lorem")]
    pub new_host_name: String,

    /// Superhost flag of the host to add.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub superhost: bool,

    /// Print the session report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Overrides `config` with the flags that were given.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if let Some(host) = &self.host {
            config.db_host = host.clone();
        }
        if let Some(port) = self.port {
            config.db_port = port;
        }
        if let Some(user) = &self.user {
            config.db_user = Some(user.clone());
        }
        if let Some(password) = &self.password {
            config.db_password = Some(password.clone());
        }
        if let Some(database) = &self.database {
            config.db_name = database.clone();
        }
    }

    pub fn pattern(&self) -> HostPattern {
        match self.match_mode {
            MatchMode::Contains => HostPattern::contains(&self.search),
            MatchMode::Exact => HostPattern::exact(&self.search),
            MatchMode::Raw => HostPattern::raw(self.search.clone()),
        }
    }

    pub fn plan(&self) -> SessionPlan {
        SessionPlan {
            lookup: self.pattern(),
            new_host: NewHost::new(self.new_host_id, self.new_host_name.clone(), self.superhost),
        }
    }
}

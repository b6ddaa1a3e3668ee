use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Translates the schema of a SQLite database into PostgreSQL DDL.
///
/// Only the structure is translated. No data is moved, and the SQLite database is
/// opened read only.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// The SQLite database to read the schema from
    #[arg(long, env = "SQLITE_DB_PATH")]
    pub sqlite_db_path: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Read the schema and report what was found in every table
    Analyze {
        /// Also write the report as JSON to this file
        #[arg(long)]
        json: Option<String>,
    },
    /// Write the translated schema to a SQL file that can be run with psql
    Export {
        #[arg(long, default_value = "postgresql_ddl.sql")]
        path: String,

        /// Skip counting the rows of every table
        #[arg(long)]
        no_row_counts: bool,
    },
    /// Execute the translated schema directly against a PostgreSQL database
    Apply {
        #[command(flatten)]
        target: TargetDbArgs,
    },
    /// Verify that the SQLite database can be read, and optionally that PostgreSQL can be reached
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TargetDbArgs {
    /// The host of the target database to create the schema in
    #[arg(long, env = "PGHOST")]
    pub target_db_host: String,

    /// The port of the target database to create the schema in
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub target_db_port: u16,

    /// The username to use when connecting to the target database
    #[arg(long, env = "PGUSER")]
    pub target_db_user: String,

    /// The password to use when connecting to the target database
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    pub target_db_password: String,

    /// The name of the target database to create the schema in
    #[arg(long, env = "PGDATABASE")]
    pub target_db_name: String,
}

impl TargetDbArgs {
    pub(crate) fn get_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.target_db_host,
            self.target_db_port,
            self.target_db_user,
            self.target_db_password,
            self.target_db_name
        )
    }
}

/// Same as [`TargetDbArgs`], except the target is only checked when a host is given.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// The host of the target database to check
    #[arg(long, env = "PGHOST")]
    pub target_db_host: Option<String>,

    /// The port of the target database to check
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub target_db_port: u16,

    /// The username to use when connecting to the target database
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub target_db_user: String,

    /// The password to use when connecting to the target database
    #[arg(long, env = "PGPASSWORD", hide_env_values = true, default_value = "")]
    pub target_db_password: String,

    /// The name of the target database. Defaults to the username.
    #[arg(long, env = "PGDATABASE")]
    pub target_db_name: Option<String>,
}

impl CheckArgs {
    pub(crate) fn target(&self) -> Option<TargetDbArgs> {
        let host = self.target_db_host.clone()?;

        Some(TargetDbArgs {
            target_db_host: host,
            target_db_port: self.target_db_port,
            target_db_user: self.target_db_user.clone(),
            target_db_password: self.target_db_password.clone(),
            target_db_name: self
                .target_db_name
                .clone()
                .unwrap_or_else(|| self.target_db_user.clone()),
        })
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}

#[test]
fn builds_connection_string() {
    let args = TargetDbArgs {
        target_db_host: "localhost".to_string(),
        target_db_port: 5433,
        target_db_user: "postgres".to_string(),
        target_db_password: "passw0rd".to_string(),
        target_db_name: "formula_one".to_string(),
    };

    assert_eq!(
        args.get_connection_string(),
        "host=localhost port=5433 user=postgres password=passw0rd dbname=formula_one"
    );
}

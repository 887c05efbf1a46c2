//! The `approvals-seeder` command line.
//!
//! Commands produce a [`CommandResult`] instead of printing, so the binary
//! only has to write the lines out and exit with the code.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use crate::{
    firestore::{Credentials, FirestoreClientOptions, FirestoreConnector},
    store::{memory::InMemoryConnector, ApprovalLookup, CollectionReference, StoreConnector},
    Catalog, Seeder, ServiceAccount, DEFAULT_COLLECTION,
};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_STORE_UNAVAILABLE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "approvals-seeder",
    about = "Populate a Firestore collection with sample approval requests",
    after_help = "Examples:\n  approvals-seeder --service-account ./service-account.json\n  approvals-seeder --emulator-host 127.0.0.1:8080 --project-id demo-approvals\n  approvals-seeder --dry-run --list-requested-by user1@example.com"
)]
pub struct Args {
    /// Collection to add the documents to, e.g. `approvals` or `teams/core/approvals`
    #[arg(long, env = "SEED_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// JSON catalog to seed instead of the built-in sample approvals
    #[arg(long, env = "SEED_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Firestore endpoint
    #[arg(long, env = "FIRESTORE_HOST_URL")]
    pub host_url: Option<String>,

    /// Firestore database ID
    #[arg(long, env = "FIRESTORE_DATABASE_ID", default_value = "(default)")]
    pub database_id: String,

    /// Use the Firestore emulator at HOST:PORT with emulator credentials
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    /// Project to use with the emulator
    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Service account JSON file; falls back to the FIREBASE_* variables
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub service_account: Option<PathBuf>,

    /// Seed an in-memory store instead of Firestore
    #[arg(long)]
    pub dry_run: bool,

    /// Only parse and validate the catalog
    #[arg(long)]
    pub validate_only: bool,

    /// Print the item names and statuses requested by this user after seeding
    #[arg(long, value_name = "USER")]
    pub list_requested_by: Option<String>,

    /// Don't seed; only useful together with --list-requested-by
    #[arg(long, requires = "list_requested_by")]
    pub skip_seed: bool,
}

/// Lines for stdout and stderr, plus the process exit code.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

impl CommandResult {
    fn exit(mut self, exit_code: u8) -> Self {
        self.exit_code = exit_code;
        self
    }
}

/// Runs the command described by `args`. Configuration and catalog problems
/// exit with [`EXIT_CONFIG`] before any store is contacted.
pub async fn run(args: Args) -> CommandResult {
    match configure_and_execute(&args).await {
        Ok(result) => result,
        Err(e) => CommandResult {
            exit_code: EXIT_CONFIG,
            errors: vec![format!("Error: {e:?}")],
            ..Default::default()
        },
    }
}

async fn configure_and_execute(args: &Args) -> anyhow::Result<CommandResult> {
    let collection = CollectionReference::parse(&args.collection)?;

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path),
        None => Catalog::sample(),
    }
    .context("Invalid catalog")?;

    if args.validate_only {
        return Ok(CommandResult {
            output: vec![format!(
                "Catalog is valid: {} approval requests",
                catalog.len()
            )],
            ..Default::default()
        });
    }

    let seeder = Seeder::new(collection);

    if args.dry_run {
        return Ok(execute(args, &seeder, &catalog, &InMemoryConnector::default()).await);
    }

    let connector = firestore_connector(args)?;
    Ok(execute(args, &seeder, &catalog, &connector).await)
}

fn firestore_connector(args: &Args) -> anyhow::Result<FirestoreConnector> {
    let mut options = FirestoreClientOptions::default().database_id(&args.database_id);
    if let Some(host_url) = &args.host_url {
        options = options.host_url(host_url);
    }

    let credentials = if let Some(emulator_host) = &args.emulator_host {
        let Some(project_id) = args.project_id.clone() else {
            bail!("--project-id (or FIREBASE_PROJECT_ID) is required when using the emulator");
        };
        options = options.emulator(emulator_host);
        Credentials::Emulator { project_id }
    } else {
        let service_account = match &args.service_account {
            Some(path) => ServiceAccount::from_file(path)?,
            None => ServiceAccount::from_env().context(
                "No credentials: pass --service-account or set the FIREBASE_* variables",
            )?,
        };
        Credentials::ServiceAccount(service_account)
    };

    tracing::info!(
        host = %options.host_url,
        project = %credentials.project_id(),
        "Using Firestore"
    );

    Ok(FirestoreConnector::new(credentials, options))
}

/// Seeds through `connector` and, if asked for, lists one requester's items.
///
/// Failed records still exit with [`EXIT_SUCCESS`]; only a store that can't
/// be opened exits with [`EXIT_STORE_UNAVAILABLE`].
pub async fn execute<C>(
    args: &Args,
    seeder: &Seeder,
    catalog: &Catalog,
    connector: &C,
) -> CommandResult
where
    C: StoreConnector,
    C::Store: ApprovalLookup,
{
    let mut result = CommandResult::default();

    if !args.skip_seed {
        result.output.push(format!(
            "Populating {} with {} approval requests...",
            seeder.collection(),
            catalog.len()
        ));

        let report = match seeder.run(catalog, connector).await {
            Ok(report) => report,
            Err(e) => {
                result.errors.push(format!("Error populating database: {e:?}"));
                return result.exit(EXIT_STORE_UNAVAILABLE);
            }
        };

        for outcome in report.outcomes() {
            if outcome.is_success() {
                result.output.push(outcome.to_string());
            } else {
                result.errors.push(outcome.to_string());
            }
        }
        result.output.push(report.summary());
    }

    if let Some(user) = &args.list_requested_by {
        let exit_code = list_requested_by(connector, seeder.collection(), user, &mut result).await;
        return result.exit(exit_code);
    }

    result.exit(EXIT_SUCCESS)
}

async fn list_requested_by<C>(
    connector: &C,
    collection: &CollectionReference,
    user: &str,
    result: &mut CommandResult,
) -> u8
where
    C: StoreConnector,
    C::Store: ApprovalLookup,
{
    let mut store = match connector.open().await {
        Ok(store) => store,
        Err(e) => {
            result.errors.push(format!("Error listing requests by {user}: {e:?}"));
            connector.close(None).await;
            return EXIT_STORE_UNAVAILABLE;
        }
    };

    match store.approvals_requested_by(collection, user).await {
        Ok(items) => {
            result.output.push(format!("Requests by {user}:"));
            result.output.extend(
                items
                    .into_iter()
                    .map(|item| format!("  {} ({})", item.item_name, item.status)),
            );
        }
        Err(e) => result.errors.push(format!("Error listing requests by {user}: {e}")),
    }

    connector.close(Some(store)).await;

    EXIT_SUCCESS
}

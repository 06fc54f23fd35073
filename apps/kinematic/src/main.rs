use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    load_settings, FormError, KinematicController, MissingRemoteTable, PostgrestTable, RemoteTable,
};
use shared::domain::{EntryId, KinematicDraft};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{render_entries, TerminalNotifier};

#[derive(Parser, Debug)]
#[command(about = "Manage servo kinematic ranges stored in a hosted table")]
struct Cli {
    /// Settings file; defaults to ./kinematic.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every entry of a group
    Fetch {
        #[arg(long)]
        group: String,
    },
    /// Insert a new entry
    Save {
        #[arg(long)]
        group: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Load an entry of the group, apply the given fields and write it back
    Update {
        #[arg(long)]
        group: String,
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an entry; with --group the group is listed again afterwards
    Delete {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
    #[arg(long, allow_negative_numbers = true)]
    servo: Option<i32>,
    #[arg(long)]
    direction: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    min: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    max: Option<i32>,
}

impl FieldArgs {
    fn apply(self, draft: &mut KinematicDraft) {
        if let Some(servo) = self.servo {
            draft.servo_id = Some(servo);
        }
        if let Some(direction) = self.direction {
            draft.direction = direction;
        }
        if let Some(min) = self.min {
            draft.min_value = Some(min);
        }
        if let Some(max) = self.max {
            draft.max_value = Some(max);
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref());
    let table: Arc<dyn RemoteTable> = if settings.is_configured() {
        Arc::new(
            PostgrestTable::from_settings(&settings)
                .context("failed to set up the remote table client")?,
        )
    } else {
        warn!("SUPABASE_URL / SUPABASE_ANON_KEY not configured; remote calls will fail");
        Arc::new(MissingRemoteTable)
    };
    let mut controller = KinematicController::new(table, Arc::new(TerminalNotifier));

    let outcome = run(&mut controller, cli.command).await?;
    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &Result<(), FormError>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(
    controller: &mut KinematicController,
    command: Command,
) -> Result<Result<(), FormError>> {
    let outcome = match command {
        Command::Fetch { group } => fetch_and_render(controller, group).await?,
        Command::Save { group, fields } => {
            let draft = controller.draft_mut();
            draft.group_id = group;
            fields.apply(draft);
            controller.save().await.map(|_| ())
        }
        Command::Update { group, id, fields } => {
            controller.draft_mut().group_id = group;
            if let Err(err) = controller.fetch_by_group().await {
                return Ok(Err(err));
            }
            let selected = controller
                .results()
                .iter()
                .find(|entry| entry.id == Some(EntryId(id)))
                .cloned();
            if let Some(entry) = selected {
                controller.select_for_edit(&entry);
            }
            fields.apply(controller.draft_mut());
            controller.update().await.map(|_| ())
        }
        Command::Delete { id, group } => {
            let deleted = controller.delete(id.map(EntryId)).await.map(|_| ());
            match (deleted, group) {
                (Ok(()), Some(group)) => fetch_and_render(controller, group).await?,
                (deleted, _) => deleted,
            }
        }
    };
    Ok(outcome)
}

async fn fetch_and_render(
    controller: &mut KinematicController,
    group: String,
) -> Result<Result<(), FormError>> {
    controller.draft_mut().group_id = group;
    if let Err(err) = controller.fetch_by_group().await {
        return Ok(Err(err));
    }
    render_entries(&mut io::stdout().lock(), controller.results())
        .context("failed to write results")?;
    Ok(Ok(()))
}

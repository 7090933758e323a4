//! Command dispatch: maps parsed arguments onto department use cases

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{expand_env_vars, global_config_path, Settings};
use crate::domain::{DomainError, FlatRecord, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `orgtree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => config_command(cli, command),
        _ => {
            let container = open_container(cli)?;
            department_command(&container, command)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(store) = &cli.store {
        settings.store_path = PathBuf::from(expand_env_vars(&store.to_string_lossy()));
    }
    Ok(settings)
}

fn open_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli)?;
    debug!("store: {}", settings.store_path.display());
    Ok(ServiceContainer::open(settings)?)
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn department_command(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let departments = &container.departments;

    match command {
        Commands::Init { title } => {
            let title = title
                .as_deref()
                .unwrap_or(container.settings.default_root_title.as_str());
            let record = departments.create_root(title)?;
            output::action("Created root", &describe(&record));
        }
        Commands::List => {
            for records in departments.list()? {
                if let Some(root) = records.first() {
                    output::header(&root.title);
                }
                for record in &records {
                    output::detail(&describe(record));
                }
            }
        }
        Commands::Tree { root } => {
            let trees = match root {
                Some(root_id) => vec![departments.tree(*root_id)?],
                None => departments.trees()?,
            };
            if trees.is_empty() {
                output::warning("no departments yet, run `orgtree init`");
            }
            for tree in trees {
                output::info(&tree.to_tree_string());
            }
        }
        Commands::Show { id } => {
            let record = departments.get(*id)?;
            output::detail(&format!("id:     {}", record.id));
            output::detail(&format!("title:  {}", record.title));
            output::detail(&format!("parent: {}", parent_label(record.parent_id)));
        }
        Commands::Add { title, parent } => {
            let record = departments.create(title, *parent)?;
            output::action("Created", &describe(&record));
        }
        Commands::Rename { id, title } => {
            let record = departments.rename(*id, title)?;
            output::action("Renamed", &describe(&record));
        }
        Commands::Move { id, parent } => {
            let record = departments.move_department(*id, *parent)?;
            output::action("Moved", &describe(&record));
        }
        Commands::Delete { id, force } => delete(container, *id, *force)?,
        Commands::Config { .. } | Commands::Completion { .. } => {}
    }
    Ok(())
}

fn delete(container: &ServiceContainer, id: Uuid, force: bool) -> CliResult<()> {
    let departments = &container.departments;
    if force {
        let removed = departments.delete_with_children(id)?;
        for removed_id in &removed {
            output::removed(removed_id);
        }
        output::action("Deleted", &format!("{} departments", removed.len()));
        return Ok(());
    }

    match departments.delete(id) {
        Ok(()) => {
            output::action("Deleted", &id);
            Ok(())
        }
        Err(ApplicationError::Domain(e @ DomainError::ForbiddenDeleteWithChildren(_))) => {
            output::warning("department has sub-departments, use --force to delete them too");
            Err(ApplicationError::Domain(e).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn describe(record: &FlatRecord) -> String {
    format!(
        "{}  {}  (parent: {})",
        record.id,
        record.title,
        parent_label(record.parent_id)
    )
}

fn parent_label(parent_id: Option<Uuid>) -> String {
    parent_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

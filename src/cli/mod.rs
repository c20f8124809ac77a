mod output;

use crate::model::Group;
use crate::ssh::{self, ConnectOptions};
use crate::store::{Config, resolve_config_path};
use crate::ui;
use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sshto",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")"),
    about = "SSH connection manager with an interactive menu",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Server name for a direct connection; omit for the interactive list
    name: Option<String>,
    #[command(flatten)]
    overrides: OverrideArgs,
    #[arg(long, env = "SSHTO_CONFIG", global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a server by name
    #[command(alias = "c")]
    Connect(ConnectArgs),
    /// Interactive server selection
    #[command(aliases = ["ls", "l"])]
    List(ListArgs),
    /// Add a new server through the interactive form
    Add,
    /// Edit an existing server
    Edit(EditArgs),
    /// Remove a server
    #[command(aliases = ["rm", "delete"])]
    Remove(RemoveArgs),
    /// Manage server groups
    Groups(GroupsArgs),
    /// Show the config file path
    Config,
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct OverrideArgs {
    /// Override user
    #[arg(short, long)]
    user: Option<String>,
    /// Override port
    #[arg(short, long)]
    port: Option<u16>,
    /// Override key file
    #[arg(short, long, value_name = "PATH")]
    key: Option<String>,
}

impl OverrideArgs {
    fn to_options(&self) -> ConnectOptions {
        ConnectOptions {
            user: self.user.clone().unwrap_or_default(),
            port: self.port.unwrap_or(0),
            key: self.key.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args)]
struct ConnectArgs {
    name: String,
    #[command(flatten)]
    overrides: OverrideArgs,
    /// Probe connectivity instead of opening a session
    #[arg(short, long)]
    test: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Filter by group
    #[arg(short, long)]
    group: Option<String>,
    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Args)]
struct EditArgs {
    name: String,
}

#[derive(Args)]
struct RemoveArgs {
    name: String,
    /// Skip confirmation
    #[arg(short, long)]
    force: bool,
}

#[derive(Args)]
struct GroupsArgs {
    #[command(subcommand)]
    command: Option<GroupsCommand>,
}

#[derive(Subcommand)]
enum GroupsCommand {
    /// List all groups
    List,
    /// Add a new group with an optional color
    Add {
        name: String,
        /// One of: red, green, yellow, blue, magenta, cyan, white, gray
        color: Option<String>,
    },
    /// Remove a group; servers keep their group tag
    #[command(alias = "rm")]
    Remove { name: String },
}

#[derive(Args)]
struct CompletionsArgs {
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions(args)) = &cli.command {
        generate_completions(args.shell);
        return Ok(());
    }

    let path = resolve_config_path(cli.config)?;
    let mut config = Config::load(path)?;

    match cli.command {
        Some(Commands::Connect(args)) => {
            connect(&config, &args.name, &args.overrides.to_options(), args.test)
        }
        Some(Commands::List(args)) => list(
            &config,
            args.group.as_deref().unwrap_or(""),
            &args.overrides.to_options(),
        ),
        Some(Commands::Add) => add(&mut config),
        Some(Commands::Edit(args)) => edit(&mut config, &args.name),
        Some(Commands::Remove(args)) => remove(&mut config, &args.name, args.force),
        Some(Commands::Groups(args)) => match args.command {
            None | Some(GroupsCommand::List) => {
                output::print_groups(&config);
                Ok(())
            }
            Some(GroupsCommand::Add { name, color }) => {
                group_add(&mut config, name, color.unwrap_or_default())
            }
            Some(GroupsCommand::Remove { name }) => group_remove(&mut config, &name),
        },
        Some(Commands::Config) => {
            println!("{}", config.path().display());
            Ok(())
        }
        Some(Commands::Completions(_)) => unreachable!(),
        None => match cli.name {
            Some(name) => connect(&config, &name, &cli.overrides.to_options(), false),
            None => list(&config, "", &cli.overrides.to_options()),
        },
    }
}

fn connect(config: &Config, name: &str, opts: &ConnectOptions, test: bool) -> Result<()> {
    let server = config.find_server(name)?;
    let resolved = ssh::resolve(server, &config.defaults, opts);

    if test {
        ssh::test_connection(&resolved)?;
        println!("Connection to {:?} OK", resolved.name);
        return Ok(());
    }

    ssh::connect(&resolved)?;
    Ok(())
}

fn list(config: &Config, group: &str, opts: &ConnectOptions) -> Result<()> {
    let servers = ui::filter_by_group(&config.servers, group);
    if servers.is_empty() {
        println!("No servers configured. Use 'sshto add' to add a server.");
        return Ok(());
    }

    let Some(selected) = ui::run_select(&servers, &config.groups)? else {
        return Ok(());
    };

    println!("Connecting to {}...", selected.name);
    connect(config, &selected.name, opts, false)
}

fn add(config: &mut Config) -> Result<()> {
    let Some(server) = ui::run_form(None, &config.groups)? else {
        println!("Canceled.");
        return Ok(());
    };

    config.add_server(server.clone())?;
    config.save()?;
    println!("Server {:?} added successfully.", server.name);
    Ok(())
}

fn edit(config: &mut Config, name: &str) -> Result<()> {
    let existing = config.find_server(name)?.clone();

    let Some(edited) = ui::run_form(Some(&existing), &config.groups)? else {
        println!("Canceled.");
        return Ok(());
    };

    config.update_server(name, edited.clone())?;
    config.save()?;
    println!("Server {:?} updated successfully.", edited.name);
    Ok(())
}

fn remove(config: &mut Config, name: &str, force: bool) -> Result<()> {
    config.find_server(name)?;

    if !force {
        let prompt = format!("Are you sure you want to remove server {:?}? [y/N]: ", name);
        if !confirm(&prompt)? {
            println!("Canceled.");
            return Ok(());
        }
    }

    config.remove_server(name)?;
    config.save()?;
    println!("Server {:?} removed.", name);
    Ok(())
}

fn group_add(config: &mut Config, name: String, color: String) -> Result<()> {
    config.add_group(Group {
        name: name.clone(),
        color,
    })?;
    config.save()?;
    println!("Group {:?} added.", name);
    Ok(())
}

fn group_remove(config: &mut Config, name: &str) -> Result<()> {
    config.find_group(name)?;

    let referencing = config.servers_by_group(name).len();
    if referencing > 0 {
        println!("Warning: {} server(s) belong to this group.", referencing);
        let prompt = format!("Remove group {:?}? [y/N]: ", name);
        if !confirm(&prompt)? {
            println!("Canceled.");
            return Ok(());
        }
    }

    config.remove_group(name)?;
    config.save()?;
    println!("Group {:?} removed.", name);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "sshto", &mut io::stdout());
}

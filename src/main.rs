use anyhow::Result;
use calp::areas::repository::Repository;
use calp::artifacts::objects::object_type::ObjectType;
use calp::artifacts::status::status_info::StatusInfo;
use calp::commands::plumbing::hash_object::hash_detached;
use calp::commands::porcelain::checkout::CheckoutOutcome;
use calp::commands::porcelain::rebase::RebaseOutcome;
use calp::errors::CalpError;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "calp",
    version = "0.1.0",
    about = "A minimal content-addressed version control system",
    long_about = "calp stores snapshots of a working tree as zlib-compressed, SHA-1 addressed \
    objects and keeps branches, an index and a commit history next to them.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as an object and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        object_type: String,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the raw content of an object. \
        With a type, the object must be of that type (a commit is followed to its tree)."
    )]
    CatFile {
        #[arg(index = 1, help = "Expected object type, or the object when omitted")]
        first: String,
        #[arg(index = 2, help = "The object to print")]
        second: Option<String>,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "Tree or commit to list")]
        tree_ish: String,
    },
    #[command(name = "write-tree", about = "Store the index as a tree object")]
    WriteTree,
    #[command(name = "add", about = "Add file contents to the index")]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "checkout", about = "Switch branches")]
    Checkout {
        #[arg(short = 'b', help = "Create the branch at HEAD before switching to it")]
        new_branch: bool,
        #[arg(index = 1, help = "The branch to switch to")]
        target: String,
    },
    #[command(name = "cherry-pick", about = "Apply the changes introduced by a commit")]
    CherryPick {
        #[arg(index = 1, help = "The commit to pick")]
        commit: String,
    },
    #[command(name = "rebase", about = "Replay the current branch on top of another branch")]
    Rebase {
        #[arg(index = 1, help = "The branch to rebase onto")]
        target: String,
    },
    #[command(name = "log", about = "Show the commit history of HEAD")]
    Log,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli.command) {
        eprintln!("{} {error:#}", "error:".red().bold());
        if let Some(CalpError::UncommittedChanges(status)) = error.downcast_ref::<CalpError>() {
            let _ = print_status(&mut std::io::stderr(), status);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?.canonicalize()?;
    let mut stdout = std::io::stdout();

    match command {
        Commands::Init { path } => {
            let path = path.map(|path| pwd.join(path)).unwrap_or_else(|| pwd.clone());
            let repository = Repository::init(path)?;

            writeln!(
                stdout,
                "Initialized empty repository in {}",
                repository.metadata_path().display()
            )?;
        }
        Commands::HashObject {
            object_type,
            write,
            file,
        } => {
            let object_type = ObjectType::try_from(object_type.as_str())?;
            let oid = if write {
                Repository::find(&pwd)?.hash_file(object_type, &pwd.join(file), true)?
            } else {
                let data = std::fs::read(pwd.join(&file))?;
                hash_detached(object_type, &data)?
            };

            writeln!(stdout, "{oid}")?;
        }
        Commands::CatFile { first, second } => {
            let repository = Repository::find(&pwd)?;
            let (object_type, object) = match second {
                Some(object) => (Some(ObjectType::try_from(first.as_str())?), object),
                None => (None, first),
            };

            let (_, content) = repository.cat_file(object_type, &object)?;
            stdout.write_all(&content)?;
        }
        Commands::LsTree {
            recursive,
            tree_ish,
        } => {
            let repository = Repository::find(&pwd)?;
            for entry in repository.ls_tree(&tree_ish, recursive)? {
                writeln!(stdout, "{entry}")?;
            }
        }
        Commands::WriteTree => {
            let oid = Repository::find(&pwd)?.write_tree()?;
            writeln!(stdout, "{oid}")?;
        }
        Commands::Add { paths } => {
            let paths = paths.iter().map(|path| pwd.join(path)).collect::<Vec<_>>();
            Repository::find(&pwd)?.add(&paths)?;
        }
        Commands::Status => {
            let status = Repository::find(&pwd)?.status()?;
            print_status(&mut stdout, &status)?;
        }
        Commands::Commit { message } => {
            let repository = Repository::find(&pwd)?;
            match repository.commit(&message)? {
                Some(oid) => {
                    let branch = repository
                        .refs()
                        .current_branch_name()
                        .map(|branch| branch.to_string())
                        .unwrap_or_else(|_| "detached HEAD".to_string());
                    writeln!(
                        stdout,
                        "[{} {}] {}",
                        branch,
                        oid.to_short_oid().yellow(),
                        message.lines().next().unwrap_or_default()
                    )?;
                }
                None => writeln!(stdout, "nothing to commit, working tree clean")?,
            }
        }
        Commands::Checkout { new_branch, target } => {
            match Repository::find(&pwd)?.checkout(&target, new_branch)? {
                CheckoutOutcome::Created(branch) => {
                    writeln!(stdout, "Switched to a new branch '{}'", branch.to_string().green())?
                }
                CheckoutOutcome::Switched(branch) => {
                    writeln!(stdout, "Switched to branch '{}'", branch.to_string().green())?
                }
                CheckoutOutcome::AlreadyOn(branch) => writeln!(stdout, "Already on '{branch}'")?,
            }
        }
        Commands::CherryPick { commit } => match Repository::find(&pwd)?.cherry_pick(&commit)? {
            Some(oid) => writeln!(stdout, "{oid}")?,
            None => writeln!(stdout, "nothing to commit, changes already applied")?,
        },
        Commands::Rebase { target } => match Repository::find(&pwd)?.rebase(&target)? {
            RebaseOutcome::UpToDate => writeln!(stdout, "Current branch is up to date.")?,
            RebaseOutcome::Rebased { onto, head, replayed } => {
                writeln!(
                    stdout,
                    "Rebased {} commit(s) onto {}; HEAD is now {}",
                    replayed.len(),
                    onto.to_short_oid().yellow(),
                    head.to_short_oid().yellow()
                )?;
            }
        },
        Commands::Log => {
            for (oid, commit) in Repository::find(&pwd)?.log()? {
                writeln!(stdout, "{}", format!("commit {oid}").yellow())?;
                if let Some(author) = commit.author() {
                    writeln!(stdout, "Author: {}", author.display_name())?;
                    writeln!(stdout, "Date:   {}", author.readable_timestamp())?;
                }
                writeln!(stdout)?;
                for line in commit.message().lines() {
                    writeln!(stdout, "    {line}")?;
                }
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

fn print_status(writer: &mut impl Write, status: &StatusInfo) -> std::io::Result<()> {
    let lines = status
        .modified
        .iter()
        .map(|path| (" M", path))
        .chain(status.deleted.iter().map(|path| (" D", path)))
        .chain(status.untracked.iter().map(|path| ("??", path)));

    for (label, path) in lines {
        writeln!(writer, "{} {path}", label.red())?;
    }

    Ok(())
}

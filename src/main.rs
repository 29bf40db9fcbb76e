use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use quill::areas::repository::Repository;
use quill::artifacts::core::PagerWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "quill",
    version = "0.1.0",
    about = "A content-addressable page store",
    long_about = "Quill stores file content as immutable, hash-identified objects, \
    groups named file-to-object mappings into tree snapshots, \
    and chains snapshots into commits so any file's history can be replayed.",
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
        path: Option<String>,
    },
    #[command(
        name = "commit",
        about = "Record a snapshot of the given files",
        long_about = "This command stores the given files (or every file in the workspace when \
        none are given) and records a commit carrying unchanged files forward from the previous snapshot."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(help = "Files to include in the commit; all workspace files when omitted")]
        files: Vec<PathBuf>,
    },
    #[command(
        name = "show",
        about = "Print the current content of a file",
        long_about = "This command prints the content of a file as recorded in the latest commit."
    )]
    Show {
        #[arg(index = 1, help = "The filename to show")]
        filename: String,
    },
    #[command(
        name = "log",
        about = "Show the change history of a file",
        long_about = "This command walks the commit chain and prints each commit where the \
        file's content changed, newest first."
    )]
    Log {
        #[arg(index = 1, help = "The filename to trace")]
        filename: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object (or a unique prefix) to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command hashes a file as a blob object and can write it to the \
        object database. It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::Commit { message, files } => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.commit(files, message.as_str()).await?;
        }
        Commands::Show { filename } => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.show(filename)?
        }
        Commands::Log { filename } => {
            let pwd = std::env::current_dir()?;

            // page long histories when attached to a terminal
            if std::io::stdout().is_terminal() {
                let pager = minus::Pager::new();
                let mut repository = Repository::new(
                    &pwd.to_string_lossy(),
                    Box::new(PagerWriter::new(pager.clone())),
                )?;

                repository.log(filename)?;
                PagerWriter::show(pager)?;
            } else {
                let mut repository =
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

                repository.log(filename)?;
            }
        }
        Commands::CatFile { sha } => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.cat_file(sha)?
        }
        Commands::HashObject { write, file } => {
            let pwd = std::env::current_dir()?;
            let mut repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.hash_object(file, *write)?
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiver_types::ObjectId;

#[derive(Parser)]
#[command(
    name = "quiver",
    about = "Quiver: a personal store of objects that double as links",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Storage root holding the `o/` object directories
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store and its first object
    Init(InitArgs),
    /// Create a new object
    New(NewArgs),
    /// Set the name of an object
    Name(TextArgs),
    /// Set the notes of an object
    Note(TextArgs),
    /// Turn an existing object into a link between two others
    Link(LinkArgs),
    /// Create a new link object from one object to another
    Connect(ConnectArgs),
    /// Print objects with their adjacent links
    Show(ShowArgs),
    /// List every object
    List(ListArgs),
    /// Verify the consistency of every object
    Check(CheckArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Name of the first object
    #[arg(long, default_value = "root")]
    pub name: String,
}

#[derive(Args)]
pub struct NewArgs {
    pub name: Vec<String>,
}

#[derive(Args)]
pub struct TextArgs {
    pub id: ObjectId,
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct LinkArgs {
    pub link: ObjectId,
    pub domain: ObjectId,
    pub codomain: ObjectId,
}

#[derive(Args)]
pub struct ConnectArgs {
    pub from: ObjectId,
    pub to: ObjectId,
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Objects to print; the first object when omitted
    pub ids: Vec<ObjectId>,
    /// Terse dump instead of the numbered listing
    #[arg(short = 'r', long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct CheckArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["quiver", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.name, "root");
        } else { panic!("wrong command"); }
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn parse_new_with_multiword_name() {
        let cli = Cli::try_parse_from(["quiver", "new", "reading", "list"]).unwrap();
        if let Command::New(args) = cli.command {
            assert_eq!(args.name, vec!["reading", "list"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_name_takes_hex_id() {
        let cli = Cli::try_parse_from(["quiver", "name", "1f", "Alice"]).unwrap();
        if let Command::Name(args) = cli.command {
            assert_eq!(args.id, ObjectId::new(0x1f));
            assert_eq!(args.text, vec!["Alice"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_rejects_non_hex_id() {
        assert!(Cli::try_parse_from(["quiver", "note", "zz", "text"]).is_err());
    }

    #[test]
    fn parse_link() {
        let cli = Cli::try_parse_from(["quiver", "link", "3", "1", "2"]).unwrap();
        if let Command::Link(args) = cli.command {
            assert_eq!(args.link, ObjectId::new(3));
            assert_eq!(args.domain, ObjectId::new(1));
            assert_eq!(args.codomain, ObjectId::new(2));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_connect_with_name() {
        let cli = Cli::try_parse_from(["quiver", "connect", "1", "2", "-n", "knows"]).unwrap();
        if let Command::Connect(args) = cli.command {
            assert_eq!(args.name, Some("knows".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_raw() {
        let cli = Cli::try_parse_from(["quiver", "show", "--raw", "1", "2"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert!(args.raw);
            assert_eq!(args.ids.len(), 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "quiver", "--verbose", "--format", "json", "--root", "/tmp/q", "list",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.root, PathBuf::from("/tmp/q"));
    }

    #[test]
    fn parse_config_after_subcommand() {
        let cli = Cli::try_parse_from(["quiver", "check", "--config", "q.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("q.toml")));
    }
}

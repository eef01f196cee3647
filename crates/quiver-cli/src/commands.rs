use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use quiver_store::{FsObjectStore, StoreConfig};
use quiver_types::ObjectId;
use quiver_world::{render, render_raw, DirtySet, Object, World};

use crate::cli::*;
use crate::config::load_store_config;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        root,
        config,
        ..
    } = cli;
    let config = load_store_config(config.as_deref())?;

    match command {
        Command::Init(args) => cmd_init(&root, config, args),
        Command::New(args) => with_session(&root, config, |s| s.cmd_new(args)),
        Command::Name(args) => with_session(&root, config, |s| s.cmd_name(args)),
        Command::Note(args) => with_session(&root, config, |s| s.cmd_note(args)),
        Command::Link(args) => with_session(&root, config, |s| s.cmd_link(args)),
        Command::Connect(args) => with_session(&root, config, |s| s.cmd_connect(args)),
        Command::Show(args) => with_session(&root, config, |s| s.cmd_show(args, format)),
        Command::List(_) => with_session(&root, config, |s| s.cmd_list(format)),
        Command::Check(_) => with_session(&root, config, |s| s.cmd_check()),
    }
}

/// Open the world, run one action, and commit whatever it staged.
fn with_session(
    root: &Path,
    config: StoreConfig,
    action: impl FnOnce(&mut Session) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut session = Session::open(root, config)?;
    action(&mut session)?;
    session.finish()
}

/// One user action: an open world plus the objects it touched.
struct Session {
    world: World,
    dirty: DirtySet,
}

impl Session {
    fn open(root: &Path, config: StoreConfig) -> anyhow::Result<Self> {
        let world = World::open_with_config(root, config)
            .with_context(|| format!("opening store at {}", root.display()))?;
        Ok(Self {
            world,
            dirty: DirtySet::new(),
        })
    }

    fn finish(mut self) -> anyhow::Result<()> {
        if self.dirty.is_empty() {
            return Ok(());
        }
        self.world
            .flush(&mut self.dirty)
            .context("committing changes")?;
        Ok(())
    }

    fn cmd_new(&mut self, args: NewArgs) -> anyhow::Result<()> {
        let obj = self.world.create_object();
        obj.rename(args.name.join(" "));
        let id = obj.id();
        self.dirty.stage(id);
        println!("{} Created object {}", "✓".green().bold(), id.to_string().yellow());
        Ok(())
    }

    fn cmd_name(&mut self, args: TextArgs) -> anyhow::Result<()> {
        self.world.lookup_mut(args.id)?.rename(args.text.join(" "));
        self.dirty.stage(args.id);
        Ok(())
    }

    fn cmd_note(&mut self, args: TextArgs) -> anyhow::Result<()> {
        self.world.lookup_mut(args.id)?.annotate(args.text.join(" "));
        self.dirty.stage(args.id);
        Ok(())
    }

    fn cmd_link(&mut self, args: LinkArgs) -> anyhow::Result<()> {
        self.world.link(args.link, args.domain, args.codomain)?;
        self.dirty.stage(args.link);
        Ok(())
    }

    fn cmd_connect(&mut self, args: ConnectArgs) -> anyhow::Result<()> {
        let id = self.world.connect(args.from, args.to, args.name.as_deref())?;
        self.dirty.stage(id);
        println!(
            "{} Linked {} -> {} as {}",
            "✓".green().bold(),
            args.from,
            args.to,
            id.to_string().yellow()
        );
        Ok(())
    }

    fn cmd_show(&self, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
        let ids = if args.ids.is_empty() {
            vec![ObjectId::new(1)]
        } else {
            args.ids
        };
        match format {
            OutputFormat::Json => {
                let views = ids
                    .iter()
                    .map(|id| self.world.lookup(*id).map(ObjectView::from))
                    .collect::<Result<Vec<_>, _>>()?;
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
            OutputFormat::Text => {
                for id in ids {
                    if args.raw {
                        println!("{}", render_raw(&self.world, id)?);
                    } else {
                        print!("{}", render(&self.world, id)?);
                    }
                }
            }
        }
        Ok(())
    }

    fn cmd_list(&self, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Json => {
                let views: Vec<_> = self.world.iter().map(ObjectView::from).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
            OutputFormat::Text => {
                for obj in self.world.iter() {
                    match obj.morphism() {
                        Some(m) => println!(
                            "{} {}  {} -> {}",
                            obj.id().to_string().yellow(),
                            obj.name(),
                            m.domain.to_string().dimmed(),
                            m.codomain.to_string().dimmed()
                        ),
                        None => println!("{} {}", obj.id().to_string().yellow(), obj.name()),
                    }
                }
            }
        }
        Ok(())
    }

    fn cmd_check(&self) -> anyhow::Result<()> {
        if let Err(violation) = self.world.verify_all() {
            bail!("inconsistent store: {violation}");
        }
        println!(
            "{} {} objects consistent",
            "✓".green().bold(),
            self.world.len()
        );
        Ok(())
    }
}

fn cmd_init(root: &Path, config: StoreConfig, args: InitArgs) -> anyhow::Result<()> {
    let store = FsObjectStore::with_config(root, config.clone());
    fs::create_dir_all(store.objects_dir())
        .with_context(|| format!("creating {}", store.objects_dir().display()))?;

    let mut session = Session::open(root, config)?;
    if !session.world.is_empty() {
        println!(
            "Store at {} already holds {} objects",
            root.display().to_string().bold(),
            session.world.len()
        );
        return Ok(());
    }

    let obj = session.world.create_object();
    obj.rename(args.name);
    session.dirty.stage(obj.id());
    session.finish()?;
    println!(
        "{} Initialized quiver store in {}",
        "✓".green().bold(),
        root.display().to_string().bold()
    );
    Ok(())
}

/// Serializable view of an object for `--format json`.
#[derive(Debug, Serialize)]
struct ObjectView {
    id: ObjectId,
    name: String,
    notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    codomain: Option<ObjectId>,
    outgoing: Vec<ObjectId>,
    incoming: Vec<ObjectId>,
}

impl From<&Object> for ObjectView {
    fn from(obj: &Object) -> Self {
        Self {
            id: obj.id(),
            name: obj.name().to_string(),
            notes: obj.notes().to_string(),
            domain: obj.domain(),
            codomain: obj.codomain(),
            outgoing: obj.outgoing().to_vec(),
            incoming: obj.incoming().to_vec(),
        }
    }
}

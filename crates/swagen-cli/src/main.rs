use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swagen_client::{EmitterFragments, EmitterRegistry, builtin_template, template};
use swagen_core::config::{self, CONFIG_FILE_NAME, SwagenConfig};
use swagen_core::ir::CanonicalOperation;
use swagen_core::{FileLocator, TemplateStore, load_document, normalize};

#[derive(Parser)]
#[command(
    name = "swagen",
    about = "TypeScript client generator for Swagger 2.0 / OpenAPI 3.x documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate client code from an API document
    Generate {
        /// Path to the API document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Calling convention (fetch, axios, ky, superagent)
        #[arg(short, long)]
        convention: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Built-in template name or saved template id
        #[arg(long, conflicts_with = "template_file")]
        template: Option<String>,

        /// Read the template text from a file
        #[arg(long)]
        template_file: Option<PathBuf>,

        /// Only generate these operation ids
        #[arg(long, num_args = 1..)]
        only: Vec<String>,
    },

    /// Print the canonical operations of an API document
    Inspect {
        /// Path to the API document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// List the available calling conventions
    Conventions,

    /// Manage built-in and saved templates
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },

    /// Initialize a new swagen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List built-in and saved templates
    List,

    /// Print a template by built-in name or saved id
    Show { name: String },

    /// Save a template read from a file
    Add {
        name: String,

        /// File holding the template text
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Rename a saved template or replace its text
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// File holding the new template text
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Delete a saved template
    Remove { id: String },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            convention,
            output,
            template,
            template_file,
            only,
        } => cmd_generate(GenerateArgs {
            input,
            convention,
            output,
            template,
            template_file,
            only,
        }),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Conventions => cmd_conventions(),

        Commands::Templates { command } => cmd_templates(command),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagen", &mut std::io::stdout());
            Ok(())
        }
    }
}

struct GenerateArgs {
    input: Option<PathBuf>,
    convention: Option<String>,
    output: Option<PathBuf>,
    template: Option<String>,
    template_file: Option<PathBuf>,
    only: Vec<String>,
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwagenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_operations(path: &Path) -> Result<Vec<CanonicalOperation>> {
    let doc = load_document(&FileLocator::new(path))
        .with_context(|| format!("failed to load {}", path.display()))?;
    let ops = normalize(&doc).with_context(|| format!("failed to read {}", path.display()))?;
    log::info!("{}: {} operations", path.display(), ops.len());
    Ok(ops)
}

/// Keep the operations whose id is listed, in document order.
fn select_operations(ops: Vec<CanonicalOperation>, only: &[String]) -> Vec<CanonicalOperation> {
    if only.is_empty() {
        return ops;
    }
    for id in only {
        if !ops.iter().any(|op| &op.id == id) {
            log::warn!("no operation with id `{id}`");
        }
    }
    ops.into_iter().filter(|op| only.contains(&op.id)).collect()
}

/// Template text for a built-in name or a saved template id.
fn resolve_template(name: &str, store_path: &Path) -> Result<String> {
    if let Some(builtin) = builtin_template(name) {
        return Ok(builtin.to_string());
    }
    let store = TemplateStore::open(store_path)?;
    store
        .get(name)
        .map(|saved| saved.template.clone())
        .with_context(|| format!("no built-in or saved template named `{name}`"))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = output else {
        std::io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = args.input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let ops = select_operations(load_operations(&input)?, &args.only);

    let registry = EmitterRegistry::with_builtins();
    let convention = args.convention.unwrap_or(cfg.convention);

    let template = match (args.template_file, args.template.or(cfg.template)) {
        (Some(path), _) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, Some(name)) => Some(resolve_template(&name, &cfg.templates_file)?),
        (None, None) => None,
    };

    let source = match template {
        Some(text) => {
            let fragments = EmitterFragments::new(&registry, cfg.options);
            let rendered = template::render(&ops, &text, &fragments)?;
            format!("{}\n\n{rendered}\n", template::prelude(&ops, &cfg.options))
        }
        None => registry.get(&convention)?.emit_full_source(&ops, &cfg.options)?,
    };

    write_output(args.output.or(cfg.output).as_deref(), &source)
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let ops = load_operations(input)?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&ops)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&ops)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_conventions() -> Result<()> {
    let registry = EmitterRegistry::with_builtins();
    for emitter in registry.iter() {
        println!(
            "{:<12} query arrays as {}",
            emitter.name(),
            emitter.query_array_style().example()
        );
    }
    Ok(())
}

fn cmd_templates(command: TemplatesCommand) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let mut store = TemplateStore::open(&cfg.templates_file)?;

    match command {
        TemplatesCommand::List => {
            for (name, _) in template::BUILTIN_TEMPLATES {
                println!("{:<16} built-in", name);
            }
            for saved in store.list() {
                println!(
                    "{:<16} {} (updated {})",
                    saved.id,
                    saved.name,
                    saved.updated_at.to_rfc3339()
                );
            }
        }
        TemplatesCommand::Show { name } => {
            println!("{}", resolve_template(&name, store.path())?);
        }
        TemplatesCommand::Add { name, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let id = store.add(&name, &text).id.clone();
            store.save()?;
            eprintln!("Saved template `{name}` as {id}");
        }
        TemplatesCommand::Update { id, name, file } => {
            let text = file
                .map(|path| {
                    fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))
                })
                .transpose()?;
            store.update(&id, name.as_deref(), text.as_deref())?;
            store.save()?;
            eprintln!("Updated template {id}");
        }
        TemplatesCommand::Remove { id } => {
            let removed = store.remove(&id)?;
            store.save()?;
            eprintln!("Removed template `{}` ({id})", removed.name);
        }
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

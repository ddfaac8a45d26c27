//! filerouter command-line front-end
//!
//! Scans folders, routes files by rule and manages the saved rule list.

use anyhow::{Result, bail};
use clap::Parser;
use filerouter::router::{Decision, PendingChoice};
use filerouter::{
    Config, ConflictPolicy, Router, RuleEngine, TransferMode, find_matching_files,
    parse_keywords, suggest_rules,
};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "filerouter")]
#[command(author, version, about = "Route files into subfolders by keyword rules")]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List files in a folder that pass the keyword and extension filters
    Scan {
        /// Folder to scan
        source: PathBuf,

        /// Keywords for this scan only (overrides the saved keywords)
        #[arg(short, long)]
        keywords: Option<String>,

        /// Extensions, comma separated (saved to the config)
        #[arg(short, long)]
        exts: Option<String>,

        /// Scan subfolders (saved to the config)
        #[arg(long, overrides_with = "no_recursive")]
        recursive: bool,

        /// Only scan the top-level folder (saved to the config)
        #[arg(long)]
        no_recursive: bool,
    },

    /// Scan a folder and route every matching file
    Run {
        /// Folder to scan
        source: PathBuf,

        /// Base destination: unmatched files and relative rule targets go here
        base: PathBuf,

        /// Copy files, keeping the originals (saved to the config)
        #[arg(long, conflicts_with = "move_files")]
        copy: bool,

        /// Move files (saved to the config)
        #[arg(long = "move")]
        move_files: bool,

        /// What to do when several rules match one file
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,

        /// Show where files would go without touching them
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage routing rules
    #[command(subcommand)]
    Rules(RulesCommand),

    /// Manage saved scan keywords
    #[command(subcommand)]
    Keywords(KeywordsCommand),

    /// Suggest rule keywords from frequent words in file names
    Suggest {
        /// Folder to analyze
        folder: PathBuf,

        /// Number of suggestions
        #[arg(short, long, default_value_t = 20)]
        top: usize,

        /// Add a rule with this pattern (keywords joined by |)
        #[arg(long, requires = "target")]
        apply: Option<String>,

        /// Target folder for --apply
        #[arg(long)]
        target: Option<String>,
    },

    /// Validate config file
    Check,
}

#[derive(clap::Subcommand, Debug)]
enum RulesCommand {
    /// List rules in priority order
    List,
    /// Append a rule
    Add {
        /// Keywords joined by |
        pattern: String,
        /// Destination folder, absolute or relative to the base destination
        target: String,
    },
    /// Remove a rule by number
    Remove { index: usize },
    /// Move a rule one place up
    Up { index: usize },
    /// Move a rule one place down
    Down { index: usize },
}

#[derive(clap::Subcommand, Debug)]
enum KeywordsCommand {
    /// List saved keywords
    List,
    /// Add keywords (separated by spaces, commas, semicolons, slashes or pipes)
    Add { text: String },
    /// Remove all keywords
    Clear,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    /// Ask which rule to use
    Interactive,
    /// Use the first matching rule
    AutoFirst,
    /// Leave the file in place
    Skip,
}

impl From<PolicyArg> for ConflictPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Interactive => ConflictPolicy::Interactive,
            PolicyArg::AutoFirst => ConflictPolicy::AutoFirst,
            PolicyArg::Skip => ConflictPolicy::Skip,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("FILEROUTER_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scan {
            source,
            keywords,
            exts,
            recursive,
            no_recursive,
        } => {
            let mut config = Config::load_or_default(config_path);
            let mut changed = false;
            if let Some(exts) = exts {
                config.set_extensions(&exts);
                changed = true;
            }
            if recursive || no_recursive {
                config.recursive = recursive;
                changed = true;
            }
            if changed {
                save(&config, config_path);
            }

            let keywords = match keywords {
                Some(text) => parse_keywords(&text),
                None => config.keyword_list(),
            };
            let files = find_matching_files(&source, &keywords, &config.exts, config.recursive);
            for file in &files {
                println!("{}", file.display());
            }
            println!("Found {} files", files.len());
        }
        Commands::Run {
            source,
            base,
            copy,
            move_files,
            policy,
            dry_run,
        } => {
            let mut config = Config::load_or_default(config_path);
            if copy || move_files {
                config.copy_mode = copy;
                save(&config, config_path);
            }
            run(&config, &source, base, policy.map(Into::into), dry_run);
        }
        Commands::Rules(command) => rules_command(command, config_path)?,
        Commands::Keywords(command) => keywords_command(command, config_path),
        Commands::Suggest {
            folder,
            top,
            apply,
            target,
        } => {
            let suggestions = suggest_rules(&folder, top);
            if suggestions.is_empty() {
                println!("No words found in {}", folder.display());
            }
            for (word, count) in &suggestions {
                println!("  {} ({})", word, count);
            }

            if let (Some(pattern), Some(target)) = (apply, target) {
                let mut config = Config::load_or_default(config_path);
                let mut engine = RuleEngine::new(std::mem::take(&mut config.routes));
                let added = engine.add_rule(&pattern, &target);
                config.routes = engine.into_rules();
                if !added {
                    bail!("Pattern and target must not be empty");
                }
                save(&config, config_path);
                println!("✓ Added rule: {} -> {}", pattern.trim(), target.trim());
            }
        }
        Commands::Check => match Config::load(config_path) {
            Ok(config) => {
                println!("✓ Config is valid");
                println!("  {} keywords", config.keywords.len());
                println!("  {} extensions", config.exts.len());
                println!("  {} rules", config.routes.len());
            }
            Err(e) => {
                eprintln!("✗ Config error: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn run(
    config: &Config,
    source: &Path,
    base: PathBuf,
    policy: Option<ConflictPolicy>,
    dry_run: bool,
) {
    let keywords = config.keyword_list();
    let files = find_matching_files(source, &keywords, &config.exts, config.recursive);
    println!("Found {} files in {}", files.len(), source.display());

    let policy = policy.unwrap_or_else(|| {
        if config.auto_use_first_rule == Some(true) {
            ConflictPolicy::AutoFirst
        } else if std::io::stdin().is_terminal() {
            ConflictPolicy::Interactive
        } else {
            ConflictPolicy::headless(config.auto_use_first_rule)
        }
    });

    let router = Router::new(
        RuleEngine::new(config.routes.clone()),
        base,
        TransferMode::from_copy_flag(config.copy_mode),
        policy,
    );

    if dry_run {
        for (file, decision) in router.preview(&files) {
            match decision {
                Decision::Route { destination, .. } => {
                    println!("  [dry-run] {} -> {}", file.display(), destination.display())
                }
                Decision::Ambiguous(candidates) => {
                    let targets: Vec<&str> =
                        candidates.iter().map(|c| c.target.as_str()).collect();
                    println!(
                        "  [dry-run] {} -> ? ({})",
                        file.display(),
                        targets.join(" | ")
                    );
                }
                Decision::Skip(reason) => {
                    println!("  [dry-run] {} skipped: {}", file.display(), reason)
                }
            }
        }
        return;
    }

    let report = router.route_all(files, prompt_choice);

    for transferred in &report.succeeded {
        println!(
            "  ✓ {} -> {}",
            transferred.source.display(),
            transferred.destination.display()
        );
    }
    for skipped in &report.skipped {
        println!("  - {} skipped: {}", skipped.source.display(), skipped.reason);
    }
    for failed in &report.failed {
        eprintln!("  ✗ {}", failed.error);
    }
    println!("{}", report.summary());
}

/// Blocking stdin prompt for an ambiguous file
fn prompt_choice(pending: &PendingChoice) -> Option<String> {
    print!("{}", pending.prompt());
    std::io::stdout().flush().ok()?;

    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn rules_command(command: RulesCommand, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_or_default(config_path);
    let mut engine = RuleEngine::new(std::mem::take(&mut config.routes));

    let changed = match command {
        RulesCommand::List => {
            println!("Rules:");
            for (i, rule) in engine.rules().iter().enumerate() {
                println!("  [{}] {}", i + 1, rule);
            }
            false
        }
        RulesCommand::Add { pattern, target } => {
            if !engine.add_rule(&pattern, &target) {
                bail!("Pattern and target must not be empty");
            }
            true
        }
        RulesCommand::Remove { index } => {
            let removed = index.checked_sub(1).and_then(|i| engine.remove_rule(i));
            match removed {
                Some(rule) => println!("✓ Removed: {}", rule),
                None => bail!("No rule number {}", index),
            }
            true
        }
        RulesCommand::Up { index } => {
            if !index.checked_sub(1).is_some_and(|i| engine.move_up(i)) {
                bail!("Cannot move rule {} up", index);
            }
            true
        }
        RulesCommand::Down { index } => {
            if !index.checked_sub(1).is_some_and(|i| engine.move_down(i)) {
                bail!("Cannot move rule {} down", index);
            }
            true
        }
    };

    if changed {
        config.routes = engine.into_rules();
        save(&config, config_path);
        println!("Rules:");
        for (i, rule) in config.routes.iter().enumerate() {
            println!("  [{}] {}", i + 1, rule);
        }
    }
    Ok(())
}

fn keywords_command(command: KeywordsCommand, config_path: Option<&Path>) {
    let mut config = Config::load_or_default(config_path);

    match command {
        KeywordsCommand::List => {
            if config.keywords.is_empty() {
                println!("No keywords (every file name matches)");
            }
            for keyword in &config.keywords {
                println!("  {}", keyword);
            }
        }
        KeywordsCommand::Add { text } => {
            let added = config.add_keywords(&text);
            save(&config, config_path);
            println!("✓ Added {} keywords", added);
        }
        KeywordsCommand::Clear => {
            config.clear_keywords();
            save(&config, config_path);
            println!("✓ Keywords cleared");
        }
    }
}

/// Save failures are reported but never stop the command
fn save(config: &Config, path: Option<&Path>) {
    if let Err(e) = config.save(path) {
        eprintln!("✗ Failed to save config: {:#}", e);
    }
}

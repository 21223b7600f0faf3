//! tw-terms CLI: Mainland/Taiwan terminology conversion and glossary upkeep.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use tw_terms::config::TermsConfig;
use tw_terms::convert::Converter;
use tw_terms::dictionary::Dictionary;
use tw_terms::direction::Direction;
use tw_terms::glossary::Glossary;
use tw_terms::harvest::{HtmlFileSource, TermSource};
use tw_terms::maintain::{EditOutcome, GlossaryEditor};
use tw_terms::prompt::update_readme;
use tw_terms::term::TargetSet;
use tw_terms::update::run_update;

#[derive(Parser)]
#[command(
    name = "tw-terms",
    version,
    about = "Convert technical terms between Mainland China and Taiwan usage"
)]
struct Cli {
    /// Directory holding the glossary, snapshot, ledger and tw-terms.toml.
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Explicit config file (overrides <data-dir>/tw-terms.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vocabulary used for conversion (JSON or CSV). Defaults to the glossary.
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert text. Reads stdin when neither TEXT nor --file is given.
    Convert {
        /// Text to convert.
        text: Option<String>,

        /// Conversion direction: cn_to_tw or tw_to_cn.
        #[arg(short, long, default_value = "cn_to_tw")]
        direction: String,

        /// Read the text from a file.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Write the result to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up the exact translation of one term.
    Lookup {
        term: String,

        #[arg(short, long, default_value = "cn_to_tw")]
        direction: String,
    },

    /// List mappings whose key or value contains a keyword.
    Search {
        keyword: String,

        #[arg(short, long, default_value = "cn_to_tw")]
        direction: String,
    },

    /// Show vocabulary statistics.
    Stats,

    /// Harvest the upstream table and reconcile it into the glossary.
    Update {
        /// Parse a saved copy of the comparison page instead of downloading it.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Delete one target of a term, or the whole entry when TARGET is omitted.
    Delete {
        source: String,
        target: Option<String>,
    },

    /// Replace the targets of a term (`;`-separated). Empty removes the entry.
    Modify {
        source: String,
        targets: Option<String>,
    },

    /// Regenerate the term list in a README's conversion prompt.
    Prompt {
        /// README file containing the prompt markers.
        readme: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Update { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Convert {
            text,
            direction,
            file,
            output,
        } => {
            let direction: Direction = direction.parse()?;
            let input = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => std::fs::read_to_string(&file).into_diagnostic()?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
                    buf
                }
            };
            if input.trim().is_empty() {
                miette::bail!("no input text to convert");
            }

            let converter = open_converter(&config)?;
            let converted = converter.convert(&input, direction);
            match output {
                Some(path) => {
                    std::fs::write(&path, &converted).into_diagnostic()?;
                    println!("轉換結果已寫入：{}", path.display());
                }
                None => println!("{converted}"),
            }
        }

        Commands::Lookup { term, direction } => {
            let direction: Direction = direction.parse()?;
            let converter = open_converter(&config)?;
            match converter.lookup(&term, direction) {
                Some(found) => println!("{term} → {found}"),
                None => println!("找不到術語「{term}」（{}）", direction.label()),
            }
        }

        Commands::Search { keyword, direction } => {
            let direction: Direction = direction.parse()?;
            let converter = open_converter(&config)?;
            let results = converter.search(&keyword, direction);
            if results.is_empty() {
                println!("沒有找到包含「{keyword}」的術語");
            } else {
                println!("找到 {} 個結果（{}）：", results.len(), direction.label());
                for (key, value) in results {
                    println!("  {key} → {value}");
                }
            }
        }

        Commands::Stats => {
            let stats = open_converter(&config)?.statistics();
            println!("詞彙表統計：");
            println!("  檔案：{}", stats.vocabulary_file);
            println!("  版本：{}", stats.version);
            if !stats.description.is_empty() {
                println!("  說明：{}", stats.description);
            }
            println!("  簡體→繁體(台灣)：{} 條", stats.cn_to_tw_mappings);
            println!("  繁體(台灣)→簡體：{} 條", stats.tw_to_cn_mappings);
        }

        Commands::Update { html } => {
            let source: Box<dyn TermSource> = match html {
                Some(path) => Box::new(HtmlFileSource::new(path)),
                None => Box::new(config.wiki_source()),
            };
            let report = run_update(&config, source.as_ref())?;
            let stats = &report.stats;
            println!("術語表更新完成：{}", config.glossary.display());
            println!("  抓取：{} 條", stats.harvested);
            println!("  新增：{} 條", stats.added);
            println!("  更新：{} 條", stats.updated);
            println!("  保留：{} 條", stats.preserved);
            println!("  略過（已刪除）：{} 條", stats.skipped_deleted);
            println!("  目前共 {} 條術語", report.total_terms);
            if let Some(backup) = &report.backup {
                println!("  備份：{}", backup.display());
            }
        }

        Commands::Delete { source, target } => {
            let mut editor = GlossaryEditor::open(&config.glossary, &config.ledger)?;
            let outcome = match &target {
                Some(target) => editor.remove_target(&source, target)?,
                None => editor.remove_entry(&source)?,
            };
            print_outcome(&source, &outcome);
        }

        Commands::Modify { source, targets } => {
            let mut editor = GlossaryEditor::open(&config.glossary, &config.ledger)?;
            let targets = TargetSet::parse(targets.as_deref().unwrap_or_default());
            let outcome = editor.replace_targets(&source, targets)?;
            print_outcome(&source, &outcome);
            if let Some(current) = editor.glossary().get(&source) {
                println!("  目前：{source} → {current}");
            }
        }

        Commands::Prompt { readme } => {
            let glossary = Glossary::open(&config.glossary)?;
            update_readme(&readme, &glossary)?;
            println!(
                "已更新 {} 的術語對照表（{} 條）",
                readme.display(),
                glossary.len()
            );
        }
    }

    Ok(())
}

/// Resolve the effective configuration from the global flags.
fn load_config(cli: &Cli) -> Result<TermsConfig> {
    let mut config = match &cli.config {
        Some(path) => TermsConfig::load(path)?.resolve(&cli.data_dir),
        None => TermsConfig::discover(&cli.data_dir)?,
    };
    if let Some(vocabulary) = &cli.vocabulary {
        config.vocabulary = Some(vocabulary.clone());
    }
    Ok(config)
}

fn open_converter(config: &TermsConfig) -> Result<Converter> {
    let path: &Path = config.vocabulary_path();
    Ok(Converter::new(Dictionary::load(path)?))
}

fn print_outcome(source: &str, outcome: &EditOutcome) {
    if outcome.is_noop() {
        println!("沒有變更：「{source}」");
    } else if outcome.entry_removed {
        println!("已刪除條目「{source}」");
    } else if outcome.glossary_written {
        println!("已更新條目「{source}」");
    }
    for target in &outcome.recorded {
        println!("  記錄刪除：{source},{target}");
    }
    for target in &outcome.already_recorded {
        println!("  已在刪除記錄中：{source},{target}");
    }
}

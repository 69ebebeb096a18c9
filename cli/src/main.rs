//! pagefix CLI - page-delimited report text pipeline

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagefix::pipeline::{process_batch_with, BatchItem};
use pagefix::{
    Directives, ErrorMode, FieldExtractor, FieldOptions, FixedTextInserter, LineFilter,
    OpenAiTranslator, PageStream, ParseOptions, Pipeline, PipelineConfig, PipelineOptions,
    PipelineResult, RemovalRules, SourceKind,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pagefix")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Filter, annotate and translate page-delimited report text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract pages as an unfiltered page-delimited stream
    Extract {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep pages whose text cannot be extracted as empty pages
        #[arg(long)]
        lenient: bool,
    },

    /// Apply line removal rules
    Filter {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Removal rules JSON file
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Recover category, name, date and scores as JSON
    Fields {
        /// Page-delimited text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Position of the name among non-empty lines
        #[arg(long, default_value = "2")]
        name_line: usize,

        /// Page number holding the score row
        #[arg(long, default_value = "3")]
        scores_page: usize,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Apply insertion and deletion directives
    Insert {
        /// Page-delimited text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directives JSON file
        #[arg(short, long, value_name = "FILE")]
        directives: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the whole pipeline on one file
    Run {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pipeline configuration JSON file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Translate into this language before extracting fields
        #[arg(long, value_name = "LANGUAGE")]
        translate: Option<String>,

        /// Translation model
        #[arg(long, env = "PAGEFIX_MODEL", default_value = pagefix::translate::DEFAULT_MODEL)]
        model: String,

        /// Fail when translation changes the page count
        #[arg(long)]
        strict_pages: bool,
    },

    /// Run the pipeline (without translation) on many files in parallel
    Batch {
        /// Input files or directories
        #[arg(value_name = "PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Pipeline configuration JSON file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "pagefix_output")]
        output: PathBuf,
    },

    /// Show source information
    Info {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            lenient,
        } => cmd_extract(&input, output.as_deref(), lenient),
        Commands::Filter {
            input,
            rules,
            output,
        } => cmd_filter(&input, &rules, output.as_deref()),
        Commands::Fields {
            input,
            name_line,
            scores_page,
            compact,
        } => cmd_fields(&input, name_line, scores_page, compact),
        Commands::Insert {
            input,
            directives,
            output,
        } => cmd_insert(&input, &directives, output.as_deref()),
        Commands::Run {
            input,
            config,
            output,
            translate,
            model,
            strict_pages,
        } => cmd_run(
            &input,
            config.as_deref(),
            output.as_deref(),
            translate.as_deref(),
            &model,
            strict_pages,
        ),
        Commands::Batch {
            inputs,
            config,
            output,
        } => cmd_batch(&inputs, config.as_deref(), &output),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> pagefix::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn read_stream(input: &Path) -> pagefix::Result<PageStream> {
    Ok(PageStream::from_text(pagefix::encoding::read_text_file(input)?))
}

fn cmd_extract(input: &Path, output: Option<&Path>, lenient: bool) -> CliResult {
    let mode = if lenient {
        ErrorMode::Lenient
    } else {
        ErrorMode::Strict
    };
    let options = PipelineOptions::new().with_parse_options(ParseOptions::new().with_error_mode(mode));
    let doc = Pipeline::with_options(PipelineConfig::default(), options).load_document(input)?;
    write_or_print(output, doc.raw_stream().as_str())
}

fn cmd_filter(input: &Path, rules: &Path, output: Option<&Path>) -> CliResult {
    let rules = RemovalRules::from_file(rules)?;
    let doc = Pipeline::default().load_document(input)?;
    let (stream, stats) = LineFilter::new().filter_with_stats(&doc, &rules);

    write_or_print(output, stream.as_str())?;
    eprintln!(
        "{} {} pages, {} lines removed, {} pages skipped",
        "Filtered".green(),
        stats.page_count,
        stats.lines_removed,
        stats.pages_skipped
    );
    if !stats.ignored_rule_pages.is_empty() {
        eprintln!(
            "{} rules for missing page indices {:?}",
            "Ignored".yellow(),
            stats.ignored_rule_pages
        );
    }
    Ok(())
}

fn cmd_fields(input: &Path, name_line: usize, scores_page: usize, compact: bool) -> CliResult {
    let stream = read_stream(input)?;
    let options = FieldOptions::new()
        .with_name_line(name_line)
        .with_scores_page(scores_page);
    let fields = FieldExtractor::with_options(options).extract(&stream);

    let json = if compact {
        serde_json::to_string(&fields)?
    } else {
        serde_json::to_string_pretty(&fields)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_insert(input: &Path, directives: &Path, output: Option<&Path>) -> CliResult {
    let stream = read_stream(input)?;
    let fields = FieldExtractor::new().extract(&stream);
    let directives = Directives::from_file(directives)?.render(&fields);
    let (result, stats) = FixedTextInserter::new().apply_with_stats(&stream, &directives);

    write_or_print(output, result.as_str())?;
    eprintln!(
        "{} {} lines inserted, {} deleted",
        "Applied".green(),
        stats.lines_inserted,
        stats.lines_deleted
    );
    for (page, line) in &stats.unmatched {
        eprintln!(
            "{} directive for page index {} line {} matched nothing",
            "Warning:".yellow(),
            page,
            line
        );
    }
    Ok(())
}

fn cmd_run(
    input: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    translate: Option<&str>,
    model: &str,
    strict_pages: bool,
) -> CliResult {
    let config = load_config(config)?;
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let options = PipelineOptions::new()
        .with_intermediate(true)
        .with_strict_pages(strict_pages);
    let pipeline = Pipeline::with_options(config, options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Extracting pages...");
    let document = pipeline.load_document(input)?;

    let result = match translate {
        Some(language) => {
            pb.set_message(format!("Translating into {}...", language));
            let translator = OpenAiTranslator::from_env(language)?.with_model(model);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(pipeline.run_document_translated(&document, &translator))?
        }
        None => {
            pb.set_message("Processing...");
            pipeline.run_document(&document)
        }
    };
    pb.finish_and_clear();

    let stem = input.file_stem().unwrap_or_default().to_string_lossy().to_string();
    let written = write_run_outputs(&output_dir, &stem, &result)?;

    print_summary(&result);
    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }
    Ok(())
}

fn write_run_outputs(dir: &Path, stem: &str, result: &PipelineResult) -> std::io::Result<Vec<String>> {
    let mut written = Vec::new();
    let mut write = |suffix: &str, content: &str| -> std::io::Result<()> {
        let name = format!("{}{}", stem, suffix);
        fs::write(dir.join(&name), content)?;
        written.push(name);
        Ok(())
    };

    if let Some(raw) = &result.raw {
        write("_raw.txt", raw.as_str())?;
    }
    if let Some(filtered) = &result.filtered {
        write("_cleaned.txt", filtered.as_str())?;
    }
    if let Some(translated) = &result.translated {
        write("_translated.txt", translated.as_str())?;
    }
    write("_final.txt", result.output.as_str())?;
    let fields = serde_json::to_string_pretty(&result.fields).map_err(std::io::Error::other)?;
    write("_fields.json", &fields)?;

    Ok(written)
}

fn print_summary(result: &PipelineResult) {
    let fields = &result.fields;
    let none = || "-".dimmed().to_string();

    println!("{}", "Fields".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}",
        "Category".bold(),
        fields.category.map(|c| c.to_string()).unwrap_or_else(none)
    );
    println!("{}: {}", "Name".bold(), fields.name.clone().unwrap_or_else(none));
    println!("{}: {}", "Date".bold(), fields.date.clone().unwrap_or_else(none));
    let scores = fields.scores.summary();
    println!(
        "{}: {}",
        "Scores".bold(),
        if scores.is_empty() { none() } else { scores }
    );

    let stats = &result.stats;
    println!();
    println!(
        "{} pages, {} lines removed, {} inserted, {} deleted in {} ms",
        stats.page_count,
        stats.filter.lines_removed,
        stats.insert.lines_inserted,
        stats.insert.lines_deleted,
        stats.elapsed_ms
    );
}

fn collect_inputs(inputs: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "pdf" | "txt"))
                })
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn cmd_batch(inputs: &[PathBuf], config: Option<&Path>, output: &Path) -> CliResult {
    let config = load_config(config)?;
    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        println!("{}", "No PDF or text files found".yellow());
        return Ok(());
    }
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let pipeline = Pipeline::with_options(config, PipelineOptions::new().with_intermediate(true));
    let items = process_batch_with(&pipeline, &files, |item: &BatchItem| {
        pb.set_message(item.path.file_name().unwrap_or_default().to_string_lossy().to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let mut failed = 0;
    for item in &items {
        match &item.result {
            Ok(result) => {
                let stem = item.path.file_stem().unwrap_or_default().to_string_lossy().to_string();
                write_run_outputs(output, &stem, result)?;
                println!("{} {}", "✓".green(), item.path.display());
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "✗".red(), item.path.display(), e);
            }
        }
    }

    println!(
        "\n{} {} processed, {} failed",
        "Done!".green().bold(),
        items.len() - failed,
        failed
    );
    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, items.len()).into());
    }
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let kind = pagefix::detect_source_kind_from_path(input)?;
    let options = PipelineOptions::new().with_parse_options(ParseOptions::new().lenient());
    let doc = Pipeline::with_options(PipelineConfig::default(), options).load_document(input)?;

    println!("{}", "Source Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    let format = match &kind {
        SourceKind::Pdf(format) => format.to_string(),
        SourceKind::PageStream => "Page-delimited text".to_string(),
        SourceKind::Unknown => "Plain text".to_string(),
    };
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Lines".bold(), doc.line_count());

    let empty: Vec<usize> = doc
        .pages()
        .iter()
        .filter(|page| page.is_empty())
        .map(|page| page.number())
        .collect();
    if !empty.is_empty() {
        println!("{}: {:?}", "Empty pages".bold(), empty);
    }

    let fields = FieldExtractor::new().extract(&doc.raw_stream());
    if let Some(category) = fields.category {
        println!("{}: {}", "Category".bold(), category);
    }

    println!();
    println!("{}", "Lines per page".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in doc.pages() {
        println!("  {:>4}  {}", page.number(), page.line_count());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagefix".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page-delimited report text pipeline");
    println!();
    println!("License: MIT");
}

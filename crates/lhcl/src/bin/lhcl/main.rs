mod cli;

use indexmap::IndexMap;
use lhcl::templates::{Source, Templates};
use lhcl::visit::VisitNodes;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("LHCL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Format(format_cli) => format(format_cli),
        cli::Command::Check(check_cli) => check(check_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn format(cli: cli::FormatCommand) -> anyhow::Result<()> {
    let templates = load(&cli.input)?;
    let indent = if cli.compact { lhcl::COMPACT } else { 0 };
    let with_headers = templates.source_count() > 1 && !cli.compact;

    for (source, document) in templates.documents() {
        if with_headers {
            println!("# {}", source_name(source));
        }
        println!("{}", document.render(false, indent));
    }

    Ok(())
}

pub fn check(cli: cli::CheckCommand) -> anyhow::Result<()> {
    let templates = load(&cli.input)?;
    let mut failures = 0;

    for (source, document) in templates.documents() {
        let name = source_name(source);
        let printed = document.to_string();

        match lhcl::parse(&printed) {
            Ok(reparsed) if reparsed.to_string() == printed => {
                tracing::trace!(source=%name, length = printed.len(), "printed form is stable");
            }
            Ok(reparsed) => {
                tracing::trace!(source=%name, first=%printed, second=%reparsed, "printed form changed");
                eprintln!("{name}: printed form is not stable");
                failures += 1;
            }
            Err(error) => {
                eprintln!("{name}: printed form does not parse: {error}");
                failures += 1;
            }
        }
    }

    anyhow::ensure!(failures == 0, "{failures} template(s) failed the check");
    println!("{} template(s) ok", templates.source_count());
    Ok(())
}

fn source_name(source: &Source) -> String {
    source
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<Templates> {
    if !input.workdir && input.files.is_empty() && input.directories.is_empty() {
        let stdin = lhcl::normalize_line_endings(&std::io::read_to_string(std::io::stdin())?);
        let document = lhcl::parse(&stdin)?;
        return Ok(document.into());
    }

    let mut templates = Templates::default();

    if input.workdir {
        templates.load_directory(&std::env::current_dir()?)?;
    }

    for file_path in &input.files {
        templates.load_file(file_path)?;
    }

    for dir_path in &input.directories {
        templates.load_directory(dir_path)?;
    }

    anyhow::ensure!(templates.source_count() > 0, "No files loaded");

    Ok(templates)
}

fn output(output: &cli::OutputArgs, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (lhcl-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Tree(args) => {
            let templates = load(&args.input)?;
            let trees: IndexMap<_, _> = templates
                .documents()
                .map(|(source, document)| (source_name(source), document))
                .collect();
            output(&args.output, &trees)
        }
        Stats(args) => {
            let templates = load(&args.input)?;
            let mut counts = IndexMap::<String, usize>::new();
            for (_, document) in templates.documents() {
                document.visit_nodes(&mut |node: &lhcl::Node, _depth: usize| {
                    *counts.entry(node.kind().to_string()).or_default() += 1;
                });
            }
            output(&args.output, &counts)
        }
    }
}

use std::{fs::File, io, path::PathBuf};

use anyhow::{bail, Result};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use util::{repl, ResultExt as _};

use multiway::{
    export::{write_instances, Consumer, GraphDocument, JsonSink, Summary, View},
    parser::parse_term,
    prelude::{ParseError, Span},
    rewrite::{children, step, Sharing, Step},
    Config, RootEdge, Term,
};

fn build_report(e: ParseError) -> Report<Span> {
    use chumsky::error::SimpleReason;
    let found = e.found().map(String::as_str).unwrap_or("end of the input");
    let report = Report::build(ReportKind::Error, (), e.span().start);
    match e.reason() {
        SimpleReason::Unexpected => {
            let expected = e
                .expected()
                .map(|t| t.as_ref().map(String::as_str).unwrap_or("end of the input"))
                .collect::<Vec<_>>()
                .join(", ");
            let expected = if expected.is_empty() {
                "something else"
            } else {
                &expected
            };
            report
                .with_message(format!("Unexpected {found}, expected {expected}"))
                .with_label(
                    Label::new(e.span())
                        .with_message(format!("Unexpected {}", found.fg(Color::Red)))
                        .with_color(Color::Red),
                )
        }
        SimpleReason::Unclosed { span, delimiter } => report
            .with_message(format!("Unclosed delimiter {}", delimiter.fg(Color::Yellow)))
            .with_label(
                Label::new(span.clone())
                    .with_message(format!("Opened here {}", delimiter.fg(Color::Yellow)))
                    .with_color(Color::Yellow),
            )
            .with_label(
                Label::new(e.span())
                    .with_message(format!("Must be closed before {}", found.fg(Color::Red)))
                    .with_color(Color::Red),
            ),
        SimpleReason::Custom(msg) => report.with_message(msg).with_label(
            Label::new(e.span())
                .with_message(format!("{}", msg.fg(Color::Red)))
                .with_color(Color::Red),
        ),
    }
    .finish()
}

/// Parses a term, printing a report for every error.
fn parse_or_report(input: &str) -> Result<Term> {
    match parse_term(input) {
        Ok(term) => Ok(term),
        Err(es) => {
            for e in es {
                build_report(e).eprint(Source::from(input))?;
            }
            bail!("Failed to parse `{}`", input.trim())
        }
    }
}

#[derive(Parser)]
#[command(name = "multiway")]
#[command(about = "Explore the multiway graph of the rewrite (L*R) -> ((R*L)*R)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the multiway graph and print a summary
    Run {
        #[command(flatten)]
        explore: ExploreArgs,
        /// Number of states to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// List every registered term instance, generation by generation,
        /// instead of the summary
        #[arg(long)]
        instances: bool,
    },
    /// Write the multiway graph as JSON for external analysis
    Export {
        #[command(flatten)]
        explore: ExploreArgs,
        /// Request the eigendecomposition view instead of PCA
        #[arg(long)]
        eigen: bool,
        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the one-step rewrites of a term
    Children {
        /// Term in canonical syntax, e.g. "((b*a)*b)"
        term: String,
    },
    /// Start an interactive session
    Repl,
}

#[derive(Args)]
struct ExploreArgs {
    /// Root term in canonical syntax
    #[arg(long, default_value = "(a*b)")]
    root: String,
    /// Number of generations to register
    #[arg(short, long, default_value_t = multiway::config::DEFAULT_ROUNDS)]
    rounds: usize,
    /// Record the root's registration as a self-loop
    #[arg(long)]
    root_self_loop: bool,
    /// Give each occurrence of the right operand its own copy when rewriting
    #[arg(long)]
    copy_operands: bool,
}

impl ExploreArgs {
    fn config(&self) -> Result<Config> {
        Ok(Config {
            root: parse_or_report(&self.root)?,
            rounds: self.rounds,
            root_edge: if self.root_self_loop {
                RootEdge::SelfLoop
            } else {
                RootEdge::Omit
            },
            sharing: if self.copy_operands {
                Sharing::Copied
            } else {
                Sharing::Shared
            },
        })
    }
}

#[derive(Default)]
struct Session {
    /// Term driven by `:step`; keeps its firing state between commands.
    current: Option<Term>,
}

impl Session {
    fn children(input: &str) -> Result<()> {
        let term = parse_or_report(input)?;
        for child in children(&term, Sharing::default()) {
            println!("{child}");
        }
        Ok(())
    }

    fn canonical(input: &str) -> Result<()> {
        let term = parse_or_report(input)?;
        println!("{term}");
        Ok(())
    }

    fn step(&mut self, input: &str) -> Result<()> {
        if !input.trim().is_empty() {
            self.current = Some(parse_or_report(input)?);
        }
        let Some(term) = self.current.as_ref() else {
            bail!("No term loaded; use :step term");
        };
        let Step { exhausted, result } = step(term, Sharing::default());
        if exhausted {
            println!("exhausted");
        } else {
            println!("{result}");
        }
        Ok(())
    }

    fn run(input: &str) -> Result<()> {
        let (rounds, root) = input.trim().split_once(' ').unwrap_or((input.trim(), "(a*b)"));
        let config = Config {
            root: parse_or_report(root)?,
            rounds: rounds.parse::<usize>().staticalize()?,
            ..Config::default()
        };
        let document = GraphDocument::new(&config.explore()?, View::default());
        Summary {
            out: io::stdout().lock(),
            limit: 20,
        }
        .consume(&document)?;
        Ok(())
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :children term
:children   term    -- show every one-step rewrite of the term
:canonical  term    -- show the canonical form of the term
:step       [term]  -- apply one step to the loaded term (loading term first if given)
:run        N [term]-- register N generations from term (default (a*b))
:help               -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input(&mut self, input: &str) -> Result<()> {
        let (cmd, input) = if let Some(stripped) = input.strip_prefix(':') {
            stripped
                .trim_start()
                .split_once(' ')
                .unwrap_or((stripped, ""))
        } else {
            ("", input)
        };
        match cmd {
            "" | "c" | "children" => Self::children(input),
            "p" | "canonical" => Self::canonical(input),
            "s" | "step" => self.step(input),
            "r" | "run" => Self::run(input),
            "h" | "help" => {
                Self::show_help();
                Ok(())
            }
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
                Ok(())
            }
        }
    }
}

impl repl::Repl for Session {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/multiway.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Ok(());
        }
        if let Err(e) = self.handle_repl_input(&input) {
            eprintln!("{e}");
        }
        Ok(())
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        None => {
            let document = GraphDocument::new(&Config::default().explore()?, View::default());
            Summary {
                out: io::stdout().lock(),
                limit: 20,
            }
            .consume(&document)?;
        }
        Some(Commands::Run {
            explore,
            instances: true,
            ..
        }) => {
            let config = explore.config()?;
            let mut builder = config.builder()?;
            write_instances(&mut builder, config.rounds, io::stdout().lock())?;
        }
        Some(Commands::Run { explore, limit, .. }) => {
            let document = GraphDocument::new(&explore.config()?.explore()?, View::default());
            Summary {
                out: io::stdout().lock(),
                limit,
            }
            .consume(&document)?;
        }
        Some(Commands::Export {
            explore,
            eigen,
            output,
        }) => {
            let view = if eigen { View::Eigen } else { View::Pca };
            let document = GraphDocument::new(&explore.config()?.explore()?, view);
            match output {
                Some(path) => JsonSink(io::BufWriter::new(File::create(path)?)).consume(&document)?,
                None => JsonSink(io::stdout().lock()).consume(&document)?,
            }
        }
        Some(Commands::Children { term }) => Session::children(&term)?,
        Some(Commands::Repl) => {
            println!("Hi, this is a multiway rewriting REPL. :h to show help");
            println!();
            repl::start_repl(Session::default())?;
        }
    }
    Ok(())
}

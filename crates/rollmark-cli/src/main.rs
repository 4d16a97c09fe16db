use anyhow::{Context, Result, bail};
use rollmark_config::Config;
use rollmark_engine::{
    Entity, ExportEntity, Interpreter, Message, RandSource, export, to_bbcode, to_markdown,
};
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fs, io, process};

const USAGE: &str =
    "<message.json|-> [--format json|markdown|bbcode|debug] [--seed N] [--config PATH]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Format {
    #[default]
    Json,
    Markdown,
    BbCode,
    Debug,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "bbcode" => Ok(Self::BbCode),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    /// Message file, or `-` for stdin.
    input: String,
    format: Format,
    seed: Option<u64>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut input = None;
    let mut format = Format::default();
    let mut seed = None;
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--format" | "--seed" | "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} needs a value"))?;
                match arg.as_str() {
                    "--format" => format = value.parse()?,
                    "--seed" => {
                        seed = Some(
                            value
                                .parse()
                                .map_err(|_| format!("invalid seed '{value}'"))?,
                        )
                    }
                    _ => config = Some(PathBuf::from(value)),
                }
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            path if input.is_none() => input = Some(path.to_string()),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }

    let input = input.ok_or_else(|| "missing message file".to_string())?;
    Ok(Options {
        input,
        format,
        seed,
        config,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
            match Config::load_from_path(&path)? {
                Some(config) => Ok(config),
                None => bail!("config file '{}' not found", path.display()),
            }
        }
        None => Ok(Config::load()?.unwrap_or_default()),
    }
}

fn read_message(input: &str) -> Result<Message> {
    let json = if input == "-" {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("Failed to read message from stdin")?;
        json
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read '{input}'"))?
    };
    serde_json::from_str(&json).with_context(|| format!("Failed to parse message '{input}'"))
}

fn interpret(interpreter: &Interpreter, message: &Message, seed: Option<u64>) -> Vec<Entity> {
    match seed {
        Some(seed) => interpreter.interpret(
            &message.text,
            &message.entities,
            &mut RandSource::seeded(seed),
        ),
        None => interpreter.interpret_message(message),
    }
}

fn render(format: Format, exported: &[ExportEntity]) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(exported)?,
        Format::Markdown => to_markdown(exported),
        Format::BbCode => to_bbcode(exported),
        Format::Debug => exported
            .iter()
            .map(|e| {
                let detail = e.expr_text.as_deref().or(e.href.as_deref()).unwrap_or("");
                format!(
                    "{:?} {}+{} {:?} {detail}",
                    e.kind, e.span.start, e.span.len, e.text
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn run(options: &Options) -> Result<String> {
    let config = load_config(options.config.as_ref())?;
    let interpreter = config.interpreter();
    let message = read_message(&options.input)?;
    log::info!(
        "Interpreting {} records over {} bytes of text",
        message.entities.len(),
        message.text.len()
    );

    let entities = interpret(&interpreter, &message, options.seed);
    let exported = export(&interpreter.source(&message.text), &entities);
    render(options.format, &exported)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let program_name = args
        .first()
        .cloned()
        .unwrap_or_else(|| "rollmark-cli".to_string());

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program_name} {USAGE}");
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

mod error;

use clap::Parser as ClapParser;
use deriv_compute::{error::UndefinedVariable, evaluate, nth_derivative};
use deriv_parser::{Latex, Limits, LimitsBuilder, Parser};
use error::Error;
use log::{info, LevelFilter};
use rustyline::{error::ReadlineError, DefaultEditor};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::{io::{self, BufRead, IsTerminal}, process::ExitCode};

/// Symbolic differentiation of arithmetic expressions.
///
/// Prints the simplified derivative of each expression. If any variables are bound with `--at`,
/// the derivative is also evaluated at that point.
#[derive(ClapParser, Debug)]
#[command(name = "deriv", version)]
struct Cli {
    /// Expression to differentiate. Without it, expressions are read from stdin, one per line.
    expr: Option<String>,

    /// Variable to differentiate with respect to.
    #[arg(long, default_value = "x")]
    var: String,

    /// Binds a variable to a value, e.g. `--at x=2`. May be repeated.
    #[arg(long = "at", value_name = "NAME=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, f64)>,

    /// Order of the derivative. The result is simplified after every order.
    #[arg(long, default_value_t = 1)]
    order: usize,

    /// Print the derivative as LaTeX instead of infix notation.
    #[arg(long)]
    latex: bool,

    /// Log verbosity level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Maximum nesting depth of an expression.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of nodes in a single expression tree.
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Maximum number of simplification passes.
    #[arg(long)]
    max_passes: Option<usize>,
}

impl Cli {
    /// Builds the limits from the defaults, overridden by the given flags.
    fn limits(&self) -> Limits {
        let mut builder = LimitsBuilder::new();
        if let Some(max_depth) = self.max_depth {
            builder = builder.max_depth(max_depth);
        }
        if let Some(max_nodes) = self.max_nodes {
            builder = builder.max_nodes(max_nodes);
        }
        if let Some(max_passes) = self.max_passes {
            builder = builder.max_simplify_passes(max_passes);
        }
        builder.build()
    }
}

/// Parses a `name=value` binding.
fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s.split_once('=')
        .ok_or_else(|| format!("expected `name=value`, found `{}`", s))?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("`{}` is not a valid variable name", name));
    }
    let value = value.trim().parse::<f64>()
        .map_err(|err| format!("invalid value for `{}`: {}", name, err))?;
    Ok((name.to_string(), value))
}

/// Settings shared by every expression differentiated in one run.
#[derive(Debug, Clone)]
struct Session {
    var: String,
    bindings: Vec<(String, f64)>,
    order: usize,
    latex: bool,
    limits: Limits,
}

impl Session {
    /// Binds the variable, replacing any earlier binding of the same name.
    fn bind(&mut self, name: String, value: f64) {
        match self.bindings.iter_mut().find(|(bound, _)| *bound == name) {
            Some(binding) => binding.1 = value,
            None => self.bindings.push((name, value)),
        }
    }
}

/// The printed derivative, and its value if the bindings cover every variable in it.
#[derive(Debug, Clone, PartialEq)]
struct Output {
    derivative: String,
    value: Option<f64>,
}

/// Parses the input, differentiates it and evaluates the result at the session's bindings.
fn differentiate(input: &str, session: &Session) -> Result<Output, Error> {
    let (tree, mut symbols) = Parser::new(input)
        .with_limits(session.limits)
        .parse_full()
        .map_err(Error::ParseError)?;
    let var = symbols.intern(&session.var);

    let deriv = nth_derivative(&tree, var, session.order, &session.limits)
        .map_err(Error::DeriveError)?;
    info!("derivative of order {} has {} node(s)", session.order, deriv.len());

    let view = deriv.view(&symbols);
    let derivative = if session.latex {
        view.as_display().to_string()
    } else {
        view.to_string()
    };

    if session.bindings.is_empty() {
        return Ok(Output { derivative, value: None });
    }

    for (name, value) in &session.bindings {
        symbols.bind(name, *value);
    }
    let value = match evaluate(&deriv, &symbols) {
        Ok(value) => Some(value),
        Err(err) if err.is::<UndefinedVariable>() => {
            info!("not evaluating the derivative: {}", err);
            None
        },
        Err(err) => return Err(Error::EvalError(err)),
    };
    Ok(Output { derivative, value })
}

/// Differentiates one line of input, printing the result or the error. A line of the form
/// `name = value` binds a variable for the following lines instead.
///
/// Returns true on success.
fn read_eval(input: &str, session: &mut Session) -> bool {
    let input = input.trim();
    if input.contains('=') {
        return match parse_binding(input) {
            Ok((name, value)) => {
                session.bind(name, value);
                true
            },
            Err(err) => {
                eprintln!("error: {}", err);
                false
            },
        };
    }

    match differentiate(input, session) {
        Ok(output) => {
            println!("{}", output.derivative);
            if let Some(value) = output.value {
                println!("= {}", value);
            }
            true
        },
        Err(err) => {
            err.report_to_stderr(input);
            false
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if CombinedLogger::init(vec![TermLogger::new(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]).is_err() {
        eprintln!("warning: could not initialize the logger");
    }

    let mut session = Session {
        var: cli.var.clone(),
        bindings: Vec::new(),
        order: cli.order,
        latex: cli.latex,
        limits: cli.limits(),
    };
    for (name, value) in cli.bindings {
        session.bind(name, value);
    }

    if let Some(expr) = cli.expr {
        // differentiate the argument
        return if read_eval(&expr, &mut session) { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    if !io::stdin().is_terminal() {
        // read expressions from stdin
        let mut ok = true;
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => (),
                Ok(line) => ok &= read_eval(&line, &mut session),
                Err(err) => {
                    eprintln!("error: {}", err);
                    return ExitCode::FAILURE;
                },
            }
        }
        return if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    // run the repl / interactive mode
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        },
    };

    fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
        let input = rl.readline("d/dx> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        read_eval(&input, session);
        Ok(())
    }

    loop {
        if let Err(err) = process_line(&mut rl, &mut session) {
            match err {
                ReadlineError::Eof | ReadlineError::Interrupted => (),
                _ => eprintln!("{}", err),
            }
            break;
        }
    }
    ExitCode::SUCCESS
}

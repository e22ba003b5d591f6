use std::io::BufRead;

use clap::Parser;
use miette::LabeledSpan;
use safe_calc::{
    lexer,
    parser::{EvalOptions, Strictness, DEFAULT_MAX_DEPTH},
    tool::{self, CalculatorTool, DEFAULT_MAX_EXPRESSION_LEN},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Input {
    /// The expression to evaluate. Reads one expression per line from stdin when omitted.
    expression: Option<String>,

    /// Reject unknown characters, missing closing parentheses and trailing input.
    #[clap(long, default_value = "false")]
    strict: bool,

    /// Maximum nesting depth of the expression.
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum length of the expression in bytes.
    #[clap(long, default_value_t = DEFAULT_MAX_EXPRESSION_LEN)]
    max_len: usize,

    /// Print `{"value": ...}` or `{"invalid": true}` instead of the tool's text reply.
    #[clap(long, default_value = "false")]
    json: bool,

    /// Debug the lexer, printing out each token. Does not evaluate the expression.
    #[clap(long, default_value = "false")]
    debug_lexer: bool,

    /// Print the tool definition to register with a chat model and exit.
    #[clap(long, default_value = "false")]
    tool_schema: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Input {
        expression,
        strict,
        max_depth,
        max_len,
        json,
        debug_lexer,
        tool_schema,
    } = Input::parse();

    if tool_schema {
        print_tool_schema();
        return;
    }

    let options = EvalOptions {
        strictness: if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        },
        max_depth,
    };
    let calculator = CalculatorTool::new(options, max_len);

    let mut failed = false;
    let mut run = |expression: &str| {
        if debug_lexer {
            run_debug_lexer(expression);
        } else {
            failed |= !run_expression(&calculator, expression, json);
        }
    };

    match expression {
        Some(expression) => run(&expression),
        None => {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("failed to read from stdin: {e}");
                        std::process::exit(1);
                    }
                };
                if !line.trim().is_empty() {
                    run(&line);
                }
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Prints the reply for one expression. Returns whether evaluation succeeded.
fn run_expression(calculator: &CalculatorTool, expression: &str, json: bool) -> bool {
    let result = calculator.evaluate(expression);
    let success = result.is_ok();

    if let Err(e) = &result {
        let report = miette::Report::new(e.clone()).with_source_code(expression.to_string());
        eprintln!("{report:?}");
    }

    if json {
        let outcome = tool::Outcome::from(result);
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("failed to serialize outcome: {e}"),
        }
    } else {
        println!("{}", tool::reply(expression, &result));
    }

    success
}

fn run_debug_lexer(expression: &str) {
    let mut lexer = lexer::Lexer::new(expression);
    for token in lexer.by_ref() {
        let diag = miette::miette!(
            labels = vec![LabeledSpan::at(
                token.span.start..token.span.end,
                format!("{:?}", token.kind)
            )],
            severity = miette::Severity::Advice,
            "found a token",
        )
        .with_source_code(expression.to_string());
        eprintln!("{:?}", diag);
    }

    for span in lexer.skipped() {
        let diag = miette::miette!(
            labels = vec![LabeledSpan::at(span.start..span.end, "skipped")],
            severity = miette::Severity::Warning,
            "ignored a character",
        )
        .with_source_code(expression.to_string());
        eprintln!("{:?}", diag);
    }
}

fn print_tool_schema() {
    let schema = serde_json::json!({
        "name": tool::TOOL_NAME,
        "description": tool::TOOL_DESCRIPTION,
        "parameters": {
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The arithmetic expression to evaluate, e.g. \"sqrt(144) * pi\""
                }
            },
            "required": ["expression"]
        }
    });

    match serde_json::to_string_pretty(&schema) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("failed to serialize tool schema: {e}");
            std::process::exit(1);
        }
    }
}

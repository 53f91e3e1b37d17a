//! This is the command line tool that loads '.dot' files, and prints them
//! back in canonical form, optionally by going through the object model.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{value_parser, Arg, ArgAction, Command};
use dotgraph::gv::parser::ast::CommentKind;
use dotgraph::gv::parser::builder::DEFAULT_MAX_AST_NODES;
use dotgraph::{
    EndOfLine, Error, FromAstOptions, FromDotOptions, IndentStyle,
    ParseOptions, PrintOptions, StartRule, ToAstOptions, ToDotOptions,
};
use std::fs;
use std::process::exit;

struct CLIOptions {
    input_path: String,
    output_path: Option<String>,
    dump_ast: bool,
    through_model: bool,
    max_ast_nodes: usize,
    comment_kind: CommentKind,
    print: PrintOptions,
}

impl CLIOptions {
    pub fn new() -> Self {
        Self {
            input_path: String::new(),
            output_path: None,
            dump_ast: false,
            through_model: false,
            max_ast_nodes: DEFAULT_MAX_AST_NODES,
            comment_kind: CommentKind::Slash,
            print: PrintOptions::default(),
        }
    }
}

fn format_dot(contents: &str, cli: &CLIOptions) -> dotgraph::Result<String> {
    let parse = ParseOptions {
        start_rule: StartRule::Dot,
        filename: Option::Some(cli.input_path.clone()),
        max_ast_nodes: cli.max_ast_nodes,
    };

    if cli.dump_ast {
        let dot = dotgraph::parse_with(contents, &parse)?;
        if let Option::Some(node) = dot.into_node() {
            eprint!("{}", dotgraph::gv::dump_ast(&node));
        }
    }

    if cli.through_model {
        let options = FromDotOptions {
            parse,
            convert: FromAstOptions::default(),
        };
        let model = dotgraph::from_dot_with(contents, options)?;
        let options = ToDotOptions {
            convert: ToAstOptions {
                comment_kind: cli.comment_kind,
                max_ast_nodes: cli.max_ast_nodes,
            },
            print: cli.print,
        };
        return dotgraph::to_dot_with(&model, &options);
    }

    let dot = dotgraph::parse_with(contents, &parse)?;
    match dot.into_node() {
        Option::Some(node) => dotgraph::stringify_with(&node, &cli.print),
        Option::None => Result::Err(Error::Conversion(
            "the input is not a DOT file".to_string(),
        )),
    }
}

fn main() {
    let matches = Command::new("dotfmt")
        .version("1.x")
        .about("Formats GraphViz DOT files")
        .arg(
            Arg::new("ast")
                .short('a')
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Dump the graph AST to stderr"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .action(ArgAction::SetTrue)
                .help("Convert the graph to the object model and back"),
        )
        .arg(
            Arg::new("tabs")
                .long("tabs")
                .action(ArgAction::SetTrue)
                .help("Indent with tabs"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("2")
                .help("The number of spaces per indentation level"),
        )
        .arg(
            Arg::new("crlf")
                .long("crlf")
                .action(ArgAction::SetTrue)
                .help("End lines with CRLF"),
        )
        .arg(
            Arg::new("comment-kind")
                .long("comment-kind")
                .value_parser(["slash", "macro", "block"])
                .default_value("slash")
                .help("The comment syntax used with --model"),
        )
        .arg(
            Arg::new("max-nodes")
                .long("max-nodes")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("The maximum number of AST nodes per conversion"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let mut cli = CLIOptions::new();
    cli.dump_ast = matches.get_flag("ast");
    cli.through_model = matches.get_flag("model");
    cli.output_path = matches.get_one::<String>("output").cloned();
    if let Option::Some(n) = matches.get_one::<usize>("max-nodes") {
        cli.max_ast_nodes = *n;
    }
    cli.comment_kind = match matches
        .get_one::<String>("comment-kind")
        .map(|s| s.as_str())
    {
        Option::Some("macro") => CommentKind::Macro,
        Option::Some("block") => CommentKind::Block,
        _ => CommentKind::Slash,
    };
    if matches.get_flag("tabs") {
        cli.print.indent_style = IndentStyle::Tab;
    }
    if let Option::Some(n) = matches.get_one::<usize>("indent") {
        cli.print.indent_size = *n;
    }
    if matches.get_flag("crlf") {
        cli.print.end_of_line = EndOfLine::Crlf;
    }
    if let Option::Some(path) = matches.get_one::<String>("INPUT") {
        cli.input_path = path.clone();
    }

    let contents = match fs::read_to_string(&cli.input_path) {
        Result::Ok(contents) => contents,
        Result::Err(err) => {
            log::error!("Can't open the file {}", cli.input_path);
            log::error!("Error {}", err);
            exit(1);
        }
    };

    let text = match format_dot(&contents, &cli) {
        Result::Ok(text) => text,
        Result::Err(Error::Syntax(err)) => {
            eprintln!("{}", err.snippet(&contents));
            log::error!("Error: {}", err);
            exit(1);
        }
        Result::Err(err) => {
            log::error!("Error: {}", err);
            exit(1);
        }
    };

    let eol = cli.print.end_of_line.as_str();
    match &cli.output_path {
        Option::Some(path) => {
            if let Result::Err(err) = fs::write(path, text + eol) {
                log::error!("Could not write the file {}", path);
                log::error!("Error {}", err);
                exit(1);
            }
            log::info!("Wrote {}", path);
        }
        Option::None => print!("{}{}", text, eol),
    }
}

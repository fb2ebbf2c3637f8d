//! Chat bot dispatch example.
//!
//! Builds a small command tree in code, parses a handful of chat messages
//! and routes each parsed command to a handler by its handler key.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-parser-demos --example chat_bot
//! ```

use command_parser::{CommandParser, ErrorMode, ParseResult, ParserConfig};
use command_parser_core::{CommandNode, CommandSet, DataType, OptionSchema, Pattern};

fn main() {
    let parser = CommandParser::new(
        bot_commands(),
        ParserConfig::default().with_command_prefix("!"),
    );

    let messages = [
        "hello everyone",
        "!user add alice --role admin",
        "!user add \"bob smith\"",
        "!user kick mallory",
        "!roll",
        "!roll 20 --times=3",
        "!say \"good morning\" all",
    ];

    for message in messages {
        println!("> {message}");
        match parser.parse(message) {
            Ok(result) if result.is_valid() => dispatch(&result),
            Ok(_) => println!("  (not a command)"),
            Err(err) => println!("  error: {err}"),
        }
    }

    // Permissive parsing keeps going and collects every problem.
    let lenient = CommandParser::new(
        parser.commands().clone(),
        parser
            .config()
            .clone()
            .with_error_mode(ErrorMode::Permissive),
    );
    let result = lenient
        .parse("!user add alice --role owner")
        .expect("permissive parsing does not fail on option errors");
    println!();
    println!("permissive: {result}");
    for err in result.errors() {
        println!("  collected: {err}");
    }
}

fn bot_commands() -> CommandSet {
    let name_pattern = Pattern::new(r"^[a-z ]+$").expect("static pattern compiles");

    [
        CommandNode::new("user")
            .with_title("Users")
            .with_subcommand(
                CommandNode::new("add")
                    .with_handler("user.add")
                    .with_option(
                        OptionSchema::argument("name")
                            .with_words(1, 1)
                            .with_pattern(name_pattern)
                            .required(),
                    )
                    .with_option(
                        OptionSchema::flag("role")
                            .with_short_name("r")
                            .with_words(1, 1)
                            .with_choices(["admin", "member"])
                            .with_default("member"),
                    ),
            )
            .with_subcommand(
                CommandNode::new("remove")
                    .with_alias("rm")
                    .with_handler("user.remove")
                    .with_option(OptionSchema::argument("name").with_words(1, 1).required()),
            ),
        CommandNode::new("roll").with_handler("dice.roll").with_option(
            OptionSchema::argument("sides")
                .with_words(0, 1)
                .with_data_type(DataType::Integer)
                .with_default(6),
        )
        .with_option(
            OptionSchema::flag("times")
                .with_separator("=")
                .with_words(1, 1)
                .with_data_type(DataType::Integer),
        ),
        CommandNode::new("say")
            .with_handler("say")
            .with_option(OptionSchema::argument("text").with_words(1, 50).required()),
    ]
    .into_iter()
    .collect()
}

fn dispatch(result: &ParseResult) {
    match result.handler() {
        Some("user.add") => {
            let name = result.argument("name").and_then(|a| a.text());
            let role = result.flag("role").map(|f| f.value_or_default());
            match role {
                Some(role) => println!("  adding {name:?} as {role}"),
                None => println!("  adding {name:?}"),
            }
        }
        Some("user.remove") => {
            let name = result.argument("name").and_then(|a| a.text());
            println!("  removing {name:?}");
        }
        Some("dice.roll") => {
            let sides = result
                .argument("sides")
                .map(|a| a.value_or_default())
                .and_then(|v| v.as_i64())
                .unwrap_or(6);
            let times = result
                .flag_value("times")
                .and_then(|v| v.as_i64())
                .unwrap_or(1);
            println!("  rolling a d{sides} {times} time(s)");
        }
        Some("say") => {
            let text = result.argument("text").and_then(|a| a.text());
            println!("  saying {text:?}");
        }
        Some(other) => println!("  no handler registered for {other}"),
        None => println!("  {} has no handler", result.name()),
    }
}

//! Registry loading example.
//!
//! Writes a directory of per-command JSON files plus a YAML registry file,
//! loads them through a `RegistryBuilder` fallback chain, and prints the
//! JSON report for a few parsed lines.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-parser-demos --example load_registry
//! ```
//!
//! This example creates temporary registry files to demonstrate the API.

use std::io::Write;

use command_parser::{OutputFormat, format_result};
use command_parser_core::{CommandNode, OptionSchema};
use command_parser_registry::{CommandRegistry, RegistryFile};

const REGISTRY_YAML: &str = r#"
version: "1.0"
parser:
  command_prefix: "/"
  error_mode: permissive
commands:
  - name: deploy
    handler: deploy
    options:
      - kind: argument
        name: service
        min_words: 1
        max_words: 1
        is_required: true
      - kind: flag
        name: env
        short_name: e
        min_words: 1
        max_words: 1
        choices: [staging, production]
        default_value: staging
"#;

fn main() {
    let dir = std::env::temp_dir().join("command_parser_example_registry");
    let commands_dir = dir.join("commands");
    std::fs::create_dir_all(&commands_dir).unwrap();

    // One root command per file
    let nodes = [
        CommandNode::new("ping").with_handler("ping"),
        CommandNode::new("echo")
            .with_handler("echo")
            .with_option(OptionSchema::argument("text").with_words(1, 20).required()),
    ];
    for node in &nodes {
        let path = commands_dir.join(format!("{}.json", node.name));
        let mut file = std::fs::File::create(&path).unwrap();
        serde_json::to_writer_pretty(&mut file, node).unwrap();
        file.flush().unwrap();
    }

    let registry_path = dir.join("registry.yaml");
    std::fs::write(&registry_path, REGISTRY_YAML).unwrap();

    // The missing file is skipped and the YAML registry wins
    let start = std::time::Instant::now();
    let registry = CommandRegistry::builder()
        .from_file(dir.join("missing.json"))
        .from_file(&registry_path)
        .from_dir(&commands_dir)
        .build()
        .unwrap();
    println!(
        "Loaded {} command(s) {:?} in {:.2?}",
        registry.len(),
        registry.names(),
        start.elapsed()
    );

    let parser = registry.parser();
    for line in ["/deploy api -e production", "/deploy api --env moon", "hello"] {
        let result = parser.parse(line).unwrap();
        println!("> {line}");
        println!("{}", format_result(&result, OutputFormat::Json).unwrap());
    }

    // The directory on its own uses default parser settings
    let from_dir = CommandRegistry::from_dir(&commands_dir).unwrap();
    let result = from_dir.parser().parse("echo hi there").unwrap();
    println!("> echo hi there");
    println!("{}", format_result(&result, OutputFormat::Text).unwrap());

    // Round-trip the combined view back to a single file
    let exported: RegistryFile = from_dir.to_file();
    exported.save(dir.join("exported.json")).unwrap();
    println!("Exported {} command(s)", exported.commands.len());

    std::fs::remove_dir_all(&dir).ok();
}

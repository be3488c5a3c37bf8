//! Command-line front end.
//!
//! ```bash
//! # Serialize a JSON-lines event stream with the built-in wiki listener descriptor
//! evmark events.jsonl -o out.xml
//!
//! # Custom listener descriptor and configuration, indented output on stdout
//! evmark events.jsonl --descriptor listener.json --config names.json --indent 2
//!
//! # Print the built-in descriptor
//! evmark --print-descriptor
//! ```

use clap::Parser;
use evmark::{
    DescriptorRegistry, EvmarkError, SerializerBuilder, ensure_closed, read_events,
    serialize_events, serialize_to_file,
};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evmark")]
#[command(about = "Serialize listener events to XML")]
struct Cli {
    /// JSON-lines event stream; reads stdin when omitted
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Listener descriptor document (JSON)
    #[arg(long)]
    descriptor: Option<PathBuf>,

    /// Serializer configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Indent nested elements by this many spaces
    #[arg(long)]
    indent: Option<usize>,

    /// Print the active descriptor document and exit
    #[arg(long)]
    print_descriptor: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), EvmarkError> {
    if cli.print_descriptor {
        let registry = match &cli.descriptor {
            Some(path) => DescriptorRegistry::from_json(&std::fs::read_to_string(path)?)?,
            None => DescriptorRegistry::wiki_listener()?,
        };
        let json = serde_json::to_string_pretty(&registry.to_document())?;
        println!("{}", json);
        return Ok(());
    }

    let mut builder = SerializerBuilder::new().with_indent(cli.indent);
    if let Some(path) = &cli.descriptor {
        builder = builder.with_descriptor_file(path)?;
    }
    if let Some(path) = &cli.config {
        builder = builder.with_config_file(path)?;
    }

    let records = match &cli.input {
        Some(path) => read_events(BufReader::new(File::open(path)?))?,
        None => read_events(io::stdin().lock())?,
    };
    log::info!("Read {} event(s)", records.len());

    match &cli.output {
        Some(path) => serialize_to_file(builder, &records, path),
        None => {
            let stdout = io::stdout();
            {
                let mut serializer = builder.build_xml(stdout.lock())?;
                serialize_events(&mut serializer, &records)?;
                ensure_closed(&serializer)?;
            }
            writeln!(stdout.lock())?;
            Ok(())
        }
    }
}

//! Converts game descriptors between their masked and plain forms.
//!
//! A masked layout (`m<hex>`) cannot be read by eye; a plain one (`u<hex>`) can
//! be edited by hand and masked again afterwards.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example obfuscate -- 9x9n10 4,4,u000000000800000000000
//! ```
//!
//! A full game ID with a `<params>:` prefix is accepted too:
//!
//! ```sh
//! cargo run --example obfuscate -- 9x9n10:4,4,m<hex>
//! ```

use std::process;

use clap::Parser;
use mines_core::GameParams;
use mines_generator::toggle_masking;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Parameters string, or a full `<params>:<descriptor>` game ID.
    #[arg(value_name = "PARAMS")]
    params: String,

    /// Descriptor to convert. Taken from the game ID if omitted.
    #[arg(value_name = "DESCRIPTOR")]
    descriptor: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let (params, descriptor) = match (args.params.split_once(':'), args.descriptor) {
        (Some((params, descriptor)), None) => (params.to_owned(), descriptor.to_owned()),
        (None, Some(descriptor)) => (args.params, descriptor),
        _ => {
            eprintln!("Give either a full game ID or parameters and a descriptor.");
            process::exit(2);
        }
    };

    let params = GameParams::decode(&params);
    if let Err(e) = params.validate(false) {
        eprintln!("{e}");
        process::exit(1);
    }

    match toggle_masking(params.size(), &descriptor) {
        Ok(converted) => println!("{}:{converted}", params.encode(false)),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

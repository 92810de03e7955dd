//! Example expanding a range expression into the values it covers.
//!
//! This example shows how to:
//! - Parse a range expression over a bounded domain
//! - Customize the grammar symbols
//! - Print the normalized expression and the covered values
//!
//! # Usage
//!
//! ```sh
//! cargo run --example expand_range -- "1,3-5,10/2" --max 20
//! ```
//!
//! Use a custom grammar:
//!
//! ```sh
//! cargo run --example expand_range -- "1;3:5;any%10" --max 59 \
//!     --value-separator ';' --range-separator ':' --repetition-separator '%' --all-values any
//! ```
//!
//! Set `RUST_LOG=debug` (or `trace`) to see how terms are parsed and merged.

use std::process;

use clap::Parser;
use ordset_range::{Range, RangeSyntax};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Range expression, for example "1,3-5,10/2".
    expression: String,

    /// Lower bound of the domain.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min: i64,

    /// Upper bound of the domain.
    #[arg(long, default_value_t = 59, allow_negative_numbers = true)]
    max: i64,

    /// Separator between terms.
    #[arg(long, default_value_t = ',')]
    value_separator: char,

    /// Separator of interval terms.
    #[arg(long, default_value_t = '-')]
    range_separator: char,

    /// Separator of repetition terms.
    #[arg(long, default_value_t = '/')]
    repetition_separator: char,

    /// Token standing for every value of the domain.
    #[arg(long, default_value = "*")]
    all_values: String,

    /// Only print the normalized expression.
    #[arg(long)]
    normalize: bool,
}

fn main() {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let syntax = RangeSyntax {
        value_separator: args.value_separator,
        range_separator: args.range_separator,
        repetition_separator: args.repetition_separator,
        all_values: args.all_values,
    };

    let range = match Range::parse_with_syntax(&args.expression, args.min, args.max, syntax) {
        Ok(range) => range,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };
    log::info!(
        "parsed {} counter(s) over {}..={}",
        range.counters().len(),
        range.minimum(),
        range.maximum()
    );

    println!("{range}");
    if args.normalize {
        return;
    }

    let values = range
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>();
    println!("{} value(s): {}", values.len(), values.join(" "));
}

//! Keypad statistics binary - composes many keypads and passcodes and prints
//! how often each symbol and category shows up.
//!
//! Usage:
//!   ./keypad_stats                    # 100,000 rounds, built-in vocabulary
//!   ./keypad_stats -n 1000000 -u      # more rounds, /dev/urandom entropy
//!   ./keypad_stats --vocab study.json # custom vocabulary
//!
//! With ratio weighting on, each category should land close to its ratio
//! count per keypad and symbols within a category should be near-uniform.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};

use emojipin::pin::{KEYPAD_SIZE, Vocabulary, compose, emoji_passcode};
use emojipin::rand;

const DEFAULT_ROUNDS: usize = 100_000;

fn print_usage() {
    eprintln!("Usage: keypad_stats [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --rounds N   Keypads to compose (default {})", DEFAULT_ROUNDS);
    eprintln!("      --vocab FILE Load the vocabulary from JSON");
    eprintln!("  -u, --urandom    Use /dev/urandom pool instead of hardware entropy");
    eprintln!("  -h, --help       Show this help");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut rounds = DEFAULT_ROUNDS;
    let mut vocab = Vocabulary::standard();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-u" | "--urandom" => {
                if !rand::enable_urandom() {
                    eprintln!("/dev/urandom not available, using hardware entropy");
                }
            }
            "-n" | "--rounds" => {
                i += 1;
                let value = args.get(i).context("--rounds needs a value")?;
                rounds = value
                    .replace(['_', ','], "")
                    .parse()
                    .with_context(|| format!("Invalid round count: {}", value))?;
            }
            "--vocab" => {
                i += 1;
                let path = args.get(i).context("--vocab needs a path")?;
                vocab = Vocabulary::from_file(path)?;
            }
            other => bail!("Unknown argument: {}", other),
        }
        i += 1;
    }
    if rounds == 0 {
        bail!("--rounds must be at least 1");
    }

    let mut symbols: BTreeMap<String, usize> = BTreeMap::new();
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    let mut repeats = [0usize; 3];

    for _ in 0..rounds {
        let keypad = compose(&vocab);
        for symbol in keypad.symbols() {
            *symbols.entry(symbol.to_string()).or_default() += 1;
            let category = vocab.category_of(symbol).unwrap_or("(none)");
            *categories.entry(category.to_string()).or_default() += 1;
        }

        let code = emoji_passcode(keypad.symbols())?;
        repeats[code.max_repeat().min(2)] += 1;
    }

    let total_keys = (rounds * KEYPAD_SIZE) as f64;
    println!("entropy source: {}", rand::entropy_source());
    println!("rounds: {}", rounds);
    println!();

    println!("{:<12} {:>10} {:>10} {:>8}", "category", "keys", "per pad", "ratio");
    for (name, count) in &categories {
        let expected = vocab
            .ratio()
            .iter()
            .find(|r| &r.category == name)
            .map(|r| r.count.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:>10} {:>10.3} {:>8}",
            name,
            count,
            *count as f64 / rounds as f64,
            expected
        );
    }
    println!();

    println!("{:<8} {:>10} {:>8}", "symbol", "keys", "share");
    for (symbol, count) in &symbols {
        println!(
            "{:<8} {:>10} {:>7.3}%",
            symbol,
            count,
            *count as f64 * 100.0 / total_keys
        );
    }
    println!();

    println!("passcodes with all symbols distinct: {}", repeats[1]);
    println!("passcodes with a repeated symbol:    {}", repeats[2]);

    Ok(())
}

//! Command-line wrapper around the miner: load a delimited transaction
//! file, print the frequent itemsets, then either every rule meeting the
//! confidence threshold or the rules for one chosen consequent.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use freqmine::{Apriori, ItemId, Itemset, Mined, TransactionStore};

#[derive(Parser)]
#[command(name = "freqmine")]
#[command(about = "Mine frequent itemsets and association rules from a transaction file")]
#[command(version)]
struct Cli {
    /// Input file, one transaction per line, delimited item tokens
    input: PathBuf,

    /// Minimum support, fraction of transactions in [0, 1]
    #[arg(short = 's', long, default_value_t = 0.10)]
    min_support: f32,

    /// Minimum confidence for printed rules, in [0, 1]
    #[arg(short = 'c', long, default_value_t = 0.40)]
    min_confidence: f32,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Cap on mined itemset size
    #[arg(long)]
    max_len: Option<usize>,

    /// Only print rules with this item as the consequent
    #[arg(long)]
    consequent: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("freqmine: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> freqmine::Result<()> {
    let mut apriori = Apriori::new(cli.min_support, cli.min_confidence)?;
    if let Some(max_len) = cli.max_len {
        apriori = apriori.with_max_len(max_len)?;
    }

    let store = TransactionStore::from_path(&cli.input, cli.delimiter)?;
    let n = store.len();
    let mined = apriori.mine(store);

    print_frequent_itemsets(&mined, n);

    match cli.consequent {
        Some(consequent) => print_rules_for(&mined, &consequent, cli.min_confidence)?,
        None => print_rules(&mined),
    }

    Ok(())
}

fn print_frequent_itemsets(mined: &Mined, n: usize) {
    let mut levels: Vec<_> = mined.frequent_itemsets().iter().collect();
    levels.sort_by_key(|(&level, _)| level);

    for (level, itemsets) in levels {
        println!("-- {} frequent itemsets of size {}", itemsets.len(), level);
        let mut rows: Vec<(&Itemset, u32)> = itemsets.iter().map(|(i, &c)| (i, c)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (itemset, count) in rows {
            println!(
                "   {{{}}}  support {:.3} ({}/{})",
                item_names(mined, itemset),
                count as f32 / n as f32,
                count,
                n,
            );
        }
    }
}

fn print_rules(mined: &Mined) {
    let rules = mined.generate_rules();
    println!("-- {} rules", rules.len());
    for rule in &rules {
        println!("   {}", mined.display_rule(rule));
    }
}

fn print_rules_for(mined: &Mined, consequent: &str, min_confidence: f32) -> freqmine::Result<()> {
    let rules = mined.rules_for(consequent)?;

    let mut rows: Vec<(&Itemset, f32)> = rules
        .iter()
        .map(|(antecedent, &confidence)| (antecedent, confidence))
        .filter(|&(_, confidence)| confidence >= min_confidence)
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("-- {} rules with consequent {{{}}}", rows.len(), consequent);
    for (antecedent, confidence) in rows {
        println!(
            "   {{{}}} => {{{}}} (confidence {:.3})",
            item_names(mined, antecedent),
            consequent,
            confidence,
        );
    }

    Ok(())
}

fn item_names(mined: &Mined, itemset: &[ItemId]) -> String {
    let mut names: Vec<&str> = itemset
        .iter()
        .filter_map(|&id| mined.store().item_name(id))
        .collect();
    names.sort_unstable();
    names.join(", ")
}

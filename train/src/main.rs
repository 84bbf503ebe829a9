use std::fs::File;
use std::io::{prelude::*, stderr, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use bayeslet::Trainer;
use bayeslet_rules::{
    string_filters::{LowercaseFilter, NonWordFilter},
    token_filters::{MinLengthFilter, StopwordFilter},
    StringFilter, TokenFilter,
};
use clap::Parser;

#[derive(Clone, Debug)]
struct ClassCorpus {
    label: String,
    path: PathBuf,
}

impl FromStr for ClassCorpus {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, path) = s.split_once('=').ok_or("Expected LABEL=PATH")?;
        if label.is_empty() {
            return Err("The label must not be empty");
        }
        Ok(Self {
            label: label.to_string(),
            path: PathBuf::from(path),
        })
    }
}

#[derive(Parser, Debug)]
#[command(about = "A program to train models of Bayeslet.")]
struct Args {
    /// A whitespace-tokenized training corpus of a class, given as LABEL=PATH.
    /// Classes are ordered as specified, and the first one wins ties. Files given for the same
    /// label are concatenated.
    #[arg(long, required = true)]
    corpus: Vec<ClassCorpus>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// A stop word list (one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Tokens shorter than this value are removed, where the length is in grapheme clusters
    #[arg(long, default_value = "1")]
    min_len: usize,

    /// Do not lowercase and strip non-word characters from training data.
    #[arg(long)]
    no_norm: bool,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stopword_filter = match &args.stopwords {
        Some(path) => {
            eprintln!("Loading {path:?} ...");
            let filter = StopwordFilter::from_reader(BufReader::new(File::open(path)?))?;
            eprintln!("# of stop words: {}", filter.len());
            filter
        }
        None => StopwordFilter::default(),
    };
    let min_length_filter = MinLengthFilter::new(args.min_len);

    eprintln!("Loading dataset...");
    let mut trainer = Trainer::new();
    for corpus in &args.corpus {
        trainer.add_class(&corpus.label)?;
    }
    for ClassCorpus { label, path } in args.corpus {
        eprintln!("Loading {path:?} as {label} ...");
        let f = BufReader::new(File::open(path)?);
        let mut n_tokens = 0;
        for (i, line) in f.lines().enumerate() {
            if i % 10000 == 0 {
                eprint!("# of lines: {i}\r");
                stderr().flush()?;
            }
            let line = line?;
            let line = if args.no_norm {
                line
            } else {
                NonWordFilter.filter(LowercaseFilter.filter(line))
            };
            let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
            let tokens = stopword_filter.filter(tokens);
            let tokens = min_length_filter.filter(tokens);
            n_tokens += trainer.push_tokens(&label, tokens)?;
        }
        eprintln!("# of tokens in {label}: {n_tokens}");
    }
    eprintln!("# of tokens: {}", trainer.n_tokens());

    let model = trainer.train()?;
    for label in model.labels() {
        if let Some(freq) = model.frequency(label) {
            eprintln!("{label}: {} types, {} tokens", freq.n_types(), freq.total());
        }
    }

    eprintln!("Saving model file...");
    let mut f = zstd::Encoder::new(File::create(args.model)?, 19)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;

    Ok(())
}

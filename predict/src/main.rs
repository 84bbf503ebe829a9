use std::fs::File;
use std::io::{prelude::*, stdin, BufReader};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use bayeslet::{Classifier, FrequencyEstimator, Laplace, Model, Unsmoothed};
use bayeslet_rules::{
    string_filters::{LowercaseFilter, NonWordFilter},
    token_filters::{MinLengthFilter, StopwordFilter},
    StringFilter, TokenFilter,
};
use clap::Parser;

#[derive(Clone, Copy, Debug)]
enum Smoothing {
    Raw,
    Laplace,
}

impl FromStr for Smoothing {
    type Err = &'static str;
    fn from_str(smoothing: &str) -> Result<Self, Self::Err> {
        match smoothing {
            "none" => Ok(Self::Raw),
            "laplace" => Ok(Self::Laplace),
            _ => Err("Could not parse a smoothing value"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "predict", about = "A program to classify texts with Bayeslet.")]
struct Args {
    /// The model file to use when classifying text
    #[arg(long)]
    model: PathBuf,

    /// Probability estimation: {none, laplace}.
    /// none: relative frequencies as observed.
    /// laplace: add-one smoothing over the vocabulary of all classes.
    #[arg(long, default_value = "laplace")]
    smoothing: Smoothing,

    /// Print the log-likelihood of each class after the label.
    #[arg(long)]
    scores: bool,

    /// A stop word list (one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Tokens shorter than this value are removed, where the length is in grapheme clusters
    #[arg(long, default_value = "1")]
    min_len: usize,

    /// Do not lowercase and strip non-word characters from input texts.
    #[arg(long)]
    no_norm: bool,

    /// Number of threads (0 means multithreading will be disabled)
    #[arg(long, default_value = "0")]
    n_threads: usize,

    /// Number of lines sent to the threads at once
    #[arg(long, default_value = "1000")]
    mt_chunk_size: usize,
}

struct Normalizer {
    no_norm: bool,
    stopword_filter: StopwordFilter,
    min_length_filter: MinLengthFilter,
}

impl Normalizer {
    fn tokenize(&self, line: String) -> Vec<String> {
        let line = if self.no_norm {
            line
        } else {
            NonWordFilter.filter(LowercaseFilter.filter(line))
        };
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        let tokens = self.stopword_filter.filter(tokens);
        self.min_length_filter.filter(tokens)
    }
}

fn run<E>(
    classifier: Classifier<E>,
    normalizer: &Normalizer,
    args: &Args,
) -> Result<usize, Box<dyn std::error::Error>>
where
    E: FrequencyEstimator + Send + Sync + 'static,
{
    let mut n_lines = 0;
    if args.n_threads == 0 {
        for line in stdin().lock().lines() {
            let tokens = normalizer.tokenize(line?);
            if args.scores {
                let prediction = classifier.predict(tokens.as_slice());
                let mut out = classifier.labels()[prediction.class].clone();
                for (label, score) in classifier.labels().iter().zip(&prediction.scores) {
                    out.push_str(&format!("\t{label}:{score}"));
                }
                println!("{out}");
            } else {
                println!("{}", classifier.label(tokens.as_slice()));
            }
            n_lines += 1;
        }
    } else {
        let classifier = classifier.multithreading(args.n_threads);
        let mut lines = stdin().lock().lines().peekable();
        while lines.peek().is_some() {
            let mut chunk = Vec::with_capacity(args.mt_chunk_size);
            for line in lines.by_ref().take(args.mt_chunk_size.max(1)) {
                chunk.push(normalizer.tokenize(line?));
            }
            n_lines += chunk.len();
            for class in classifier.label_ids(chunk) {
                println!("{}", classifier.labels()[class]);
            }
        }
    }
    Ok(n_lines)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.scores && args.n_threads != 0 {
        return Err("--scores is not supported with multithreading".into());
    }

    let stopword_filter = match &args.stopwords {
        Some(path) => StopwordFilter::from_reader(BufReader::new(File::open(path)?))?,
        None => StopwordFilter::default(),
    };
    let normalizer = Normalizer {
        no_norm: args.no_norm,
        stopword_filter,
        min_length_filter: MinLengthFilter::new(args.min_len),
    };

    eprintln!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(&args.model)?)?;
    let model = Model::read(&mut f)?;

    eprintln!("Start classification");
    let start = Instant::now();
    let n_lines = match args.smoothing {
        Smoothing::Raw => run(Classifier::new(model, Unsmoothed), &normalizer, &args)?,
        Smoothing::Laplace => run(Classifier::new(model, Laplace), &normalizer, &args)?,
    };
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [lines/sec]",
        n_lines as f64 / duration.as_secs_f64()
    );

    Ok(())
}

use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use bayeslet::{Classifier, Evaluator, FrequencyEstimator, Laplace, Model, Unsmoothed};
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

#[derive(Clone, Debug)]
struct TestSet {
    label: String,
    path: PathBuf,
}

impl FromStr for TestSet {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, path) = s.split_once('=').ok_or("Expected LABEL=PATH")?;
        Ok(Self {
            label: label.to_string(),
            path: PathBuf::from(path),
        })
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "evaluate",
    about = "A program to evaluate the accuracy of Bayeslet."
)]
struct Args {
    /// The model file to use when classifying text
    #[arg(long)]
    model: PathBuf,

    /// Test examples of a class, given as LABEL=PATH. Each line of the file is an example.
    #[arg(long, required = true)]
    test: Vec<TestSet>,

    /// Probability estimation: {none, laplace}.
    /// none: relative frequencies as observed.
    /// laplace: add-one smoothing over the vocabulary of all classes.
    #[arg(long, default_value = "laplace")]
    smoothing: Smoothing,

    /// A stop word list (one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Tokens shorter than this value are removed, where the length is in grapheme clusters
    #[arg(long, default_value = "1")]
    min_len: usize,

    /// Do not lowercase and strip non-word characters from test data.
    #[arg(long)]
    no_norm: bool,
}

fn evaluate<E>(
    classifier: Classifier<E>,
    args: &Args,
    stopword_filter: &StopwordFilter,
) -> Result<(), Box<dyn std::error::Error>>
where
    E: FrequencyEstimator,
{
    let min_length_filter = MinLengthFilter::new(args.min_len);
    let mut evaluator = Evaluator::new(classifier.labels().len());

    for TestSet { label, path } in &args.test {
        let reference = classifier
            .class_id(label)
            .ok_or_else(|| format!("Unknown label: {label}"))?;
        eprintln!("Loading {path:?} as {label} ...");
        let f = BufReader::new(File::open(path)?);
        for line in f.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let line = if args.no_norm {
                line
            } else {
                NonWordFilter.filter(LowercaseFilter.filter(line))
            };
            let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
            let tokens = stopword_filter.filter(tokens);
            let tokens = min_length_filter.filter(tokens);
            let prediction = classifier.predict(tokens.as_slice());
            evaluator.add(reference, &prediction);
        }
    }

    let n_examples = evaluator.n_examples();
    if n_examples == 0 {
        return Err("No test examples".into());
    }
    println!("Examples: {n_examples}");
    if let Some(accuracy) = evaluator.accuracy() {
        println!("Accuracy: {accuracy}");
    }
    println!(
        "Ties: {} ({})",
        evaluator.n_ties(),
        evaluator.n_ties() as f64 / n_examples as f64
    );
    let format_metric = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    for (class, label) in classifier.labels().iter().enumerate() {
        println!(
            "{label}: Precision: {}, Recall: {}, F1: {}",
            format_metric(evaluator.precision(class)),
            format_metric(evaluator.recall(class)),
            format_metric(evaluator.f1(class)),
        );
    }
    println!("Confusion matrix (rows: reference, columns: prediction):");
    println!("\t{}", classifier.labels().join("\t"));
    for (reference, label) in classifier.labels().iter().enumerate() {
        let row: Vec<_> = (0..classifier.labels().len())
            .map(|hypothesis| evaluator.confusion(reference, hypothesis).to_string())
            .collect();
        println!("{label}\t{}", row.join("\t"));
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stopword_filter = match &args.stopwords {
        Some(path) => StopwordFilter::from_reader(BufReader::new(File::open(path)?))?,
        None => StopwordFilter::default(),
    };

    eprintln!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(&args.model)?)?;
    let model = Model::read(&mut f)?;

    eprintln!("Start classification");
    match args.smoothing {
        Smoothing::Raw => evaluate(Classifier::new(model, Unsmoothed), &args, &stopword_filter),
        Smoothing::Laplace => evaluate(Classifier::new(model, Laplace), &args, &stopword_filter),
    }
}

use std::fs;
use std::path::PathBuf;

use bayeslet::{Classifier, CountRecord, Model, Unsmoothed};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "manipulate_model",
    about = "A program to manipulate trained models."
)]
struct Args {
    /// Input path of the model file
    #[arg(long)]
    model_in: PathBuf,

    /// Output path of the model file
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Output token counts of all classes as CSV.
    #[arg(long)]
    dump_counts: Option<PathBuf>,

    /// Replace token counts of all classes if the argument is specified. The classes and their
    /// order are kept from the input model.
    #[arg(long)]
    replace_counts: Option<PathBuf>,

    /// Print the most probable tokens of each class.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Deserialize, Serialize)]
struct CountRecordFlatten {
    label: String,
    token: String,
    count: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading model file...");
    let mut f = zstd::Decoder::new(fs::File::open(args.model_in)?)?;
    let mut model = Model::read(&mut f)?;

    if let Some(path) = args.replace_counts {
        eprintln!("Loading count file...");
        let file = fs::File::open(path)?;
        let mut rdr = csv::Reader::from_reader(file);
        let mut records = vec![];
        for result in rdr.deserialize() {
            let record: CountRecordFlatten = result?;
            records.push(CountRecord::new(record.label, record.token, record.count));
        }
        model = Model::from_counts(model.labels(), records)?;
    }

    if let Some(path) = args.dump_counts {
        eprintln!("Saving count file...");
        let file = fs::File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for record in model.dump_counts() {
            wtr.serialize(CountRecordFlatten {
                label: record.get_label().to_string(),
                token: record.get_token().to_string(),
                count: record.get_count(),
            })?;
        }
        wtr.flush()?;
    }

    if let Some(n) = args.top {
        let classifier = Classifier::new(model, Unsmoothed);
        for label in classifier.labels() {
            let tokens = classifier.top_tokens(label, n).unwrap_or_default();
            let tokens: Vec<_> = tokens.into_iter().map(|(token, _)| token).collect();
            println!("top {label} tokens: {}", tokens.join(", "));
        }
        model = classifier.into_model();
    }

    if let Some(path) = args.model_out {
        eprintln!("Saving model file...");
        let mut f = zstd::Encoder::new(fs::File::create(path)?, 19)?;
        model.write(&mut f)?;
        f.finish()?;
    }

    Ok(())
}

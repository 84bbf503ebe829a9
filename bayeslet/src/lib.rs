#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Bayeslet
//!
//! Bayeslet is a bag-of-words Naive Bayes text classifier. Each class is modeled by a unigram
//! language model estimated from a flat list of tokens, and an example is assigned to the class
//! with the highest log-likelihood.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{prelude::*, stdin, BufReader};
//!
//! use bayeslet::{Classifier, Laplace, Model};
//!
//! let mut f = BufReader::new(File::open("model.bin").unwrap());
//! let model = Model::read(&mut f).unwrap();
//! let classifier = Classifier::new(model, Laplace);
//!
//! for line in stdin().lock().lines() {
//!     let line = line.unwrap();
//!     let tokens: Vec<_> = line.split_whitespace().collect();
//!     println!("{}", classifier.label(&tokens));
//! }
//! ```
//!
//! Tokenization is the caller's responsibility. Training and test data must be tokenized with
//! the same convention, otherwise scores are not comparable.
//!
//! Multithreaded classification requires **crate feature** `multithreading`. For more details,
//! see [`MultithreadClassifier`].

mod utils;

mod classifier;
mod estimator;
mod evaluation;
mod frequency;
mod model;
mod trainer;
mod vocabulary;

pub mod errors;

pub use classifier::{Classifier, Prediction};
pub use estimator::{FrequencyEstimator, Laplace, Unsmoothed};
pub use evaluation::Evaluator;
pub use frequency::FrequencyModel;
pub use model::{CountRecord, Model};
pub use trainer::Trainer;
pub use vocabulary::Vocabulary;

#[cfg(feature = "multithreading")]
pub use classifier::MultithreadClassifier;

//! Driving the boosting engine round by round.
//!
//! [`driver`] holds the single-round update and evaluation steps,
//! [`session`] loops them with [`early_stopping`].

pub mod driver;
pub mod early_stopping;
pub mod report;
pub mod session;

pub use driver::{apply_params, evaluate, update, Watchlist};
pub use early_stopping::{infer_maximize, BestRound, EarlyStopping};
pub use report::parse_eval_report;
pub use session::{format_metrics, EvaluationLog, RoundRecord, TrainingSession};

//! Step-by-step Hungarian method exercises.
//!
//! An instance enumerates every route the procedure can take on its cost
//! matrix (all minimal covers at every cycle), renders the exercise as ordered
//! stages and grades each stage against the routes that agree with the
//! learner's earlier answers.
//!
//! ```no_run
//! use hungarian_steps::{Difficulty, HungarianQuestion, Mode, Submission};
//!
//! let question = HungarianQuestion::new(Some(25), Difficulty::Medium, Mode::Steps)?;
//! let stages = question.generate();
//! let report = question.evaluate(&Submission::new());
//! assert_eq!(report.len(), stages.iter().map(|s| s.fields.len()).sum::<usize>());
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod cover;
pub mod grader;
pub mod instance;
pub mod layout;
pub mod matrix;
pub mod number;
pub mod route;
pub mod stage;
pub mod topic;

pub use cover::{Assignment, Cover};
pub use grader::{Report, Submission, Verdict};
pub use instance::{Difficulty, DepthStatus, HungarianQuestion, InitializationFailure, Mode};
pub use layout::{Directive, StageLayout};
pub use matrix::{Cost, Matrix};
pub use number::Precision;
pub use route::{Route, RouteTree};
pub use stage::{Field, FieldDomain, Stage};
pub use topic::{Question, QuestionSettings, Topic};

use crate::cover::Assignment;
use crate::matrix::{Cost, Matrix};
use crate::number::Precision;
use crate::route::{Route, RouteTree};
use anyhow::{ensure, Result};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Seeds tried by the instance selector, starting at the instance seed.
pub const MAX_ATTEMPTS: u64 = 350;

/// Upper bound of a derived seed when none is supplied.
const MAX_DERIVED_SEED: u64 = 999_999;

/// Attribute name pairs the two label schemas are drawn from.
const LABEL_PAIRS: [(&str, &str); 12] = [
    ("customer_id", "client_no"),
    ("surname", "last_name"),
    ("birth_date", "date_of_birth"),
    ("zip", "postal_code"),
    ("phone", "telephone"),
    ("email", "mail_address"),
    ("street", "road"),
    ("city", "town"),
    ("salary", "income"),
    ("company", "employer"),
    ("price", "cost"),
    ("quantity", "amount"),
];

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Values one difficulty tier draws from, one uniformly per set.
#[derive(Debug)]
pub struct TierSettings {
    pub sizes: &'static [usize],
    pub depths: &'static [usize],
    pub precisions: &'static [Precision],
}

static EASY: TierSettings = TierSettings {
    sizes: &[3],
    depths: &[0],
    precisions: &[Precision::Discrete],
};

static MEDIUM: TierSettings = TierSettings {
    sizes: &[3, 4],
    depths: &[0, 1],
    precisions: &[Precision::Discrete, Precision::Continuous],
};

static HARD: TierSettings = TierSettings {
    sizes: &[4, 5],
    depths: &[1, 2],
    precisions: &[Precision::Continuous],
};

impl Difficulty {
    pub fn tier(self) -> &'static TierSettings {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl From<&str> for Difficulty {
    /// Case-insensitive; unknown names fall back to `Easy`.
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }
}

impl From<String> for Difficulty {
    fn from(name: String) -> Self {
        Difficulty::from(name.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Mode {
    /// every intermediate matrix and cover is entered and graded
    Steps,
    /// only the final assignment is graded
    Exam,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Steps
    }
}

impl From<&str> for Mode {
    /// Case-insensitive; unknown names fall back to `Steps`.
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "exam" => Mode::Exam,
            _ => Mode::Steps,
        }
    }
}

impl From<String> for Mode {
    fn from(name: String) -> Self {
        Mode::from(name.as_str())
    }
}

/// How the instance depth relates to the requested one.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DepthStatus {
    /// every route has the requested depth
    Matched,
    /// no attempt matched; the first usable tree was kept with the depth of
    /// its first route
    ///
    /// `uniform` is false when the kept tree's routes differ in depth, so
    /// `actual` may even equal `requested`.
    Fallback {
        requested: usize,
        actual: usize,
        uniform: bool,
    },
    /// built from caller supplied costs
    Fixed,
}

impl DepthStatus {
    /// Compares a built tree with the requested depth.
    pub fn of<T: Cost>(tree: &RouteTree<T>, requested: usize) -> Self {
        let uniform = tree.uniform_depth();
        if uniform == Some(requested) {
            return DepthStatus::Matched;
        }
        DepthStatus::Fallback {
            requested,
            actual: tree.routes.first().map_or(0, Route::depth),
            uniform: uniform.is_some(),
        }
    }
}

/// No attempt produced a usable route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializationFailure {
    pub seed: u64,
    pub attempts: u64,
}

impl fmt::Display for InitializationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "no route tree found for seed {} within {} attempts",
            self.seed, self.attempts
        )
    }
}

impl std::error::Error for InitializationFailure {}

/// Parameters drawn once per instance from the instance seed.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub size: usize,
    pub depth: usize,
    pub precision: Precision,
    pub schema_a: Vec<String>,
    pub schema_b: Vec<String>,
}

impl Draw {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tier = difficulty.tier();
        let size = tier.sizes[rng.gen_range(0..tier.sizes.len())];
        let depth = tier.depths[rng.gen_range(0..tier.depths.len())];
        let precision = tier.precisions[rng.gen_range(0..tier.precisions.len())];

        let pairs = LABEL_PAIRS
            .choose_multiple(&mut rng, size)
            .copied()
            .collect::<Vec<_>>();
        let mut schema_a = pairs.iter().map(|(a, _)| a.to_string()).collect::<Vec<_>>();
        let mut schema_b = pairs.iter().map(|(_, b)| b.to_string()).collect::<Vec<_>>();
        schema_a.shuffle(&mut rng);
        schema_b.shuffle(&mut rng);

        Self {
            size,
            depth,
            precision,
            schema_a,
            schema_b,
        }
    }
}

/// Costs of one attempt, uniformly drawn from `[0, 10]` in matrix units.
pub fn random_costs(size: usize, precision: Precision, seed: u64) -> Result<Matrix<i64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells = (0..size * size)
        .map(|_| rng.gen_range(0..=precision.max_units()))
        .collect();
    Matrix::from_vec(size, cells)
}

/// Accepted attempt of the instance selector.
#[derive(Debug, Clone)]
pub struct Selection {
    pub attempt: u64,
    pub costs: Matrix<i64>,
    pub tree: RouteTree<i64>,
    pub depth: usize,
    pub status: DepthStatus,
}

/// Tries `seed, seed + 1, ...` until a tree whose routes all have
/// `target_depth` cycles shows up.
///
/// When every attempt misses, the first non-empty tree is kept and its first
/// route's depth becomes the instance depth.
pub fn select_instance(
    seed: u64,
    size: usize,
    precision: Precision,
    target_depth: usize,
) -> Result<Selection> {
    let mut first: Option<(u64, Matrix<i64>, RouteTree<i64>, DepthStatus)> = None;

    for attempt in 0..MAX_ATTEMPTS {
        let costs = random_costs(size, precision, seed.wrapping_add(attempt))?;
        let tree = RouteTree::build(&costs);
        if tree.is_empty() {
            continue;
        }
        let status = DepthStatus::of(&tree, target_depth);
        if status == DepthStatus::Matched {
            info!(
                "seed {} accepted after {} attempts ({} routes, depth {})",
                seed,
                attempt + 1,
                tree.routes.len(),
                target_depth
            );
            return Ok(Selection {
                attempt,
                costs,
                tree,
                depth: target_depth,
                status,
            });
        }
        debug!("attempt {} rejected: {:?}", attempt, status);
        if first.is_none() {
            first = Some((attempt, costs, tree, status));
        }
    }

    match first {
        Some((attempt, costs, tree, status)) => {
            let actual = tree.routes.first().map_or(0, Route::depth);
            warn!(
                "seed {}: no tree of depth {} in {} attempts, using {:?}",
                seed, target_depth, MAX_ATTEMPTS, status
            );
            Ok(Selection {
                attempt,
                costs,
                tree,
                depth: actual,
                status,
            })
        }
        None => Err(InitializationFailure {
            seed,
            attempts: MAX_ATTEMPTS,
        }
        .into()),
    }
}

///
/// Hungarian method exercise: the cost matrix, its complete route tree and the
/// label schemas naming rows and columns.
///
/// Everything is computed at construction and read-only afterwards.
///
#[derive(Debug, Clone)]
pub struct HungarianQuestion {
    seed: Option<u64>,
    difficulty: Option<Difficulty>,
    mode: Mode,
    precision: Precision,
    depth: usize,
    status: DepthStatus,
    schema_a: Vec<String>,
    schema_b: Vec<String>,
    costs: Matrix<i64>,
    tree: RouteTree<i64>,
    valid_assignments: BTreeSet<Assignment>,
}

impl HungarianQuestion {
    /// Builds a random instance; a missing seed is drawn from `1..=999999`.
    pub fn new(seed: Option<u64>, difficulty: Difficulty, mode: Mode) -> Result<Self> {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(1..=MAX_DERIVED_SEED));
        let draw = Draw::new(seed, difficulty);
        debug!(
            "seed {}: size {}, depth {}, {:?}",
            seed, draw.size, draw.depth, draw.precision
        );
        let selection = select_instance(seed, draw.size, draw.precision, draw.depth)?;
        let valid_assignments = selection.tree.assignments();

        Ok(Self {
            seed: Some(seed),
            difficulty: Some(difficulty),
            mode,
            precision: draw.precision,
            depth: selection.depth,
            status: selection.status,
            schema_a: draw.schema_a,
            schema_b: draw.schema_b,
            costs: selection.costs,
            tree: selection.tree,
            valid_assignments,
        })
    }

    /// Builds an instance from given costs in units of `precision`.
    pub fn with_costs(
        costs: Matrix<i64>,
        precision: Precision,
        mode: Mode,
        schema_a: Vec<String>,
        schema_b: Vec<String>,
    ) -> Result<Self> {
        let size = costs.size();
        ensure!(
            schema_a.len() == size && schema_b.len() == size,
            "both label schemas need {} labels",
            size
        );
        let distinct = schema_b.iter().collect::<BTreeSet<_>>();
        ensure!(distinct.len() == size, "column labels must be distinct");

        let tree = RouteTree::build(&costs);
        if tree.is_empty() {
            return Err(InitializationFailure {
                seed: 0,
                attempts: 1,
            }
            .into());
        }
        let depth = tree.routes[0].depth();
        let valid_assignments = tree.assignments();

        Ok(Self {
            seed: None,
            difficulty: None,
            mode,
            precision,
            depth,
            status: DepthStatus::Fixed,
            schema_a,
            schema_b,
            costs,
            tree,
            valid_assignments,
        })
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn size(&self) -> usize {
        self.costs.size()
    }

    /// Number of cover/adjust cycles the exercise asks for.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn depth_status(&self) -> DepthStatus {
        self.status
    }

    /// Row labels.
    pub fn schema_a(&self) -> &[String] {
        &self.schema_a
    }

    /// Column labels, the options of the assignment fields.
    pub fn schema_b(&self) -> &[String] {
        &self.schema_b
    }

    pub fn costs(&self) -> &Matrix<i64> {
        &self.costs
    }

    pub fn tree(&self) -> &RouteTree<i64> {
        &self.tree
    }

    pub fn routes(&self) -> &[Route<i64>] {
        &self.tree.routes
    }

    /// Every optimal assignment over all routes.
    pub fn valid_assignments(&self) -> &BTreeSet<Assignment> {
        &self.valid_assignments
    }

    /// Smallest valid assignment, used as the model answer.
    pub fn expected_assignment(&self) -> Option<&Assignment> {
        self.valid_assignments.iter().next()
    }
}

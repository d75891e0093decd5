use crate::cover::{Assignment, Cover};
use crate::instance::{HungarianQuestion, Mode};
use crate::matrix::Matrix;
use crate::number::{format_options, matches_number, parse_flag};
use crate::route::Route;
use crate::stage::Stage;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Submitted values keyed by field id.
pub type Submission = Map<String, Value>;

/// Grading result of a single field.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// accepted value, or `one of: a | b` when several are accepted
    pub expected: String,
}

/// Verdict per field id.
pub type Report = BTreeMap<String, Verdict>;

fn flag(value: bool) -> String {
    value.to_string()
}

impl HungarianQuestion {
    /// Grades a submission. Missing or malformed values are graded incorrect.
    pub fn evaluate(&self, input: &Submission) -> Report {
        match self.mode() {
            Mode::Steps => self.grade_steps(input),
            Mode::Exam => self.grade_exam(input),
        }
    }

    fn grade_steps(&self, input: &Submission) -> Report {
        let stages = Stage::sequence(self.depth());
        let mut report = Report::new();

        for (index, &stage) in stages.iter().enumerate() {
            let candidates = self.candidates(stage, &stages[..index], input);
            debug!("{:?}: {} candidate routes", stage, candidates.len());

            if stage.is_matrix() {
                self.grade_matrix(stage, &candidates, input, &mut report);
            } else if stage.is_cover() {
                self.grade_cover(stage, &candidates, input, &mut report);
            } else if stage.is_assignment() {
                let allowed = candidates
                    .iter()
                    .flat_map(|route| route.assignments.iter())
                    .collect::<Vec<_>>();
                self.grade_assignment(stage, &allowed, input, &mut report);
            }
        }
        report
    }

    fn grade_exam(&self, input: &Submission) -> Report {
        let mut report = Report::new();
        let allowed = self.valid_assignments().iter().collect::<Vec<_>>();
        self.grade_assignment(Stage::ExamAssignment, &allowed, input, &mut report);
        report
    }

    /// Routes consistent with every filled-in stage of `earlier`.
    ///
    /// Only routes that reach `stage` are considered. If the earlier answers
    /// rule out all of them, every route reaching `stage` is returned.
    fn candidates(&self, stage: Stage, earlier: &[Stage], input: &Submission) -> Vec<&Route<i64>> {
        let pool = self
            .routes()
            .iter()
            .filter(|route| self.reaches(route, stage))
            .collect::<Vec<_>>();

        let filled = earlier
            .iter()
            .filter(|s| self.is_filled(**s, input))
            .collect::<Vec<_>>();
        let consistent = pool
            .iter()
            .copied()
            .filter(|route| filled.iter().all(|s| self.agrees(route, **s, input)))
            .collect::<Vec<_>>();

        if consistent.is_empty() {
            debug!("{:?}: no route agrees with earlier answers", stage);
            pool
        } else {
            consistent
        }
    }

    fn reaches(&self, route: &Route<i64>, stage: Stage) -> bool {
        match stage {
            Stage::Cover(cycle) => cycle <= route.depth(),
            Stage::Adjusted(cycle) => cycle <= route.depth(),
            _ => true,
        }
    }

    fn is_filled(&self, stage: Stage, input: &Submission) -> bool {
        stage
            .fields(self.size(), self.schema_b())
            .iter()
            .any(|field| input.contains_key(&field.id))
    }

    fn stage_matrix<'a>(&'a self, route: &'a Route<i64>, stage: Stage) -> Option<&'a Matrix<i64>> {
        match stage {
            Stage::RowReduction => Some(&self.tree().step1),
            Stage::ColumnReduction => Some(&self.tree().step2),
            Stage::Adjusted(cycle) => route.adjusted.get(cycle.checked_sub(1)?),
            _ => None,
        }
    }

    fn stage_cover<'a>(&self, route: &'a Route<i64>, stage: Stage) -> Option<&'a Cover> {
        match stage {
            Stage::Cover(cycle) => route.covers.get(cycle.checked_sub(1)?),
            Stage::TerminalCover => Some(&route.terminal_cover),
            _ => None,
        }
    }

    /// Whether the submitted fields of `stage` are consistent with `route`.
    /// Absent fields are not compared.
    fn agrees(&self, route: &Route<i64>, stage: Stage, input: &Submission) -> bool {
        let size = self.size();
        if stage.is_matrix() {
            let matrix = match self.stage_matrix(route, stage) {
                Some(matrix) => matrix,
                None => return false,
            };
            (0..size).flat_map(|r| (0..size).map(move |c| (r, c))).all(|(r, c)| {
                match input.get(&stage.cell_id(r, c)) {
                    Some(value) => matches_number(Some(value), self.precision().to_f64(matrix.get(r, c))),
                    None => true,
                }
            })
        } else if stage.is_cover() {
            let cover = match self.stage_cover(route, stage) {
                Some(cover) => cover,
                None => return false,
            };
            let rows = (0..size).all(|r| match input.get(&stage.row_id(r)) {
                Some(value) => parse_flag(value) == cover.covers_row(r),
                None => true,
            });
            let cols = (0..size).all(|c| match input.get(&stage.col_id(c)) {
                Some(value) => parse_flag(value) == cover.covers_col(c),
                None => true,
            });
            rows && cols
        } else {
            true
        }
    }

    fn grade_matrix(&self, stage: Stage, candidates: &[&Route<i64>], input: &Submission, report: &mut Report) {
        let precision = self.precision();
        let matrices = candidates
            .iter()
            .filter_map(|route| self.stage_matrix(route, stage))
            .collect::<Vec<_>>();

        for r in 0..self.size() {
            for c in 0..self.size() {
                let id = stage.cell_id(r, c);
                let submitted = input.get(&id);
                let correct = matrices
                    .iter()
                    .any(|m| matches_number(submitted, precision.to_f64(m.get(r, c))));
                let expected = format_options(matrices.iter().map(|m| precision.format(m.get(r, c))));
                report.insert(id, Verdict { correct, expected });
            }
        }
    }

    /// A cover is graded as a whole: the line fields are all correct if the
    /// checked lines form one of the candidate covers, otherwise all wrong.
    fn grade_cover(&self, stage: Stage, candidates: &[&Route<i64>], input: &Submission, report: &mut Report) {
        let size = self.size();
        let checked = |id: String| input.get(&id).map_or(false, parse_flag);
        let submitted = Cover {
            rows: (0..size).filter(|&r| checked(stage.row_id(r))).collect(),
            cols: (0..size).filter(|&c| checked(stage.col_id(c))).collect(),
        };

        let covers = candidates
            .iter()
            .filter_map(|route| self.stage_cover(route, stage))
            .collect::<Vec<_>>();
        let correct = covers.contains(&&submitted);

        let lines = (0..size)
            .map(|r| (stage.row_id(r), submitted.covers_row(r), r, true))
            .chain((0..size).map(|c| (stage.col_id(c), submitted.covers_col(c), c, false)));
        for (id, value, line, is_row) in lines {
            let expected = if correct {
                flag(value)
            } else {
                format_options(covers.iter().map(|cover| {
                    flag(if is_row {
                        cover.covers_row(line)
                    } else {
                        cover.covers_col(line)
                    })
                }))
            };
            report.insert(id, Verdict { correct, expected });
        }
    }

    /// Submitted column index per row; `None` for missing or unknown labels.
    fn submitted_assignment(&self, stage: Stage, input: &Submission) -> Vec<Option<usize>> {
        (0..self.size())
            .map(|r| {
                let label = input.get(&stage.assignment_id(r))?.as_str()?;
                self.schema_b().iter().position(|l| l == label)
            })
            .collect()
    }

    /// A tuple from the global valid set marks every row correct. Otherwise
    /// each row is checked against the columns `allowed` uses at that row,
    /// falling back to the global set when `allowed` is empty.
    fn grade_assignment(&self, stage: Stage, allowed: &[&Assignment], input: &Submission, report: &mut Report) {
        let submitted = self.submitted_assignment(stage, input);
        let complete = submitted.iter().copied().collect::<Option<Assignment>>();
        let global = complete
            .as_ref()
            .map_or(false, |tuple| self.valid_assignments().contains(tuple));

        let allowed = if allowed.is_empty() {
            self.valid_assignments().iter().collect::<Vec<_>>()
        } else {
            allowed.to_vec()
        };
        let labels = self.schema_b();

        for (r, choice) in submitted.iter().enumerate() {
            let id = stage.assignment_id(r);
            let verdict = match choice {
                Some(col) if global => Verdict {
                    correct: true,
                    expected: labels[*col].clone(),
                },
                _ => Verdict {
                    correct: choice.map_or(false, |col| allowed.iter().any(|a| a[r] == col)),
                    expected: format_options(allowed.iter().map(|a| labels[a[r]].clone())),
                },
            };
            report.insert(id, verdict);
        }
    }
}

use crate::instance::{HungarianQuestion, Mode};
use crate::matrix::Matrix;
use crate::stage::{Field, Stage};
use serde::Serialize;

/// Display instruction for the presentation layer.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Directive {
    Text {
        content: String,
    },
    Table {
        title: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    MatrixInput {
        id: String,
        title: String,
        rows: Vec<String>,
        cols: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        values: Option<Vec<Vec<String>>>,
        /// line checkboxes are rendered next to the matrix under this id
        #[serde(rename = "checkboxId", skip_serializing_if = "Option::is_none")]
        checkbox_id: Option<String>,
    },
    AssignmentTable {
        title: String,
        rows: Vec<String>,
        inputs: Vec<Dropdown>,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub id: String,
    pub label: String,
    pub options: Vec<String>,
}

/// One screen of the exercise with the fields graded on it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StageLayout {
    pub stage: Stage,
    pub directives: Vec<Directive>,
    pub fields: Vec<Field>,
}

fn text(content: impl Into<String>) -> Directive {
    Directive::Text {
        content: content.into(),
    }
}

impl HungarianQuestion {
    /// Ordered stages for the question's mode.
    pub fn generate(&self) -> Vec<StageLayout> {
        match self.mode() {
            Mode::Steps => self.steps_layout(),
            Mode::Exam => self.exam_layout(),
        }
    }

    fn values(&self, matrix: &Matrix<i64>) -> Vec<Vec<String>> {
        matrix
            .rows()
            .map(|row| row.iter().map(|&v| self.precision().format(v)).collect())
            .collect()
    }

    fn matrix_input(
        &self,
        id: String,
        title: String,
        values: Option<&Matrix<i64>>,
        checkbox_id: Option<String>,
    ) -> Directive {
        Directive::MatrixInput {
            id,
            title,
            rows: self.schema_a().to_vec(),
            cols: self.schema_b().to_vec(),
            values: values.map(|m| self.values(m)),
            checkbox_id,
        }
    }

    fn assignment_table(&self, stage: Stage) -> Directive {
        let inputs = self
            .schema_a()
            .iter()
            .enumerate()
            .map(|(row, label)| Dropdown {
                id: stage.assignment_id(row),
                label: format!("Assignment for {}", label),
                options: self.schema_b().to_vec(),
            })
            .collect();
        Directive::AssignmentTable {
            title: "Final assignment (A -> B)".to_string(),
            rows: self.schema_a().to_vec(),
            inputs,
        }
    }

    /// Matrix the lines of a cover stage are drawn on, taken from the first route.
    fn cover_source(&self, stage: Stage) -> Option<&Matrix<i64>> {
        let cycle = match stage {
            Stage::Cover(cycle) => cycle,
            Stage::TerminalCover => self.depth() + 1,
            _ => return None,
        };
        if cycle == 1 {
            return Some(&self.tree().step2);
        }
        self.routes().first()?.adjusted.get(cycle - 2)
    }

    fn stage_layout(&self, stage: Stage) -> StageLayout {
        let directives = match stage {
            Stage::RowReduction => vec![
                text("Step 1: row reduction. Subtract the minimum of every row from all its entries."),
                self.matrix_input(
                    stage.input_id(),
                    "Cost matrix (edit the cells for step 1)".to_string(),
                    Some(self.costs()),
                    None,
                ),
            ],
            Stage::ColumnReduction => vec![
                text("Step 2: column reduction. Starting from step 1, subtract the minimum of every column."),
                self.matrix_input(
                    stage.input_id(),
                    "Step 2 matrix".to_string(),
                    Some(&self.tree().step1),
                    None,
                ),
            ],
            Stage::Cover(cycle) => vec![
                text(format!(
                    "Step 3.{}: cover all zeros with the minimum number of lines (strike rows or columns).",
                    cycle
                )),
                self.matrix_input(
                    stage.display_id().unwrap_or_default(),
                    format!("Line selection for step 3.{}", cycle),
                    self.cover_source(stage),
                    Some(stage.input_id()),
                ),
            ],
            Stage::Adjusted(cycle) => vec![
                text(format!(
                    "Step 4.{}: build the new matrix from the chosen lines.",
                    cycle
                )),
                self.matrix_input(
                    stage.input_id(),
                    format!("Step 4.{} matrix", cycle),
                    None,
                    None,
                ),
            ],
            Stage::TerminalCover => vec![
                text("Final step 3: cover all zeros with n lines. The optimal assignment can be read off afterwards."),
                self.matrix_input(
                    stage.display_id().unwrap_or_default(),
                    "Final line selection".to_string(),
                    self.cover_source(stage),
                    Some(stage.input_id()),
                ),
            ],
            Stage::FinalAssignment => vec![
                text("Final assignment: pick exactly one attribute of schema B for every row of schema A."),
                self.assignment_table(stage),
            ],
            Stage::Workspace => {
                let rows = self
                    .schema_a()
                    .iter()
                    .zip(self.values(self.costs()))
                    .map(|(label, values)| {
                        let mut row = vec![label.clone()];
                        row.extend(values);
                        row
                    })
                    .collect();
                let mut columns = vec!["Schema A".to_string()];
                columns.extend(self.schema_b().iter().cloned());
                vec![
                    text("Exam mode: only the final optimal assignment is graded, intermediate steps are not."),
                    Directive::Table {
                        title: "Cost matrix".to_string(),
                        columns,
                        rows,
                    },
                    self.matrix_input(
                        stage.input_id(),
                        "Work matrix (free to edit, not graded)".to_string(),
                        Some(self.costs()),
                        Some(stage.input_id()),
                    ),
                ]
            }
            Stage::ExamAssignment => vec![self.assignment_table(stage)],
        };

        StageLayout {
            stage,
            directives,
            fields: stage.fields(self.size(), self.schema_b()),
        }
    }

    fn steps_layout(&self) -> Vec<StageLayout> {
        Stage::sequence(self.depth())
            .into_iter()
            .map(|stage| self.stage_layout(stage))
            .collect()
    }

    fn exam_layout(&self) -> Vec<StageLayout> {
        vec![
            self.stage_layout(Stage::Workspace),
            self.stage_layout(Stage::ExamAssignment),
        ]
    }
}

use serde::Serialize;

///
/// Graded unit of the interactive procedure.
///
/// Cycle numbers start at 1. The field ids built here are shared by the layout
/// and the grader.
///
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "cycle", rename_all = "snake_case")]
pub enum Stage {
    RowReduction,
    ColumnReduction,
    Cover(usize),
    Adjusted(usize),
    TerminalCover,
    FinalAssignment,
    /// free-form scratch matrix of the exam mode, never graded
    Workspace,
    ExamAssignment,
}

/// Value domain of an input field.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDomain {
    /// numeric matrix cell
    Cell,
    /// boolean flag striking a row or a column
    Line,
    /// one label out of `options`
    Choice { options: Vec<String> },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub id: String,
    pub domain: FieldDomain,
}

impl Stage {
    /// Ordered graded stages of the steps mode for a route depth.
    pub fn sequence(depth: usize) -> Vec<Stage> {
        let mut stages = vec![Stage::RowReduction, Stage::ColumnReduction];
        for cycle in 1..=depth {
            stages.push(Stage::Cover(cycle));
            stages.push(Stage::Adjusted(cycle));
        }
        stages.push(Stage::TerminalCover);
        stages.push(Stage::FinalAssignment);
        stages
    }

    /// Widget id of the stage; assignment stages return the per-row prefix.
    pub fn input_id(&self) -> String {
        match self {
            Stage::RowReduction => "hm_step1".to_string(),
            Stage::ColumnReduction => "hm_step2".to_string(),
            Stage::Cover(cycle) => format!("hm_cover_{}", cycle),
            Stage::Adjusted(cycle) => format!("hm_step4_{}", cycle),
            Stage::TerminalCover => "hm_cover_terminal".to_string(),
            Stage::FinalAssignment => "hm_final_assign_".to_string(),
            Stage::Workspace => "hm_exam_work".to_string(),
            Stage::ExamAssignment => "exam_assign_".to_string(),
        }
    }

    /// Id of the read-only matrix shown next to a cover stage's checkboxes.
    pub fn display_id(&self) -> Option<String> {
        match self {
            Stage::Cover(cycle) => Some(format!("hm_step3_display_{}", cycle)),
            Stage::TerminalCover => Some("hm_step3_terminal_display".to_string()),
            _ => None,
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(
            self,
            Stage::RowReduction | Stage::ColumnReduction | Stage::Adjusted(_)
        )
    }

    pub fn is_cover(&self) -> bool {
        matches!(self, Stage::Cover(_) | Stage::TerminalCover)
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, Stage::FinalAssignment | Stage::ExamAssignment)
    }

    pub fn cell_id(&self, row: usize, col: usize) -> String {
        format!("{}:cell:{},{}", self.input_id(), row, col)
    }

    pub fn row_id(&self, row: usize) -> String {
        format!("{}:row:{}", self.input_id(), row)
    }

    pub fn col_id(&self, col: usize) -> String {
        format!("{}:col:{}", self.input_id(), col)
    }

    pub fn assignment_id(&self, row: usize) -> String {
        format!("{}{}", self.input_id(), row)
    }

    /// Every graded field of the stage, in row-major order.
    pub fn fields(&self, size: usize, labels: &[String]) -> Vec<Field> {
        if self.is_matrix() {
            (0..size)
                .flat_map(|r| (0..size).map(move |c| (r, c)))
                .map(|(r, c)| Field {
                    id: self.cell_id(r, c),
                    domain: FieldDomain::Cell,
                })
                .collect()
        } else if self.is_cover() {
            let rows = (0..size).map(|r| self.row_id(r));
            let cols = (0..size).map(|c| self.col_id(c));
            rows.chain(cols)
                .map(|id| Field {
                    id,
                    domain: FieldDomain::Line,
                })
                .collect()
        } else if self.is_assignment() {
            (0..size)
                .map(|r| Field {
                    id: self.assignment_id(r),
                    domain: FieldDomain::Choice {
                        options: labels.to_vec(),
                    },
                })
                .collect()
        } else {
            Vec::new()
        }
    }
}

use crate::cover::{minimal_covers, zero_assignments, Assignment, Cover};
use crate::matrix::{Cost, Matrix};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

///
/// One complete path through the procedure, from the column-reduced matrix to
/// a fully covered terminal matrix.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route<T: Cost> {
    /// cover chosen at each cycle
    pub covers: Vec<Cover>,
    /// matrix produced by each cycle's adjustment
    pub adjusted: Vec<Matrix<T>>,
    pub terminal_matrix: Matrix<T>,
    pub terminal_cover: Cover,
    /// every zero-only assignment of the terminal matrix, sorted
    pub assignments: Vec<Assignment>,
}

impl<T: Cost> Route<T> {
    /// Number of cover/adjust cycles.
    #[inline]
    pub fn depth(&self) -> usize {
        self.covers.len()
    }
}

///
/// Every route of one instance.
///
/// The two reduction matrices are computed once before branching, so they are
/// stored a single time and shared by all routes.
///
#[derive(Debug, Clone, Serialize)]
pub struct RouteTree<T: Cost> {
    pub step1: Matrix<T>,
    pub step2: Matrix<T>,
    pub routes: Vec<Route<T>>,
}

struct Branch<T: Cost> {
    matrix: Matrix<T>,
    covers: Vec<Cover>,
    adjusted: Vec<Matrix<T>>,
}

impl<T: Cost> RouteTree<T> {
    /// Reduces `costs` and expands every minimal cover choice until each branch
    /// reaches a matrix whose minimal cover has one line per row.
    ///
    /// Routes are listed in depth-first order following the enumeration order of
    /// the covers at each branch point.
    pub fn build(costs: &Matrix<T>) -> Self {
        let step1 = costs.reduce_rows();
        let step2 = step1.reduce_cols();
        let size = costs.size();

        let mut routes = Vec::new();
        let mut stack = vec![Branch {
            matrix: step2.clone(),
            covers: Vec::new(),
            adjusted: Vec::new(),
        }];

        while let Some(branch) = stack.pop() {
            let (covers, lines) = minimal_covers(&branch.matrix);
            trace!(
                "depth {}: {} lines, {} cover options",
                branch.covers.len(),
                lines,
                covers.len()
            );

            if lines == size {
                let assignments = zero_assignments(&branch.matrix)
                    .into_iter()
                    .collect::<Vec<_>>();
                for terminal_cover in covers {
                    routes.push(Route {
                        covers: branch.covers.clone(),
                        adjusted: branch.adjusted.clone(),
                        terminal_matrix: branch.matrix.clone(),
                        terminal_cover,
                        assignments: assignments.clone(),
                    });
                }
                continue;
            }

            // pushed in reverse so the first cover is expanded first
            for cover in covers.into_iter().rev() {
                let child = branch.matrix.adjust(&cover);
                trace!("adjusted with {:?}: {:?}", cover, child);
                let mut covers = branch.covers.clone();
                covers.push(cover);
                let mut adjusted = branch.adjusted.clone();
                adjusted.push(child.clone());
                stack.push(Branch {
                    matrix: child,
                    covers,
                    adjusted,
                });
            }
        }

        Self {
            step1,
            step2,
            routes,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.step2.size()
    }

    /// The common depth of all routes, `None` if routes differ or there are none.
    pub fn uniform_depth(&self) -> Option<usize> {
        let depth = self.routes.first()?.depth();
        if self.routes.iter().all(|r| r.depth() == depth) {
            Some(depth)
        } else {
            None
        }
    }

    /// Union of the optimal assignments over every route.
    pub fn assignments(&self) -> BTreeSet<Assignment> {
        self.routes
            .iter()
            .flat_map(|r| r.assignments.iter().cloned())
            .collect()
    }
}

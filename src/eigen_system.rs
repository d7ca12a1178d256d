//! Eigenproblem systems
//!
//! An [EigenSystem] owns the system matrices of a standard (`A x = λ x`) or generalized
//! (`A x = λ B x`) eigenproblem, fills them through a user supplied assembly function and
//! hands them to an external [EigenSolver].

use crate::traits::types::{EigenProblemType, EigenSolverType};
use crate::traits::{EigenSolver, SystemMatrix};
use crate::types::{Error, Result};
use rlst::{
    dense::array::Array, rlst_dynamic_array2, BaseArray, RandomAccessByRef, RandomAccessMut,
    RlstScalar, Shape, VectorContainer,
};

/// Parameters passed to the eigensolver
#[derive(Debug, Clone, PartialEq)]
pub struct EigenSolverParameters {
    /// Number of eigenpairs to compute
    n_eigenpairs: usize,
    /// Dimension of the search space
    n_basis_vectors: usize,
    /// Convergence tolerance
    tolerance: f64,
    /// Maximum number of solver iterations
    max_iterations: usize,
    /// Solver algorithm
    solver_type: EigenSolverType,
}

impl Default for EigenSolverParameters {
    fn default() -> Self {
        Self {
            n_eigenpairs: 5,
            n_basis_vectors: 15,
            tolerance: 1e-6,
            max_iterations: 1000,
            solver_type: EigenSolverType::Arnoldi,
        }
    }
}

impl EigenSolverParameters {
    /// Number of eigenpairs to compute
    pub fn n_eigenpairs(&self) -> usize {
        self.n_eigenpairs
    }
    /// Dimension of the search space
    pub fn n_basis_vectors(&self) -> usize {
        self.n_basis_vectors
    }
    /// Convergence tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
    /// Maximum number of solver iterations
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    /// Solver algorithm
    pub fn solver_type(&self) -> EigenSolverType {
        self.solver_type
    }

    /// Set the number of eigenpairs to compute
    pub fn set_n_eigenpairs(&mut self, n: usize) -> &mut Self {
        self.n_eigenpairs = n;
        self
    }
    /// Set the dimension of the search space
    pub fn set_n_basis_vectors(&mut self, n: usize) -> &mut Self {
        self.n_basis_vectors = n;
        self
    }
    /// Set the convergence tolerance
    pub fn set_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }
    /// Set the maximum number of solver iterations
    pub fn set_max_iterations(&mut self, n: usize) -> &mut Self {
        self.max_iterations = n;
        self
    }
    /// Set the solver algorithm
    pub fn set_solver_type(&mut self, solver_type: EigenSolverType) -> &mut Self {
        self.solver_type = solver_type;
        self
    }
}

/// Lifecycle state of an eigen system
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EigenSystemState {
    /// No matrices are allocated
    Uninitialized,
    /// Matrices are allocated but empty
    DataAllocated,
    /// Matrices hold the assembled operators
    Assembled,
    /// The solver has run and eigenpairs can be read
    Solved,
}

/// A dense system matrix
pub type DenseMatrix<T> = Array<T, BaseArray<T, VectorContainer<T>, 2>, 2>;

impl<T: RlstScalar> SystemMatrix<T> for DenseMatrix<T> {
    fn new(nrows: usize, ncols: usize) -> Self {
        rlst_dynamic_array2!(T, [nrows, ncols])
    }

    fn nrows(&self) -> usize {
        self.shape()[0]
    }

    fn ncols(&self) -> usize {
        self.shape()[1]
    }

    fn zero(&mut self) {
        let [m, n] = self.shape();
        for i in 0..m {
            for j in 0..n {
                if let Some(entry) = self.get_mut([i, j]) {
                    *entry = T::zero();
                }
            }
        }
    }

    fn add_value(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let [m, n] = self.shape();
        match self.get_mut([row, col]) {
            Some(entry) => {
                *entry += value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                what: "matrix entry",
                index: row * n + col,
                len: m * n,
            }),
        }
    }

    fn value(&self, row: usize, col: usize) -> Option<T> {
        self.get([row, col]).copied()
    }
}

/// Assembly function filling the matrix `A` and, for generalized problems, `B`
pub type AssembleFunction<M> = Box<dyn FnMut(&mut M, Option<&mut M>) -> Result<()>>;

/// An eigenproblem with its system matrices and solver
pub struct EigenSystem<T: RlstScalar, M: SystemMatrix<T>, S: EigenSolver<T, M>> {
    name: String,
    n_dofs: usize,
    solver: S,
    parameters: EigenSolverParameters,
    problem_type: EigenProblemType,
    matrix_a: Option<M>,
    matrix_b: Option<M>,
    solution: Vec<T>,
    assemble_function: Option<AssembleFunction<M>>,
    n_converged: usize,
    n_iterations: usize,
    state: EigenSystemState,
}

impl<T: RlstScalar, M: SystemMatrix<T>, S: EigenSolver<T, M>> EigenSystem<T, M, S> {
    /// Create a system for a problem with `n_dofs` unknowns
    pub fn new(name: &str, n_dofs: usize, solver: S) -> Self {
        Self {
            name: name.to_string(),
            n_dofs,
            solver,
            parameters: EigenSolverParameters::default(),
            problem_type: EigenProblemType::NHEP,
            matrix_a: None,
            matrix_b: None,
            solution: vec![],
            assemble_function: None,
            n_converged: 0,
            n_iterations: 0,
            state: EigenSystemState::Uninitialized,
        }
    }

    /// The name of the system
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of system
    pub fn system_type(&self) -> &'static str {
        "Eigen"
    }

    /// The number of unknowns
    pub fn n_dofs(&self) -> usize {
        self.n_dofs
    }

    /// The lifecycle state
    pub fn state(&self) -> EigenSystemState {
        self.state
    }

    /// The solver parameters
    pub fn parameters(&self) -> &EigenSolverParameters {
        &self.parameters
    }

    /// Mutable solver parameters
    pub fn parameters_mut(&mut self) -> &mut EigenSolverParameters {
        &mut self.parameters
    }

    /// The eigensolver
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Set the type of eigenproblem
    ///
    /// The type can only be changed before the matrices are allocated.
    pub fn set_eigenproblem_type(&mut self, problem_type: EigenProblemType) -> Result<()> {
        if self.state != EigenSystemState::Uninitialized {
            return Err(Error::InvalidState(format!(
                "cannot change the problem type of {} after reinit",
                self.name
            )));
        }
        self.problem_type = problem_type;
        self.solver.set_eigenproblem_type(problem_type);
        Ok(())
    }

    /// The type of eigenproblem
    pub fn get_eigenproblem_type(&self) -> EigenProblemType {
        self.problem_type
    }

    /// Is the problem generalized?
    pub fn generalized(&self) -> bool {
        self.problem_type.is_generalized()
    }

    /// Attach the function that assembles the system matrices
    pub fn attach_assemble_function(
        &mut self,
        f: impl FnMut(&mut M, Option<&mut M>) -> Result<()> + 'static,
    ) {
        self.assemble_function = Some(Box::new(f));
    }

    /// Allocate the system matrices and the solution vector
    pub fn reinit(&mut self) {
        self.matrix_a = Some(M::new(self.n_dofs, self.n_dofs));
        self.matrix_b = if self.generalized() {
            Some(M::new(self.n_dofs, self.n_dofs))
        } else {
            None
        };
        self.solution = vec![T::zero(); self.n_dofs];
        self.n_converged = 0;
        self.n_iterations = 0;
        self.state = EigenSystemState::DataAllocated;
    }

    /// Assemble the system matrices
    pub fn assemble(&mut self) -> Result<()> {
        if self.state == EigenSystemState::Uninitialized {
            return Err(Error::InvalidState(format!(
                "{} must be reinitialised before assembly",
                self.name
            )));
        }
        let matrix_a = self.matrix_a.as_mut().ok_or_else(|| {
            Error::InvalidState(format!("{} has no system matrix", self.name))
        })?;
        matrix_a.zero();
        if let Some(b) = self.matrix_b.as_mut() {
            b.zero();
        }
        match self.assemble_function.as_mut() {
            Some(f) => f(matrix_a, self.matrix_b.as_mut())?,
            None => log::warn!("No assembly function attached to {}", self.name),
        }
        self.state = EigenSystemState::Assembled;
        Ok(())
    }

    /// Assemble if needed and solve the eigenproblem
    pub fn solve(&mut self) -> Result<()> {
        match self.state {
            EigenSystemState::Uninitialized => {
                return Err(Error::InvalidState(format!(
                    "{} must be reinitialised before solving",
                    self.name
                )))
            }
            EigenSystemState::DataAllocated => self.assemble()?,
            EigenSystemState::Assembled | EigenSystemState::Solved => {}
        }
        // Pairs of a previous solve are gone once the solver runs again
        self.n_converged = 0;
        self.n_iterations = 0;
        self.state = EigenSystemState::Assembled;

        let matrix_a = self.matrix_a.as_ref().ok_or_else(|| {
            Error::InvalidState(format!("{} has no system matrix", self.name))
        })?;
        let (n_converged, n_iterations) = if self.generalized() {
            let matrix_b = self.matrix_b.as_ref().ok_or_else(|| {
                Error::InvalidState(format!("{} has no second system matrix", self.name))
            })?;
            self.solver
                .solve_generalized(matrix_a, matrix_b, &self.parameters)?
        } else {
            self.solver.solve_standard(matrix_a, &self.parameters)?
        };
        let n_converged = if n_converged > self.parameters.n_eigenpairs {
            log::debug!(
                "{} reported {n_converged} converged eigenpairs, keeping the {} requested",
                self.name,
                self.parameters.n_eigenpairs
            );
            self.parameters.n_eigenpairs
        } else {
            n_converged
        };
        self.n_converged = n_converged;
        self.n_iterations = n_iterations;
        self.state = EigenSystemState::Solved;

        if n_converged < self.parameters.n_eigenpairs {
            log::warn!(
                "Only {n_converged} of {} eigenpairs of {} converged",
                self.parameters.n_eigenpairs,
                self.name
            );
        }
        log::info!(
            "Solved {} ({:?}): {n_converged} eigenpairs in {n_iterations} iterations",
            self.name,
            self.problem_type
        );
        Ok(())
    }

    /// Eigenvalue `i` as (real part, imaginary part)
    ///
    /// The eigenvector is copied into the solution vector.
    pub fn get_eigenpair(&mut self, i: usize) -> Result<(T::Real, T::Real)> {
        let len = if self.state == EigenSystemState::Solved {
            self.n_converged
        } else {
            0
        };
        if i >= len {
            return Err(Error::IndexOutOfRange {
                what: "eigenpair",
                index: i,
                len,
            });
        }
        self.solver.eigenpair(i, &mut self.solution)
    }

    /// The solution vector
    pub fn solution(&self) -> &[T] {
        &self.solution
    }

    /// The system matrix `A`
    pub fn matrix_a(&self) -> Option<&M> {
        self.matrix_a.as_ref()
    }

    /// The system matrix `B` of a generalized problem
    pub fn matrix_b(&self) -> Option<&M> {
        self.matrix_b.as_ref()
    }

    /// The number of converged eigenpairs
    pub fn get_n_converged(&self) -> usize {
        self.n_converged
    }

    /// The number of iterations used by the last solve
    pub fn get_n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Release the matrices and return to the uninitialized state
    pub fn clear(&mut self) {
        self.matrix_a = None;
        self.matrix_b = None;
        self.solution = vec![];
        self.n_converged = 0;
        self.n_iterations = 0;
        self.solver.clear();
        self.state = EigenSystemState::Uninitialized;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dense_matrix() {
        let mut m = <DenseMatrix<f64> as SystemMatrix<f64>>::new(3, 2);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        m.add_value(1, 1, 2.0).unwrap();
        m.add_value(1, 1, 0.5).unwrap();
        assert_eq!(m.value(1, 1), Some(2.5));
        assert_eq!(m.value(3, 0), None);
        m.zero();
        assert_eq!(m.value(1, 1), Some(0.0));
    }

    #[test]
    fn test_dense_matrix_write_out_of_range() {
        let mut m = <DenseMatrix<f64> as SystemMatrix<f64>>::new(2, 2);
        assert_eq!(
            m.add_value(5, 5, 3.0),
            Err(Error::IndexOutOfRange {
                what: "matrix entry",
                index: 15,
                len: 4
            })
        );
        assert!(matches!(
            m.add_value(0, 2, 1.0),
            Err(Error::IndexOutOfRange { .. })
        ));
        let total = (0..2)
            .flat_map(|i| (0..2).map(move |j| (i, j)))
            .map(|(i, j)| m.value(i, j).unwrap())
            .sum::<f64>();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_parameters() {
        let mut p = EigenSolverParameters::default();
        assert_eq!(p.n_eigenpairs(), 5);
        assert_eq!(p.solver_type(), EigenSolverType::Arnoldi);
        p.set_n_eigenpairs(2).set_solver_type(EigenSolverType::Power);
        assert_eq!(p.n_eigenpairs(), 2);
        assert_eq!(p.solver_type(), EigenSolverType::Power);
    }
}

//! Eigenproblem collaborators
use crate::eigen_system::EigenSolverParameters;
use crate::traits::types::EigenProblemType;
use crate::types::Result;
use rlst::RlstScalar;

/// A system matrix handle
///
/// The eigen system only allocates, fills and reads matrices; all arithmetic on them
/// belongs to the solver.
pub trait SystemMatrix<T>: Sized {
    /// Allocate a zero matrix
    fn new(nrows: usize, ncols: usize) -> Self;

    /// Number of rows
    fn nrows(&self) -> usize;

    /// Number of columns
    fn ncols(&self) -> usize;

    /// Set every entry to zero
    fn zero(&mut self);

    /// Add `value` to entry `(row, col)`
    ///
    /// Fails with [crate::Error::IndexOutOfRange] if the entry is outside the matrix.
    fn add_value(&mut self, row: usize, col: usize, value: T) -> Result<()>;

    /// Read entry `(row, col)`
    fn value(&self, row: usize, col: usize) -> Option<T>;
}

/// An external eigensolver package
pub trait EigenSolver<T: RlstScalar, M: SystemMatrix<T>> {
    /// Tell the solver which kind of problem it will be given
    fn set_eigenproblem_type(&mut self, problem_type: EigenProblemType);

    /// Solve `A x = λ x`
    ///
    /// Returns the number of converged eigenpairs and the number of iterations used. A
    /// solver may converge more pairs than `parameters` requests; the eigen system only
    /// exposes the requested number.
    fn solve_standard(
        &mut self,
        matrix_a: &M,
        parameters: &EigenSolverParameters,
    ) -> Result<(usize, usize)>;

    /// Solve `A x = λ B x`
    ///
    /// Returns the number of converged eigenpairs and the number of iterations used.
    fn solve_generalized(
        &mut self,
        matrix_a: &M,
        matrix_b: &M,
        parameters: &EigenSolverParameters,
    ) -> Result<(usize, usize)>;

    /// Real and imaginary part of eigenvalue `index`; its eigenvector is written to `solution`
    fn eigenpair(&self, index: usize, solution: &mut [T]) -> Result<(T::Real, T::Real)>;

    /// Release any data held from the previous solve
    fn clear(&mut self) {}
}

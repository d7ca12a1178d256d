//! Eigenproblem types

/// The kind of eigenvalue problem
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EigenProblemType {
    /// Non-Hermitian `A x = λ x`
    NHEP,
    /// Hermitian `A x = λ x`
    HEP,
    /// Generalized non-Hermitian `A x = λ B x`
    GNHEP,
    /// Generalized Hermitian `A x = λ B x`
    GHEP,
}

impl EigenProblemType {
    /// Does the problem need a second matrix?
    pub fn is_generalized(&self) -> bool {
        matches!(self, EigenProblemType::GNHEP | EigenProblemType::GHEP)
    }
}

/// Iterative eigenproblem solver types
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EigenSolverType {
    /// Power iteration
    Power,
    /// Dense LAPACK solve
    Lapack,
    /// Subspace iteration
    Subspace,
    /// Arnoldi iteration
    Arnoldi,
}

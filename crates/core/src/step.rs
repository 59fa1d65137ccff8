/// A trait for types that can be stepped using their derivative.
///
/// Implementing this trait lets the generic ODE solvers advance the type via
/// `self + derivative * delta`, where the derivative is taken with respect to
/// `Delta`. Multi-stage solvers combine several derivatives by chaining calls
/// to [`step`](Self::step), so implementations must be affine in
/// `derivative * delta`: stepping by `a` then by `b` must equal stepping once
/// by their sum, up to rounding.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Type alias for the derivative of a `StepIntegrable` type.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;

/// Control actions an observer can return to the RK4 solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop integrating and return the history recorded so far.
    StopEarly,
}

pub trait Policy<S, A> {
    // 根据状态选择动作
    fn select_action(&self, state: &S) -> A;

    /// Probability that `select_action` returns `action` in `state`.
    fn probability(&self, state: &S, action: &A) -> f64;
}

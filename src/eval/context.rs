//! Evaluation context — state threaded through a single evaluation pass.

/// Carries the iteration-index stack during one evaluation.
///
/// Iteration-driving nodes (Points, Instance on Points) push a frame,
/// set the index before each inner evaluation, and pop when the loop
/// finishes. Index nodes read the innermost frame; outside any iteration
/// the index is 0. The stack makes nested iterations well-defined without
/// any process-wide counter.
#[derive(Debug, Default)]
pub struct EvalContext {
    index_stack: Vec<usize>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current iteration index (innermost frame, 0 outside iteration).
    pub fn index(&self) -> usize {
        self.index_stack.last().copied().unwrap_or(0)
    }

    /// Open an iteration frame.
    pub fn push_index(&mut self) {
        self.index_stack.push(0);
    }

    /// Set the innermost frame's index. No-op outside iteration.
    pub fn set_index(&mut self, index: usize) {
        if let Some(top) = self.index_stack.last_mut() {
            *top = index;
        }
    }

    /// Close the innermost iteration frame.
    pub fn pop_index(&mut self) {
        self.index_stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_frames_shadow_and_restore() {
        let mut ctx = EvalContext::new();
        assert_eq!(ctx.index(), 0);

        ctx.push_index();
        ctx.set_index(3);
        assert_eq!(ctx.index(), 3);

        ctx.push_index();
        ctx.set_index(7);
        assert_eq!(ctx.index(), 7);
        ctx.pop_index();

        assert_eq!(ctx.index(), 3);
        ctx.pop_index();
        assert_eq!(ctx.index(), 0);
    }
}

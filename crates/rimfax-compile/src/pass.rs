//! Pass trait for circuit transformations.

use rimfax_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// A compilation pass that rewrites a circuit in place.
///
/// Passes are the fundamental unit of compilation. Each pass performs one
/// transformation and may read or record properties for other passes.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &str {
            "test"
        }

        fn run(
            &self,
            _circuit: &mut Circuit,
            _properties: &mut PropertySet,
        ) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_name() {
        assert_eq!(TestPass.name(), "test");
    }
}

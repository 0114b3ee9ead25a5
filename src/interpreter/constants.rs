// Limits and timings for the virtual machine

/// Iterations a single loop may run before execution is abandoned
pub const MAX_LOOP_ITERATIONS: usize = 10_000;

/// Deepest call nesting before a stack overflow is reported
pub const MAX_CALL_DEPTH: usize = 64;

/// Largest size a fixed array may be declared with
pub const MAX_ARRAY_SIZE: usize = 10_000;

/// Duration of an animation step with no configured timing
pub const DEFAULT_ANIMATION_DURATION: f64 = 1.0;

/// Duration of code-pointer moves and variable table updates
pub const CODE_POINTER_DURATION: f64 = 0.5;

/// Data structures allowed in one run unless the configuration says otherwise
pub const DEFAULT_MAX_DATA_STRUCTURES: usize = 20;

//! Default configuration values

/// Compiler program looked up on PATH when no path is configured
pub const DEFAULT_COMPILER_PROGRAM: &str = "msbuild";

/// Seconds to wait for one compiler run (0 waits forever)
pub const DEFAULT_COMPILE_TIMEOUT_SECS: u64 = 600;

/// File extension of project descriptors
pub const DEFAULT_DESCRIPTOR_EXTENSION: &str = "csproj";

/// Failure log written in the working directory
pub const DEFAULT_LOG_FILE: &str = "buildFailure.log";

/// Test harness program looked up on PATH when no path is configured
pub const DEFAULT_TEST_PROGRAM: &str = "vstest.console";

/// Per-project argument passed to the test harness
pub const DEFAULT_TEST_ARG_TEMPLATE: &str = "{path}";

/// Output directory assumed when a descriptor has no `<OutputPath>`
pub const DEFAULT_OUTPUT_PATH: &str = "bin/Debug";

/// Per-root configuration file name
pub const ROOT_CONFIG_FILE: &str = "batchbuild.toml";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;

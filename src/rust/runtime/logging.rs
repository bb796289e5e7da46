// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::runtime::fail::Fail;
use ::flexi_logger::{
    Logger,
    LoggerHandle,
};

//==============================================================================
// Constants
//==============================================================================

/// Log specification used when `RUST_LOG` is not set.
const DEFAULT_LOG_SPEC: &str = "warn";

//==============================================================================
// Standalone Functions
//==============================================================================

/// Initializes logging features. The logger writes to the standard error stream and is configured from the
/// `RUST_LOG` environment variable. The returned handle must outlive every log statement of the program, including
/// those issued by forked workers.
pub fn initialize() -> Result<LoggerHandle, Fail> {
    let logger: Logger = Logger::try_with_env_or_str(DEFAULT_LOG_SPEC).map_err(|e| {
        let cause: String = format!("invalid log specification: {}", e);
        Fail::new(libc::EINVAL, &cause)
    })?;

    logger.log_to_stderr().start().map_err(|e| {
        let cause: String = format!("failed to start logger: {}", e);
        Fail::new(libc::EIO, &cause)
    })
}

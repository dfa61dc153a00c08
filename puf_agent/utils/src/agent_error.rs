/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */


use challenge::ChallengeError;
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Process exit status for a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status when a challenge address is not word aligned
pub const EXIT_MISALIGNED: u8 = 1;
/// Process exit status for every other failure
pub const EXIT_FAILURE: u8 = 255;

/// Tool error types with detailed categorization
#[derive(Debug)]
pub enum AgentError {
    /// Configuration errors (missing file, invalid values etc.)
    ConfigError(String),
    /// Logger could not be initialized
    LogInitError(String),
    /// Execution errors
    ExecutionError(String),
    /// Device session, store or challenge failure
    Challenge(ChallengeError),
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AgentError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AgentError::LogInitError(msg) => write!(f, "Log initialization error: {}", msg),
            AgentError::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
            AgentError::Challenge(e) => write!(f, "{}", e),
        }
    }
}

impl Error for AgentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AgentError::Challenge(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ChallengeError> for AgentError {
    fn from(err: ChallengeError) -> Self {
        AgentError::Challenge(err)
    }
}

impl AgentError {
    /// Exit status reported to the shell for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AgentError::Challenge(e) if e.is_alignment() => EXIT_MISALIGNED,
            _ => EXIT_FAILURE,
        }
    }
}

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


//! PUF enrollment and challenge flows over a SEcube device session

pub mod challenge;
pub mod challenge_error;
pub mod enroll;
pub mod pacing;
pub mod session;

pub use challenge::{
    build_challenge, line_index, run_challenge, submit, sweep, ChallengeReport, ChallengeWord, SweepSummary,
    WORD_STRIDE,
};
pub use challenge_error::ChallengeError;
pub use enroll::enroll;
pub use pacing::Pacer;
pub use session::{list_devices, open_session, with_session, Session, SessionOptions};

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


use clap::Subcommand;
use config::parse_u32;

/// Address argument parser: `0x` hexadecimal or decimal
pub fn parse_address(text: &str) -> Result<u32, String> {
    parse_u32(text)
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List attached SEcube devices
    Devices,

    /// Read PUF words from the device and store them
    Enroll {
        /// Number of PUF words to read, default from configuration
        #[clap(short, long)]
        count: Option<usize>,
    },

    /// Challenge the device with the stored PUF of one address
    Challenge {
        /// Target address, default the PUF memory base
        #[clap(short, long, value_parser = parse_address)]
        address: Option<u32>,
    },

    /// Challenge consecutive addresses and count the matches
    Sweep {
        /// First target address
        #[clap(short, long, required = true, value_parser = parse_address)]
        start: u32,

        /// Number of consecutive words to challenge
        #[clap(short, long, required = true)]
        count: usize,
    },

    /// Print stored PUF records
    Show {
        /// Line offset of a single record, all records when omitted
        #[clap(short, long)]
        offset: Option<usize>,
    },
}

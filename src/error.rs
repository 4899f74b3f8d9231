/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("rank {k} out of range for a tree of {len} keys")]
    RankOutOfRange { k: usize, len: usize },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{0}'")]
    WrongArity(&'static str),

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("command is not valid UTF-8")]
    InvalidUtf8,

    #[error("empty command")]
    EmptyCommand,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Line oriented front end: `INSERT x`, `DELETE x`, `KTH k`, `RANK x` and
//! `COUNT l r`, one per line, each query answered on its own output line.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use log::{debug, warn};
use num_traits::PrimInt;

use crate::{AvlTree, Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<K> {
    Insert(K),
    Delete(K),
    Kth(usize),
    Rank(K),
    Count(K, K),
}

fn parse_number<T: FromStr>(token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::InvalidNumber(token.to_string()))
}

impl<K: FromStr> FromStr for Command<K> {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(Error::EmptyCommand)?;
        let args: Vec<&str> = tokens.collect();
        let arity = |n: usize, cmd: &'static str| {
            if args.len() == n {
                Ok(())
            } else {
                Err(Error::WrongArity(cmd))
            }
        };
        match name.to_ascii_uppercase().as_str() {
            "INSERT" => {
                arity(1, "INSERT")?;
                Ok(Command::Insert(parse_number(args[0])?))
            }
            "DELETE" => {
                arity(1, "DELETE")?;
                Ok(Command::Delete(parse_number(args[0])?))
            }
            "KTH" => {
                arity(1, "KTH")?;
                Ok(Command::Kth(parse_number(args[0])?))
            }
            "RANK" => {
                arity(1, "RANK")?;
                Ok(Command::Rank(parse_number(args[0])?))
            }
            "COUNT" => {
                arity(2, "COUNT")?;
                Ok(Command::Count(
                    parse_number(args[0])?,
                    parse_number(args[1])?,
                ))
            }
            _ => Err(Error::UnknownCommand(name.to_string())),
        }
    }
}

/// Answer to a query command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply<K> {
    Key(K),
    Count(usize),
}

impl<K: fmt::Display> fmt::Display for Reply<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Key(key) => write!(f, "{}", key),
            Reply::Count(n) => write!(f, "{}", n),
        }
    }
}

impl<K: PrimInt> Command<K> {
    /// Runs the command against `tree`. Mutations answer nothing.
    pub fn apply(&self, tree: &mut AvlTree<K>) -> Result<Option<Reply<K>>> {
        Ok(match *self {
            Command::Insert(key) => {
                tree.insert(key);
                None
            }
            Command::Delete(key) => {
                tree.delete(&key);
                None
            }
            Command::Kth(k) => Some(Reply::Key(*tree.kth(k)?)),
            Command::Rank(key) => Some(Reply::Count(tree.rank(&key))),
            Command::Count(lo, hi) => {
                Some(Reply::Count(tree.count_range(lo, hi)))
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DriverConfig {
    // Abort on the first failing line instead of logging and skipping it
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub executed: usize,
    pub skipped: usize,
}

pub struct Driver<K> {
    tree: AvlTree<K>,
    config: DriverConfig,
}

impl<K> Driver<K> {
    pub fn new(config: DriverConfig) -> Driver<K> {
        Driver {
            tree: AvlTree::new(),
            config,
        }
    }
    pub fn tree(&self) -> &AvlTree<K> {
        &self.tree
    }
    pub fn into_tree(self) -> AvlTree<K> {
        self.tree
    }
}

impl<K> Driver<K>
where
    K: PrimInt + FromStr + fmt::Display + fmt::Debug,
{
    /// Parses and runs one command line, writing the answer if any.
    pub fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<()> {
        let command: Command<K> = line.parse()?;
        debug!("{:?}", command);
        if let Some(reply) = command.apply(&mut self.tree)? {
            writeln!(output, "{}", reply)?;
        }
        Ok(())
    }

    /// Runs every command of `input`. Blank lines are ignored. If the first
    /// non-blank line is a bare count, only that many commands are read.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<Stats> {
        let mut stats = Stats::default();
        let mut limit = None;
        let mut first = true;
        let mut buf = Vec::new();
        let mut lineno = 0;
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lineno += 1;
            // Undecodable bytes fail this line only, not the whole run.
            let line = match std::str::from_utf8(&buf) {
                Ok(text) => Ok(text.trim()),
                Err(_) => Err(Error::InvalidUtf8),
            };
            if matches!(line, Ok("")) {
                continue;
            }
            if std::mem::take(&mut first) {
                if let Some(count) =
                    line.as_ref().ok().and_then(|l| l.parse::<usize>().ok())
                {
                    debug!("expecting {} commands", count);
                    limit = Some(count);
                    continue;
                }
            }
            if limit.is_some_and(|limit| stats.executed + stats.skipped >= limit)
            {
                break;
            }
            match line.and_then(|line| self.execute(line, &mut output)) {
                Ok(()) => stats.executed += 1,
                Err(err @ Error::Io(_)) => return Err(err),
                Err(err) if self.config.strict => return Err(err),
                Err(err) => {
                    warn!("line {}: {}", lineno, err);
                    stats.skipped += 1;
                }
            }
        }
        output.flush()?;
        Ok(stats)
    }
}
